use crate::common::{api, session};
use crate::pages::AppRoute;
use crate::routes::RouteTable;
use medikeep_model::{IntakeRecordCreate, Medication};
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;
use yew_hooks::{use_async, use_async_with_options, UseAsyncOptions, UseAsyncState};
use yew_nested_router::prelude::*;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let session = use_memo(|()| session::load(), ());
    let token = (*session).as_ref().map(|session| session.token.clone());

    let router = use_router::<AppRoute>();
    let routes = use_context::<Rc<RouteTable>>();

    let medications = {
        let token = token.clone();
        use_async_with_options(
            async move {
                match token {
                    Some(token) => api::medications(&token).await,
                    None => Err("Not signed in".to_string()),
                }
            },
            UseAsyncOptions::enable_auto(),
        )
    };

    let intakes = {
        let token = token.clone();
        use_async_with_options(
            async move {
                match token {
                    Some(token) => api::todays_intakes(&token).await,
                    None => Err("Not signed in".to_string()),
                }
            },
            UseAsyncOptions::enable_auto(),
        )
    };

    let on_changed = {
        let medications = medications.clone();
        let intakes = intakes.clone();
        Callback::from(move |()| {
            medications.run();
            intakes.run();
        })
    };

    let on_add = {
        let router = router.clone();
        let routes = routes.clone();
        Callback::from(move |_| {
            if let (Some(router), Some(routes)) = (&router, &routes) {
                if let Some(target) = routes.target("add-medication") {
                    router.push(target);
                }
            }
        })
    };

    let on_sign_in = {
        let router = router.clone();
        Callback::from(move |_| {
            if let Some(router) = &router {
                router.push(AppRoute::Login);
            }
        })
    };

    if (*session).is_none() {
        return html!(
            <PageSection variant={PageSectionVariant::Light} fill=true>
                <Content>
                    <Title size={Size::XXXXLarge}>{ "Dashboard" }</Title>
                    <p>{ "Sign in to see your medications." }</p>
                </Content>
                <Button label="Sign in" variant={ButtonVariant::Primary} onclick={on_sign_in}/>
            </PageSection>
        );
    }

    let taken_today = |medication: &Medication| -> usize {
        intakes
            .data
            .as_ref()
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.medication_id == medication.medication_id)
                    .count()
            })
            .unwrap_or_default()
    };

    let body = match &*medications {
        UseAsyncState { loading: true, .. } => html!("Loading..."),
        UseAsyncState {
            error: Some(err), ..
        } => html!(format!("Failed: {err}")),
        UseAsyncState {
            data: Some(medications),
            ..
        } => {
            if medications.is_empty() {
                html!(<Content><p>{ "No medications yet." }</p></Content>)
            } else {
                html!(
                    <Flex modifiers={[FlexModifier::Column]}>
                        { for medications.iter().map(|medication| {
                            let token = token.clone().unwrap_or_default();
                            html!(
                                <FlexItem>
                                    <MedicationCard
                                        medication={medication.clone()}
                                        token={token}
                                        taken_today={taken_today(medication)}
                                        on_changed={on_changed.clone()}
                                    />
                                </FlexItem>
                            )
                        }) }
                    </Flex>
                )
            }
        }
        _ => html!(),
    };

    html!(
        <>
        <PageSection variant={PageSectionVariant::Light} sticky={[PageSectionSticky::Top]}>
            <Flex>
                <FlexItem modifiers={[FlexModifier::Grow]}>
                    <Content>
                        <Title size={Size::XXXXLarge}>{ "Dashboard" }</Title>
                    </Content>
                </FlexItem>
                <FlexItem modifiers={[FlexModifier::Align(Alignment::End)]}>
                    <Button label="Add medication" variant={ButtonVariant::Primary} onclick={on_add}/>
                </FlexItem>
            </Flex>
        </PageSection>

        <PageSection variant={PageSectionVariant::Light} fill=true>
            { body }
        </PageSection>
        </>
    )
}

#[derive(Clone, PartialEq, Properties)]
pub struct MedicationCardProps {
    pub medication: Medication,
    pub token: AttrValue,
    pub taken_today: usize,
    pub on_changed: Callback<()>,
}

#[function_component(MedicationCard)]
fn medication_card(props: &MedicationCardProps) -> Html {
    let record = {
        let token = props.token.clone();
        let medication_id = props.medication.medication_id;
        let on_changed = props.on_changed.clone();
        use_async(async move {
            api::record_intake(
                &token,
                &IntakeRecordCreate {
                    medication_id,
                    timing_id: None,
                    taken_at: None,
                },
            )
            .await?;
            on_changed.emit(());
            Ok::<_, String>(())
        })
    };

    let delete = {
        let token = props.token.clone();
        let medication_id = props.medication.medication_id;
        let on_changed = props.on_changed.clone();
        use_async(async move {
            api::delete_medication(&token, medication_id).await?;
            on_changed.emit(());
            Ok::<_, String>(())
        })
    };

    let on_take = {
        let record = record.clone();
        Callback::from(move |_| {
            record.run();
        })
    };
    let on_delete = {
        let delete = delete.clone();
        Callback::from(move |_| {
            delete.run();
        })
    };

    let medication = &props.medication;

    html!(
        <Content>
            <Title>{ &medication.name }</Title>
            <p>
                { &medication.dosage }
                if medication.is_as_needed {
                    {" "} <Label label="as needed"/>
                }
            </p>
            if let Some(memo) = &medication.memo {
                <p>{ memo }</p>
            }
            <p>
                { for medication.timings.iter().map(|timing| html!(
                    <> <Label label={timing.take_time.format("%H:%M").to_string()}/> {" "} </>
                )) }
            </p>
            <p>{ format!("Taken {} time(s) today", props.taken_today) }</p>
            <Toolbar>
                <ToolbarItem>
                    <Button label="Record intake" variant={ButtonVariant::Secondary} disabled={record.loading} onclick={on_take}/>
                </ToolbarItem>
                <ToolbarItem>
                    <Button label="Remove" variant={ButtonVariant::Danger} disabled={delete.loading} onclick={on_delete}/>
                </ToolbarItem>
            </Toolbar>
            {
                match (&record.error, &delete.error) {
                    (Some(err), _) | (_, Some(err)) => html!(format!("Failed: {err}")),
                    _ => html!(),
                }
            }
        </Content>
    )
}
