use crate::common::{api, session};
use crate::pages::AppRoute;
use crate::routes::RouteTable;
use chrono::NaiveTime;
use medikeep_model::MedicationCreate;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;
use yew_hooks::{use_async, UseAsyncState};
use yew_nested_router::prelude::*;

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("not a time of day: {value}"))
}

#[function_component(AddMedication)]
pub fn add_medication() -> Html {
    let name = use_state_eq(String::new);
    let dosage = use_state_eq(String::new);
    let memo = use_state_eq(String::new);
    let as_needed = use_state_eq(|| false);
    let timings = use_state_eq(Vec::<NaiveTime>::new);
    let new_time = use_state_eq(String::new);
    let time_error = use_state_eq(|| None::<String>);

    let router = use_router::<AppRoute>();
    let routes = use_context::<Rc<RouteTable>>();

    let submit = {
        let name = name.clone();
        let dosage = dosage.clone();
        let memo = memo.clone();
        let as_needed = as_needed.clone();
        let timings = timings.clone();
        let router = router.clone();
        let routes = routes.clone();
        use_async(async move {
            let token = session::load()
                .map(|session| session.token)
                .ok_or_else(|| "Not signed in".to_string())?;

            let created = api::create_medication(
                &token,
                &MedicationCreate {
                    name: (*name).clone(),
                    dosage: (*dosage).clone(),
                    is_as_needed: *as_needed,
                    memo: match memo.trim().is_empty() {
                        true => None,
                        false => Some((*memo).clone()),
                    },
                    timings: (*timings).clone(),
                },
            )
            .await?;

            if let (Some(router), Some(routes)) = (&router, &routes) {
                if let Some(target) = routes.target("dashboard") {
                    router.push(target);
                }
            }
            Ok::<_, String>(created)
        })
    };

    let onclick = {
        let submit = submit.clone();
        Callback::from(move |_| {
            submit.run();
        })
    };

    let onchange_name = use_callback(
        move |value: String, name| {
            name.set(value);
        },
        name.clone(),
    );
    let onchange_dosage = use_callback(
        move |value: String, dosage| {
            dosage.set(value);
        },
        dosage.clone(),
    );
    let onchange_memo = use_callback(
        move |value: String, memo| {
            memo.set(value);
        },
        memo.clone(),
    );
    let onchange_as_needed = use_callback(
        move |value: bool, as_needed| {
            as_needed.set(value);
        },
        as_needed.clone(),
    );
    let onchange_new_time = use_callback(
        move |value: String, new_time| {
            new_time.set(value);
        },
        new_time.clone(),
    );

    let on_add_time = {
        let timings = timings.clone();
        let new_time = new_time.clone();
        let time_error = time_error.clone();
        Callback::from(move |_| match parse_time(&new_time) {
            Ok(time) => {
                let mut list = (*timings).clone();
                if !list.contains(&time) {
                    list.push(time);
                    list.sort();
                }
                timings.set(list);
                new_time.set(String::new());
                time_error.set(None);
            }
            Err(err) => {
                time_error.set(Some(err));
            }
        })
    };

    html!(
        <>
        <PageSection variant={PageSectionVariant::Light}>
            <Content>
                <Title size={Size::XXXXLarge}>{ "Add medication" }</Title>
            </Content>
        </PageSection>

        <PageSection fill=true>
            <Form>
                <FormGroup label="Name" required=true>
                    <TextInput onchange={onchange_name} value={(*name).clone()} required=true placeholder="Aspirin"/>
                </FormGroup>
                <FormGroup label="Dosage" required=true>
                    <TextInput onchange={onchange_dosage} value={(*dosage).clone()} required=true placeholder="100mg"/>
                </FormGroup>
                <FormGroup label="Memo">
                    <TextInput onchange={onchange_memo} value={(*memo).clone()} placeholder="After breakfast"/>
                </FormGroup>
                <FormGroup>
                    <Switch checked={*as_needed} label="Take only as needed" onchange={onchange_as_needed}/>
                </FormGroup>
                <FormGroup label="Times of day">
                    <Flex>
                        <FlexItem>
                            <TextInput onchange={onchange_new_time} value={(*new_time).clone()} placeholder="08:00"/>
                        </FlexItem>
                        <FlexItem>
                            <Button label="Add time" variant={ButtonVariant::Secondary} onclick={on_add_time}/>
                        </FlexItem>
                    </Flex>
                    if let Some(err) = &*time_error {
                        { err.clone() }
                    }
                    <p>
                        { for timings.iter().enumerate().map(|(index, time)| {
                            let onclick = {
                                let timings = timings.clone();
                                Callback::from(move |_| {
                                    let mut list = (*timings).clone();
                                    list.remove(index);
                                    timings.set(list);
                                })
                            };
                            html!(
                                <>
                                    <Label label={time.format("%H:%M").to_string()}/>
                                    <Button label="x" variant={ButtonVariant::Plain} {onclick}/>
                                    {" "}
                                </>
                            )
                        }) }
                    </p>
                </FormGroup>
                <ActionGroup>
                    <Button label="Save" variant={ButtonVariant::Primary} disabled={submit.loading} {onclick}/>
                </ActionGroup>
            </Form>
            {
                match &*submit {
                    UseAsyncState { loading: true, .. } => html!("Saving..."),
                    UseAsyncState { error: Some(err), .. } => html!(format!("Failed: {err}")),
                    _ => html!(),
                }
            }
        </PageSection>
        </>
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_short_and_long_times() {
        assert_eq!(
            parse_time("8:30"),
            Ok(NaiveTime::from_hms_opt(8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_time("08:30:15"),
            Ok(NaiveTime::from_hms_opt(8, 30, 15).unwrap())
        );
    }

    #[test]
    fn rejects_nonsense() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("soon").is_err());
    }
}
