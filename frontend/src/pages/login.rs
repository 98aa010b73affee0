use crate::common::{api, session};
use crate::pages::AppRoute;
use crate::routes::RouteTable;
use medikeep_model::Credentials;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;
use yew_hooks::{use_async, UseAsyncState};
use yew_nested_router::prelude::*;

#[function_component(Login)]
pub fn login() -> Html {
    let email = use_state_eq(String::new);
    let password = use_state_eq(String::new);

    let router = use_router::<AppRoute>();
    let routes = use_context::<Rc<RouteTable>>();

    let login = {
        let email = email.clone();
        let password = password.clone();
        let router = router.clone();
        let routes = routes.clone();
        use_async(async move {
            let session = api::login(&Credentials {
                email: (*email).clone(),
                password: (*password).clone(),
            })
            .await?;
            session::store(&session);

            // navigation by name, the route table knows where "dashboard" lives
            if let (Some(router), Some(routes)) = (&router, &routes) {
                if let Some(target) = routes.target("dashboard") {
                    router.push(target);
                }
            }
            Ok::<_, String>(session)
        })
    };

    let onclick = {
        let login = login.clone();
        Callback::from(move |_| {
            login.run();
        })
    };

    let onchange_email = use_callback(
        move |value: String, email| {
            email.set(value);
        },
        email.clone(),
    );
    let onchange_password = use_callback(
        move |value: String, password| {
            password.set(value);
        },
        password.clone(),
    );

    // base-aware href, so the link survives deployments under a prefix
    let register_href = routes
        .as_ref()
        .and_then(|routes| routes.href("register"))
        .unwrap_or_else(|| "/register".to_string());

    html!(
        <>
        <PageSection variant={PageSectionVariant::Light}>
            <Content>
                <Title size={Size::XXXXLarge}>{ "Sign in" }</Title>
                <p>{ "Track your medications and record your intakes." }</p>
            </Content>
        </PageSection>

        <PageSection fill=true>
            <Form>
                <FormGroup label="Email" required=true>
                    <TextInput onchange={onchange_email} value={(*email).clone()} required=true placeholder="you@example.com"/>
                </FormGroup>
                <FormGroup label="Password" required=true>
                    <TextInput onchange={onchange_password} value={(*password).clone()} required=true r#type={TextInputType::Password}/>
                </FormGroup>
                <ActionGroup>
                    <Button label="Sign in" variant={ButtonVariant::Primary} disabled={login.loading} {onclick}/>
                </ActionGroup>
            </Form>
            {
                match &*login {
                    UseAsyncState { loading: true, .. } => html!("Signing in..."),
                    UseAsyncState { error: Some(err), .. } => html!(format!("Failed: {err}")),
                    _ => html!(),
                }
            }
            <Content>
                <p>{ "No account yet? " } <a href={register_href}>{ "Register" }</a></p>
            </Content>
        </PageSection>
        </>
    )
}
