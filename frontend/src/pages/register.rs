use crate::common::api;
use crate::pages::AppRoute;
use crate::routes::RouteTable;
use medikeep_model::UserCreate;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;
use yew_hooks::{use_async, UseAsyncState};
use yew_nested_router::prelude::*;

#[function_component(Register)]
pub fn register() -> Html {
    let username = use_state_eq(String::new);
    let email = use_state_eq(String::new);
    let password = use_state_eq(String::new);

    let router = use_router::<AppRoute>();
    let routes = use_context::<Rc<RouteTable>>();

    let register = {
        let username = username.clone();
        let email = email.clone();
        let password = password.clone();
        let router = router.clone();
        let routes = routes.clone();
        use_async(async move {
            let user = api::register(&UserCreate {
                username: (*username).clone(),
                email: (*email).clone(),
                password: (*password).clone(),
            })
            .await?;

            if let (Some(router), Some(routes)) = (&router, &routes) {
                if let Some(target) = routes.target("login") {
                    router.push(target);
                }
            }
            Ok::<_, String>(user)
        })
    };

    let onclick = {
        let register = register.clone();
        Callback::from(move |_| {
            register.run();
        })
    };

    let onchange_username = use_callback(
        move |value: String, username| {
            username.set(value);
        },
        username.clone(),
    );
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

    let login_href = routes
        .as_ref()
        .and_then(|routes| routes.href("login"))
        .unwrap_or_else(|| "/login".to_string());

    html!(
        <>
        <PageSection variant={PageSectionVariant::Light}>
            <Content>
                <Title size={Size::XXXXLarge}>{ "Register" }</Title>
            </Content>
        </PageSection>

        <PageSection fill=true>
            <Form>
                <FormGroup label="Username" required=true>
                    <TextInput onchange={onchange_username} value={(*username).clone()} required=true/>
                </FormGroup>
                <FormGroup label="Email" required=true>
                    <TextInput onchange={onchange_email} value={(*email).clone()} required=true placeholder="you@example.com"/>
                </FormGroup>
                <FormGroup label="Password" required=true>
                    <TextInput onchange={onchange_password} value={(*password).clone()} required=true r#type={TextInputType::Password}/>
                </FormGroup>
                <ActionGroup>
                    <Button label="Create account" variant={ButtonVariant::Primary} disabled={register.loading} {onclick}/>
                </ActionGroup>
            </Form>
            {
                match &*register {
                    UseAsyncState { loading: true, .. } => html!("Creating account..."),
                    UseAsyncState { error: Some(err), .. } => html!(format!("Failed: {err}")),
                    _ => html!(),
                }
            }
            <Content>
                <p>{ "Already registered? " } <a href={login_href}>{ "Sign in" }</a></p>
            </Content>
        </PageSection>
        </>
    )
}
