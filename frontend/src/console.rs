use crate::common::{api, session};
use crate::pages::{self, AppRoute, MedicationRoute, View};
use crate::routes::RouteTable;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;
use yew_nested_router::prelude::{Switch as RouterSwitch, *};

#[function_component(Console)]
pub fn console() -> Html {
    let logo = html! (
        <Brand src="images/logo.png" alt="Medikeep" />
    );

    let sidebar = html_nested!(
        <PageSidebar>
            <Nav>
                <NavList>
                    <NavExpandable title="Medications">
                        <NavRouterItem<AppRoute> to={AppRoute::Dashboard}>{ "Dashboard" }</NavRouterItem<AppRoute>>
                        <NavRouterItem<AppRoute> to={AppRoute::Medications(MedicationRoute::Add)}>{ "Add medication" }</NavRouterItem<AppRoute>>
                    </NavExpandable>
                    <NavExpandable title="Account">
                        <NavRouterItem<AppRoute> to={AppRoute::Login}>{ "Sign in" }</NavRouterItem<AppRoute>>
                        <NavRouterItem<AppRoute> to={AppRoute::Register}>{ "Register" }</NavRouterItem<AppRoute>>
                    </NavExpandable>
                </NavList>
            </Nav>
        </PageSidebar>
    );

    let tools = html!(<Tools/>);

    html!(
        <Router<AppRoute>>
            <Page {logo} {sidebar} {tools}>
                <RouterSwitch<AppRoute> {render}/>
            </Page>
        </Router<AppRoute>>
    )
}

// needs to sit below the `Router`, it navigates after signing out
#[function_component(Tools)]
fn tools() -> Html {
    let router = use_router::<AppRoute>();
    let routes = use_context::<Rc<RouteTable>>();

    let onclick = {
        let router = router.clone();
        let routes = routes.clone();
        Callback::from(move |_| {
            // revoke the token server-side, then forget it locally
            if let Some(session) = session::load() {
                yew::platform::spawn_local(async move {
                    if let Err(err) = api::logout(&session.token).await {
                        log::warn!("logout failed: {err}");
                    }
                });
            }
            session::clear();
            if let (Some(router), Some(routes)) = (&router, &routes) {
                if let Some(target) = routes.target("login") {
                    router.push(target);
                }
            }
        })
    };

    html!(
        <Toolbar>
            <ToolbarItem>
                <Button label="Sign out" {onclick}/>
            </ToolbarItem>
        </Toolbar>
    )
}

fn render(route: AppRoute) -> Html {
    log::info!("Route: {route:?}");
    match route.view() {
        View::Login => html!(<pages::Login/>),
        View::Register => html!(<pages::Register/>),
        View::Dashboard => html!(<pages::Dashboard/>),
        View::AddMedication => html!(<pages::AddMedication/>),
    }
}
