use crate::console::Console;
use crate::routes::RouteTable;
use patternfly_yew::*;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ApplicationProps {
    pub routes: Rc<RouteTable>,
}

#[function_component(Application)]
pub fn app(props: &ApplicationProps) -> Html {
    html!(
        <ContextProvider<Rc<RouteTable>> context={props.routes.clone()}>
            <ToastViewer>
                <BackdropViewer>
                    <Console />
                </BackdropViewer>
            </ToastViewer>
        </ContextProvider<Rc<RouteTable>>>
    )
}
