#![recursion_limit = "1024"]
#![allow(clippy::needless_return)]

mod app;
mod common;
mod console;
mod pages;
mod routes;

use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: log::Level = log::Level::Info;
#[cfg(debug_assertions)]
const LOG_LEVEL: log::Level = log::Level::Trace;

pub fn main() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::new(LOG_LEVEL));

    // a broken route table is a build defect, refuse to start
    let routes = routes::RouteTable::build().map_err(|err| JsValue::from_str(&err.to_string()))?;

    if let Ok(path) = gloo_utils::window().location().pathname() {
        match routes.resolve(&path) {
            Some(route) => log::debug!("entry route: {} ({})", route.name, route.path),
            None => log::debug!("entry path has no route: {path}"),
        }
    }

    yew::Renderer::<app::Application>::with_props(app::ApplicationProps {
        routes: Rc::new(routes),
    })
    .render();
    Ok(())
}
