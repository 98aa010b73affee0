#![deny(warnings)]

mod api;
mod auth;
mod error;
mod store;

use actix_web::{web, App, HttpServer};
use auth::Sessions;
use std::path::PathBuf;
use std::process::exit;
use store::Store;

pub async fn run(database: PathBuf, bind: String, port: u16) -> std::io::Result<()> {
    let store = match Store::open(&database).await {
        Ok(store) => store,
        Err(err) => {
            log::error!("unable to open database {}: {err}", database.display());
            exit(-1);
        }
    };

    let store = web::Data::new(store);
    let sessions = web::Data::new(Sessions::new());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(sessions.clone())
            .service(api::service())
    });

    log::info!("starting up at http://{}:{}/", bind, port);

    server.bind((bind, port))?.run().await
}
