mod cli;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use crate::cli::Cli;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli: Cli = Cli::parse();

    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("medikeep_server", cli.log.into())
        .init();

    medikeep_server::run(cli.database.clone(), cli.bind.clone(), cli.port).await
}
