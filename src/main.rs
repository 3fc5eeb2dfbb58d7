mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod transaction;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenvy::dotenv;
use log::info;
use uuid::Uuid;

use api::AppState;
use config::Config;
use consensus::ChainClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::parse();
    let node_id = Uuid::new_v4().simple().to_string();
    let client = ChainClient::new(config.peer_timeout()).map_err(std::io::Error::other)?;

    info!(
        "⛓️ Starting ledger node {node_id} at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(node_id, client));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
