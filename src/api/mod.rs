mod chain;
mod health;
mod mining;
pub mod models;
mod nodes;
mod tx;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::web::{self, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse};
use log::warn;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_body))
        .service(health::health_check)
        .service(tx::new_transaction)
        .service(mining::mine)
        .service(chain::get_chain)
        .service(nodes::register_nodes)
        .service(nodes::resolve_conflicts);
}

/// Bodies that are not JSON or lack a required field get a plain 400.
fn reject_body(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("{} {} - rejected body: {err}", req.method(), req.path());
    InternalError::from_response(err, HttpResponse::BadRequest().body("Missing values")).into()
}

#[cfg(test)]
pub(crate) fn test_state() -> web::Data<AppState> {
    use std::time::Duration;

    use crate::consensus::ChainClient;

    let client = ChainClient::new(Duration::from_secs(2)).expect("http client");
    web::Data::new(AppState::new("test-node".to_string(), client))
}
