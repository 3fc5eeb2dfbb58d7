use actix_web::{HttpResponse, Responder, post, web};
use log::debug;

use super::models::{AppState, MessageResponse};
use crate::transaction::Transaction;

/// Queue a transaction for the next mined block.
///
/// `sender`, `recipient` and `amount` are all required; the shared JSON
/// error handler answers `400` when any is missing.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> impl Responder {
    let tx = body.into_inner();
    debug!(
        "POST /transactions/new - {} -> {} ({})",
        tx.sender, tx.recipient, tx.amount
    );

    let index = {
        let mut ledger = state.ledger.lock();
        let index = ledger.queue_transaction(tx);
        debug!("POST /transactions/new - pending pool size now {}", ledger.pending().len());
        index
    };

    HttpResponse::Created().json(MessageResponse {
        message: format!("Transaction will be added to Block {index}"),
    })
}
