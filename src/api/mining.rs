use actix_web::{HttpResponse, Responder, get, web};
use log::{error, info, warn};

use super::models::{AppState, MineResponse};
use crate::blockchain::pow;

/// Forge the next block:
/// - search a seal against the current tip on the blocking pool, outside the lock
/// - under the lock, re-check the seal against the tip, credit the reward and commit
/// - if the tip moved meanwhile, search again
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    loop {
        let tip_seal = state.ledger.lock().last_block().seal;

        let seal = match web::block(move || pow::seal(tip_seal)).await {
            Ok(seal) => seal,
            Err(err) => {
                error!("MINER - proof-of-work task failed: {err}");
                return HttpResponse::InternalServerError().body("proof-of-work search failed");
            }
        };

        let mut ledger = state.ledger.lock();
        match ledger.forge_block(seal, &state.node_id) {
            Ok(block) => {
                info!(
                    "MINER - forged block #{} (seal={}, txs={})",
                    block.index,
                    block.seal,
                    block.transactions.len()
                );
                return HttpResponse::Ok().json(MineResponse::from(block));
            }
            Err(err) => warn!("MINER - {err}, tip moved; searching again"),
        }
    }
}
