use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::blockchain::Ledger;
use crate::consensus::{self, Resolution};

/// Register peer addresses. The whole list is rejected if any entry is malformed.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes");
    };

    let mut ledger = state.ledger.lock();
    if let Err(err) = ledger.register_peers(nodes.as_slice()) {
        warn!("POST /nodes/register - rejected: {err}");
        return HttpResponse::BadRequest().body(err.to_string());
    }
    debug!(
        "POST /nodes/register - {} submitted, {} known",
        nodes.len(),
        ledger.peers().len()
    );

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes: ledger.peers().sorted(),
    })
}

/// Adopt the longest valid chain among known peers.
#[get("/nodes/resolve")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let (peers, local) = {
        let ledger = state.ledger.lock();
        (ledger.peers().sorted(), ledger.chain().to_vec())
    };

    let client = &state.client;
    let resolution = consensus::resolve(peers, &local, move |peer| client.fetch_chain(peer)).await;

    debug!(
        "CONSENSUS - queried peers, longer valid chain found: {}",
        resolution.replaced()
    );

    let mut ledger = state.ledger.lock();
    let message = adopt(&mut ledger, resolution);

    HttpResponse::Ok().json(ResolveResponse {
        message,
        chain: ledger.chain(),
    })
}

/// Apply a resolution to the locked ledger and return the response message.
fn adopt(ledger: &mut Ledger, resolution: Resolution) -> &'static str {
    match resolution {
        // The local chain may have grown while peers were queried.
        Resolution::Replaced(chain) if chain.len() > ledger.len() => {
            info!(
                "CONSENSUS - replacing local chain ({} blocks) with peer chain ({} blocks)",
                ledger.len(),
                chain.len()
            );
            ledger.replace_chain(chain);
            "Our chain was replaced"
        }
        Resolution::Replaced(chain) => {
            debug!(
                "CONSENSUS - local chain grew to {} blocks, dropping peer chain of {}",
                ledger.len(),
                chain.len()
            );
            "Our chain is authoritative"
        }
        Resolution::Authoritative => "Our chain is authoritative",
    }
}
