use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger, PreviousHash};
use crate::consensus::ChainClient;
use crate::transaction::Transaction;

/// Shared application state: the node's ledger, its identity and the client
/// used to reach peers.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    /// Recipient of this node's mining rewards.
    pub node_id: String,
    pub client: ChainClient,
}

impl AppState {
    pub fn new(node_id: String, client: ChainClient) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            node_id,
            client,
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/* ---------- Mining ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub seal: u64,
    pub previous_hash: PreviousHash,
}

impl From<&Block> for MineResponse {
    fn from(block: &Block) -> Self {
        Self {
            message: "New Block Forged",
            index: block.index,
            transactions: block.transactions.clone(),
            seal: block.seal,
            previous_hash: block.previous_hash.clone(),
        }
    }
}

/* ---------- Chain ---------- */

/// `/chain` body. Peers parse this same shape back as a `PeerChain`.
#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

/* ---------- Nodes ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub message: &'static str,
    pub chain: &'a [Block],
}
