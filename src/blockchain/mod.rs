pub mod block;
pub mod hasher;
pub mod ledger;
pub mod pow;
pub mod validator;

pub use block::{Block, PreviousHash};
pub use ledger::Ledger;
pub use validator::is_valid_chain;

/// Seal carried by the genesis block.
pub const GENESIS_SEAL: u64 = 100;

/// Marker the genesis block holds in place of a predecessor digest.
pub const GENESIS_PREVIOUS_HASH: u64 = 1;

/// Sender recorded on mining reward transactions.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner for each forged block.
pub const MINING_REWARD: u64 = 1;
