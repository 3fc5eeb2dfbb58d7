use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value transfer waiting in the pending pool or sealed into a block.
///
/// `amount` keeps the JSON number exactly as it was submitted so that a block
/// received from a peer re-hashes to the same digest it had on that peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}
