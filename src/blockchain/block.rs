use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::hasher;
use super::{GENESIS_PREVIOUS_HASH, GENESIS_SEAL};
use crate::transaction::Transaction;

/// Link from a block to its predecessor.
///
/// Every block but the genesis carries the predecessor's digest. The genesis
/// carries a bare integer marker, which travels on the wire as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviousHash {
    Digest(String),
    Sentinel(u64),
}

impl PreviousHash {
    pub fn matches(&self, digest: &str) -> bool {
        matches!(self, PreviousHash::Digest(own) if own == digest)
    }
}

/// A sealed block of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: Number, // seconds since the Unix epoch, as received
    pub transactions: Vec<Transaction>,
    pub seal: u64, // proof-of-work value
    pub previous_hash: PreviousHash,
}

impl Block {
    /// The first block of every chain. It is trusted by convention and never
    /// checked against a predecessor.
    pub fn genesis() -> Self {
        Self::new_with_timestamp(
            1,
            now(),
            Vec::new(),
            GENESIS_SEAL,
            PreviousHash::Sentinel(GENESIS_PREVIOUS_HASH),
        )
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        seal: u64,
        previous_hash: PreviousHash,
    ) -> Self {
        Self::new_with_timestamp(index, now(), transactions, seal, previous_hash)
    }

    pub fn new_with_timestamp(
        index: u64,
        timestamp: Number,
        transactions: Vec<Transaction>,
        seal: u64,
        previous_hash: PreviousHash,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            seal,
            previous_hash,
        }
    }

    pub fn digest(&self) -> String {
        hasher::digest(self)
    }
}

/// Current time as fractional seconds with microsecond resolution.
fn now() -> Number {
    let now = Utc::now();
    Number::from_f64(now.timestamp_micros() as f64 / 1_000_000.0)
        .unwrap_or_else(|| Number::from(now.timestamp()))
}
