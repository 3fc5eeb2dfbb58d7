use serde_json::Number;

use super::{Block, MINING_REWARD, PreviousHash, REWARD_SENDER, pow};
use crate::consensus::PeerSet;
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory chain, pending-transaction pool and known peers of one node.
///
/// Every mutation takes `&mut self`; the HTTP layer keeps the ledger behind a
/// single mutex so mutations never interleave.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: PeerSet,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            peers: PeerSet::default(),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    /// Return the chain head.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Add a transaction to the pending pool and return the index of the
    /// block it will be mined into.
    pub fn queue_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Append a block sealed with `seal`, draining the pending pool into it.
    ///
    /// The seal must satisfy proof-of-work against the current head; a seal
    /// found against a head that has since moved is rejected untouched.
    pub fn mine_block(&mut self, seal: u64) -> Result<&Block> {
        self.check_seal(seal)?;

        let (index, previous_hash) = {
            let last = self.last_block();
            (last.index + 1, PreviousHash::Digest(last.digest()))
        };
        let block = Block::new(index, std::mem::take(&mut self.pending), seal, previous_hash);
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Credit the mining reward to `miner` and mine the next block.
    ///
    /// Nothing is queued when the seal turns out to be stale.
    pub fn forge_block(&mut self, seal: u64, miner: &str) -> Result<&Block> {
        self.check_seal(seal)?;
        self.queue_transaction(Transaction::new(
            REWARD_SENDER,
            miner,
            Number::from(MINING_REWARD),
        ));
        self.mine_block(seal)
    }

    /// Swap in `candidate` wholesale. Callers validate it first.
    ///
    /// An empty candidate is ignored so the ledger always keeps a head.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) {
        if candidate.is_empty() {
            return;
        }
        self.chain = candidate;
    }

    /// Normalize and remember a peer address. Returns `false` if the peer
    /// was already known.
    pub fn register_peer(&mut self, address: &str) -> Result<bool> {
        self.peers.insert(address)
    }

    /// Register every address or none of them.
    pub fn register_peers<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<()> {
        self.peers.extend(addresses)
    }

    fn check_seal(&self, seal: u64) -> Result<()> {
        let tip_seal = self.last_block().seal;
        if pow::is_valid(tip_seal, seal) {
            Ok(())
        } else {
            Err(LedgerError::StaleSeal { tip_seal, seal })
        }
    }
}
