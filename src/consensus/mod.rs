//! Longest-valid-chain conflict resolution.
//!
//! Every known peer is asked for its chain. A candidate replaces ours only if
//! it is strictly longer than the best chain seen so far and it validates.
//! Peers that cannot be reached or answer with garbage are skipped.

pub mod client;
pub mod peers;

use std::future::Future;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::blockchain::{Block, is_valid_chain};

pub use client::ChainClient;
pub use peers::PeerSet;

/// Upper bound on peer queries in flight at once.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Body of a peer's `/chain` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No peer offered a strictly longer valid chain.
    Authoritative,
    /// The longest valid chain found among peers.
    Replaced(Vec<Block>),
}

impl Resolution {
    pub fn replaced(&self) -> bool {
        matches!(self, Resolution::Replaced(_))
    }
}

/// Query `peers` through `fetch` and pick the longest valid chain that beats `local`.
///
/// Queries run concurrently but their answers are weighed in peer order, so
/// among equally long winners the first peer listed wins.
pub async fn resolve<P, F, Fut>(peers: P, local: &[Block], mut fetch: F) -> Resolution
where
    P: IntoIterator<Item = String>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Option<PeerChain>>,
{
    let answers: Vec<(String, Option<PeerChain>)> = stream::iter(peers)
        .map(|peer| {
            let answer = fetch(peer.clone());
            async move { (peer, answer.await) }
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    match longest_valid(local.len(), answers) {
        Some(chain) => Resolution::Replaced(chain),
        None => Resolution::Authoritative,
    }
}

fn longest_valid<I>(local_len: usize, answers: I) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = (String, Option<PeerChain>)>,
{
    let mut best_len = local_len;
    let mut best = None;

    for (peer, answer) in answers {
        let Some(PeerChain { chain, length }) = answer else {
            debug!("skipping peer {peer}: no chain");
            continue;
        };
        if length != chain.len() {
            warn!("skipping peer {peer}: claims length {length} but sent {} blocks", chain.len());
            continue;
        }
        if length <= best_len {
            continue;
        }
        if !is_valid_chain(&chain) {
            warn!("skipping peer {peer}: chain of length {length} failed validation");
            continue;
        }
        info!("peer {peer} offers a longer valid chain ({length} > {best_len})");
        best_len = length;
        best = Some(chain);
    }

    best
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use futures::executor::block_on;

    use super::*;
    use crate::blockchain::{Ledger, PreviousHash, pow};
    use crate::transaction::Transaction;

    fn offer(chain: &[Block]) -> Option<PeerChain> {
        Some(PeerChain {
            chain: chain.to_vec(),
            length: chain.len(),
        })
    }

    fn mine(ledger: &mut Ledger, sender: &str) {
        ledger.queue_transaction(Transaction::new(sender, "bob", 5.into()));
        let seal = pow::seal(ledger.last_block().seal);
        ledger.forge_block(seal, "miner").unwrap();
    }

    fn ledger_of_len(len: usize, sender: &str) -> Ledger {
        let mut ledger = Ledger::new();
        while ledger.len() < len {
            mine(&mut ledger, sender);
        }
        ledger
    }

    fn run(local: &[Block], network: &HashMap<String, Option<PeerChain>>) -> Resolution {
        let mut peers: Vec<String> = network.keys().cloned().collect();
        peers.sort();
        block_on(resolve(peers, local, |peer| {
            let answer = network.get(&peer).cloned().flatten();
            async move { answer }
        }))
    }

    fn network(entries: Vec<(&str, Option<PeerChain>)>) -> HashMap<String, Option<PeerChain>> {
        entries.into_iter().map(|(p, c)| (p.to_string(), c)).collect()
    }

    #[test]
    fn no_peers_keeps_local_chain() {
        let local = ledger_of_len(2, "a");
        assert_eq!(run(local.chain(), &HashMap::new()), Resolution::Authoritative);
    }

    #[test]
    fn equal_length_divergent_chain_does_not_replace() {
        let local = ledger_of_len(3, "a");
        let other = ledger_of_len(3, "b");
        assert_ne!(local.chain(), other.chain());

        let net = network(vec![("b:1", offer(other.chain()))]);
        assert!(!run(local.chain(), &net).replaced());
    }

    #[test]
    fn shorter_chain_never_wins() {
        let local = ledger_of_len(3, "a");
        let other = ledger_of_len(2, "b");
        let net = network(vec![("b:1", offer(other.chain()))]);
        assert_eq!(run(local.chain(), &net), Resolution::Authoritative);
    }

    #[test]
    fn longest_of_several_valid_chains_wins() {
        let local = ledger_of_len(1, "a");
        let mid = ledger_of_len(2, "b");
        let long = ledger_of_len(3, "c");
        let net = network(vec![
            ("a:1", offer(mid.chain())),
            ("b:1", offer(long.chain())),
            ("c:1", None),
        ]);
        assert_eq!(
            run(local.chain(), &net),
            Resolution::Replaced(long.chain().to_vec())
        );
    }

    #[test]
    fn invalid_longer_chain_is_skipped() {
        let local = ledger_of_len(2, "a");
        let mut forged = ledger_of_len(3, "b").chain().to_vec();
        forged[2].previous_hash = PreviousHash::Digest("0".repeat(64));
        let honest = ledger_of_len(3, "c");

        let net = network(vec![
            ("a:1", offer(&forged)),
            ("b:1", offer(honest.chain())),
        ]);
        assert_eq!(
            run(local.chain(), &net),
            Resolution::Replaced(honest.chain().to_vec())
        );
    }

    #[test]
    fn inflated_length_claim_is_skipped() {
        let local = ledger_of_len(3, "a");
        let short = ledger_of_len(1, "b");
        let lying = PeerChain {
            chain: short.chain().to_vec(),
            length: 10,
        };
        let net = network(vec![("b:1", Some(lying))]);
        assert_eq!(run(local.chain(), &net), Resolution::Authoritative);
    }

    #[test]
    fn two_nodes_converge_on_the_longer_chain() {
        let mut node_a = ledger_of_len(3, "alice");
        let mut node_b = ledger_of_len(3, "bob");
        node_a.register_peer("http://node-b:5002").unwrap();

        let fetch_from_b = |b: &Ledger| {
            let net = network(vec![("node-b:5002", offer(b.chain()))]);
            run(node_a.chain(), &net)
        };

        assert_eq!(fetch_from_b(&node_b), Resolution::Authoritative);

        mine(&mut node_b, "bob");
        assert_eq!(node_b.len(), 4);

        let Resolution::Replaced(chain) = fetch_from_b(&node_b) else {
            panic!("expected node A to adopt node B's chain");
        };
        node_a.replace_chain(chain);
        assert_eq!(node_a.chain(), node_b.chain());
        assert!(node_a.len() >= 3);
    }

    #[test]
    fn chain_payload_parses_from_wire() {
        let b = ledger_of_len(2, "a");
        let wire = serde_json::json!({ "chain": b.chain(), "length": b.len() }).to_string();
        let parsed: PeerChain = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed.chain, b.chain());
        assert!(is_valid_chain(&parsed.chain));
    }
}
