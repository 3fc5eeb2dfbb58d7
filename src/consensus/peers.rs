use std::collections::HashSet;

use crate::error::{LedgerError, Result};

/// Known peers keyed by canonical `host:port`. Iteration order carries no meaning.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    peers: HashSet<String>,
}

impl PeerSet {
    /// Normalize and insert one address. Returns `false` if it was already known.
    pub fn insert(&mut self, address: &str) -> Result<bool> {
        let peer = normalize_address(address)?;
        Ok(self.peers.insert(peer))
    }

    /// Normalize every address first and insert only if all of them are valid.
    pub fn extend<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<()> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.peers.extend(normalized);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peers in lexical order, for stable responses.
    pub fn sorted(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.iter().cloned().collect();
        peers.sort_unstable();
        peers
    }
}

/// Reduce a peer address to its canonical authority.
///
/// Accepts full URLs (`http://10.0.0.5:5000/`), scheme-relative ones
/// (`//10.0.0.5:5000`) and bare authorities (`10.0.0.5:5000`). Any path,
/// query, fragment or userinfo is dropped and the host is lowercased.
///
/// An address with no authority (`/peer`, `http:///peer`) is identified by
/// its path instead, kept verbatim. Only an address with neither is invalid.
pub fn normalize_address(address: &str) -> Result<String> {
    let invalid = || LedgerError::InvalidAddress(address.to_string());
    let trimmed = address.trim();

    let rest = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let scheme_ok = !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !scheme_ok {
                return Err(invalid());
            }
            rest
        }
        None => trimmed.strip_prefix("//").unwrap_or(trimmed),
    };

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(end);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    let peer = if authority.is_empty() {
        let path = &tail[..tail.find(['?', '#']).unwrap_or(tail.len())];
        path.to_string()
    } else {
        authority.to_ascii_lowercase()
    };

    if peer.is_empty() || peer.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(peer)
}
