use std::time::Duration;

use log::{debug, warn};

use super::PeerChain;

/// HTTP client that pulls `/chain` from peers.
///
/// Every failure (connect error, timeout, non-2xx status, unparsable body)
/// collapses into `None`; a bad peer never fails a resolution round.
#[derive(Debug, Clone)]
pub struct ChainClient {
    http: reqwest::Client,
}

impl ChainClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub async fn fetch_chain(&self, peer: String) -> Option<PeerChain> {
        let url = format!("http://{peer}/chain");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("peer {peer} unreachable: {err}");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("peer {peer} answered {}", response.status());
            return None;
        }

        match response.json::<PeerChain>().await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!("peer {peer} sent a malformed chain payload: {err}");
                None
            }
        }
    }
}
