use log::debug;

use super::{Block, pow};

/// Check linkage and seals of a candidate chain.
///
/// The first block is trusted as-is. Every later block must name the digest of
/// its predecessor and carry a seal valid against the predecessor's seal. An
/// empty chain has no genesis to trust and is rejected.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }

    chain.windows(2).all(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);
        debug!("validating block #{} against #{}", current.index, prev.index);

        if !current.previous_hash.matches(&prev.digest()) {
            debug!("block #{} does not link to its predecessor", current.index);
            return false;
        }
        if !pow::is_valid(prev.seal, current.seal) {
            debug!("block #{} carries an invalid seal {}", current.index, current.seal);
            return false;
        }
        true
    })
}
