use sha2::{Digest, Sha256};

/// Required prefix of the hex digest: four zero nibbles, i.e. 16 leading zero bits.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Whether `candidate` seals a block whose predecessor carries `previous`.
///
/// The preimage is the decimal text of both seals concatenated.
pub fn is_valid(previous: u64, candidate: u64) -> bool {
    let guess = format!("{previous}{candidate}");
    hex::encode(Sha256::digest(guess.as_bytes())).starts_with(DIFFICULTY_PREFIX)
}

/// Brute-force the smallest seal valid against `previous`.
///
/// Blocks the calling thread; the expected search length is about 65536 tries.
/// The counter is a `u64`, far beyond anything the fixed difficulty can reach.
pub fn seal(previous: u64) -> u64 {
    let mut candidate = 0u64;
    while !is_valid(previous, candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_after_genesis() {
        assert_eq!(seal(100), 35293);
        assert!(is_valid(100, 35293));
    }

    #[test]
    fn seal_is_smallest_valid_candidate() {
        let found = seal(35293);
        assert_eq!(found, 35089);
        assert!((0..found).all(|c| !is_valid(35293, c)));
    }

    #[test]
    fn sealed_values_always_validate() {
        for previous in [0, 1, 7, 100, 65_536, u32::MAX as u64] {
            assert!(is_valid(previous, seal(previous)));
        }
    }

    #[test]
    fn rejects_neighbouring_values() {
        assert!(!is_valid(100, 35292));
        assert!(!is_valid(101, 35293));
    }
}
