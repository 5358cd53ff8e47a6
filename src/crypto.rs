//! Hashing primitives for ReceiptChain
//!
//! Every fingerprint in the ledger is a SHA-256 digest rendered as a
//! lowercase hex string: block hashes, receipt IDs and renter IDs.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash the concatenation of `parts` and return lowercase hex.
pub fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Convenience wrapper for hashing a single string.
pub fn digest_str(s: &str) -> String {
    sha256_hex(&[s.as_bytes()])
}

/// Returns true when `s` looks like an output of [`sha256_hex`].
pub fn is_digest_hex(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            digest_str("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parts_are_concatenated() {
        assert_eq!(sha256_hex(&[b"ab", b"c"]), digest_str("abc"));
        assert_eq!(sha256_hex(&[]), digest_str(""));
    }

    #[test]
    fn test_is_digest_hex() {
        assert!(is_digest_hex(&digest_str("x")));
        assert!(!is_digest_hex("ABC"));
        assert!(!is_digest_hex(&digest_str("x").to_uppercase()));
    }
}
