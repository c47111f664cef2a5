//! Script checksums
//!
//! Recorded at apply time so later edits to an applied script can be spotted.

use sha2::{Digest, Sha256};

/// SHA-256 of a script, hex encoded
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_sha256_hex() {
        let checksum = compute_checksum("CREATE TABLE t (id INTEGER);");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            compute_checksum(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_sensitive_to_whitespace() {
        assert_ne!(compute_checksum("SELECT 1"), compute_checksum("SELECT 1 "));
    }
}
