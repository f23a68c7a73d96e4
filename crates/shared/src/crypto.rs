//! Cryptographic utilities for API key generation and hashing.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derives a signed 64-bit lock key from a pair of identifiers.
///
/// Postgres advisory locks are keyed on a bigint; this takes the first
/// 8 bytes of SHA-256 over `a:b` so distinct pairs map to distinct keys
/// up to hash collision.
pub fn advisory_lock_key(a: &str, b: &str) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(a.as_bytes());
    hasher.update(b":");
    hasher.update(b.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

/// Extracts the prefix from an API key (first 8 characters after "mk_").
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if key.starts_with("mk_") && key.len() >= 11 {
        Some(&key[3..11])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_advisory_lock_key_deterministic() {
        let therapist = "3f0b8a1e-6c1d-4a2f-9e3b-111122223333";
        assert_eq!(
            advisory_lock_key(therapist, "cust_8821"),
            advisory_lock_key(therapist, "cust_8821")
        );
    }

    #[test]
    fn test_advisory_lock_key_distinct_pairs() {
        let therapist = "3f0b8a1e-6c1d-4a2f-9e3b-111122223333";
        assert_ne!(
            advisory_lock_key(therapist, "cust_8821"),
            advisory_lock_key(therapist, "cust_8822")
        );
        assert_ne!(
            advisory_lock_key(therapist, "cust_8821"),
            advisory_lock_key("cust_8821", therapist)
        );
    }

    #[test]
    fn test_advisory_lock_key_separator_is_unambiguous() {
        // ("ab", "c") and ("a", "bc") must not share a key
        assert_ne!(advisory_lock_key("ab", "c"), advisory_lock_key("a", "bc"));
    }

    #[test]
    fn test_extract_key_prefix() {
        assert_eq!(extract_key_prefix("mk_abcdefgh12345"), Some("abcdefgh"));
        assert_eq!(extract_key_prefix("mk_short"), None);
        assert_eq!(extract_key_prefix("invalid_key"), None);
    }

    #[test]
    fn test_extract_key_prefix_exact_length() {
        // mk_ (3) + 8 characters = 11 minimum
        assert_eq!(extract_key_prefix("mk_12345678"), Some("12345678"));
    }

    #[test]
    fn test_extract_key_prefix_wrong_prefix() {
        assert_eq!(extract_key_prefix("sk_abcdefgh12345"), None);
        assert_eq!(extract_key_prefix("MK_abcdefgh12345"), None); // Case sensitive
    }

    #[test]
    fn test_extract_key_prefix_empty() {
        assert_eq!(extract_key_prefix(""), None);
    }
}
