//! Hashing Utilities
//!
//! Two very different hashes live here:
//! - [`identifier_hash`] is a 32-bit polynomial string hash used to key the
//!   identity lookup table. It is NOT a security control.
//! - [`sha256`] guards the integrity of cached replicas on disk.

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Deterministic, non-cryptographic 32-bit hash of a string
///
/// `h = h * 31 + unit` over the UTF-16 code units, with wrapping
/// two's-complement arithmetic. The empty string hashes to 0.
pub fn identifier_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 digest encoded as base64, the form stored next to cached blobs
pub fn sha256_base64(data: &[u8]) -> String {
    to_base64(&sha256(data))
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Constant-time comparison
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check `data` against a base64 SHA-256 digest produced by [`sha256_base64`]
pub fn verify_sha256_base64(data: &[u8], digest_b64: &str) -> bool {
    match from_base64(digest_b64) {
        Ok(expected) => constant_time_eq(&sha256(data), &expected),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_hash_known_values() {
        assert_eq!(identifier_hash(""), 0);
        assert_eq!(identifier_hash("A"), 65);
        assert_eq!(identifier_hash("AB"), 65 * 31 + 66);
        // Same value Java's String.hashCode produces for "hello"
        assert_eq!(identifier_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_identifier_hash_wraps() {
        // Long inputs overflow i32 many times over and must not panic
        let long = "FREEL".repeat(200);
        assert_eq!(identifier_hash(&long), identifier_hash(&long));
        assert_ne!(identifier_hash("FREEL123"), identifier_hash("FREEL124"));
    }

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);

        let hash = sha256(b"hello");
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_verify_sha256_base64() {
        let payload = br#"[{"id":"D1"}]"#;
        let digest = sha256_base64(payload);
        assert!(verify_sha256_base64(payload, &digest));
        assert!(!verify_sha256_base64(br#"[{"id":"D2"}]"#, &digest));
        assert!(!verify_sha256_base64(payload, "not base64 !!"));
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 2, 3, 4];
        let c = [1u8, 2, 3, 5];
        assert!(constant_time_eq(&a, &b));
        assert!(!constant_time_eq(&a, &c));
        assert!(!constant_time_eq(&a, &c[..3]));
    }
}
