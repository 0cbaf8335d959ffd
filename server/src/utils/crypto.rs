//! Cryptographic utility functions

use anyhow::{Context, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Generate a cryptographically secure random key
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Generate a 256-bit (32 byte) signing key
pub fn generate_signing_key() -> Vec<u8> {
    generate_key(32)
}

/// Generate a cryptographically secure random hex token
pub fn generate_token(byte_len: usize) -> String {
    encode_hex(&generate_key(byte_len))
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Decode a hex string to bytes
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).context("Invalid hex string")
}

/// Encode bytes to a lowercase hex string
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Calculate SHA256 hash and return as hex string
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_length() {
        assert_eq!(generate_key(16).len(), 16);
        assert_eq!(generate_signing_key().len(), 32);
    }

    #[test]
    fn test_hex_roundtrip_random_key() {
        let original = generate_signing_key();
        let decoded = decode_hex(&encode_hex(&original)).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(decode_hex("abc").is_err());
        assert!(decode_hex("zz").is_err());
        assert_eq!(decode_hex(" FF\n").unwrap(), vec![0xff]);
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(32);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token(32));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("state-1", "state-1"));
        assert!(!constant_time_eq("state-1", "state-2"));
        assert!(!constant_time_eq("state", "stat"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
