//! Hash32 - 32-byte content digest
//!
//! Every hash in a ripple record (memory hashes, proof hashes, seals) is a
//! SHA-256 digest. On the wire it is always lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a digest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("Invalid hex digest: {0}")]
    InvalidHex(String),

    #[error("Digest must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash32([u8; 32]);

impl Hash32 {
    /// All-zero digest
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// SHA-256 of the given bytes
    pub fn sha256_of(data: &[u8]) -> Self {
        Self::sha256_parts(&[data])
    }

    /// SHA-256 over several byte slices fed in order
    pub fn sha256_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Parse a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s).map_err(|e| DigestError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| DigestError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl FromStr for Hash32 {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Hash32 {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Hash32> for String {
    fn from(hash: Hash32) -> Self {
        hash.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = Hash32::sha256_of(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parts_match_concatenation() {
        let joined = Hash32::sha256_of(b"memoryweave2025");
        let parts = Hash32::sha256_parts(&[b"memory", b"weave", b"2025"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            Hash32::from_hex("zz"),
            Err(DigestError::InvalidHex(_))
        ));
        assert!(matches!(
            Hash32::from_hex("abcd"),
            Err(DigestError::InvalidLength(2))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let hash = Hash32::sha256_of(b"ripple");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));

        let parsed: Hash32 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }
}
