//! Fixed-size block hashes
//!
//! A block hash is the entropy handed out by the ledger for a given height.
//! The all-zero value is what the ledger returns for a height it cannot (or
//! can no longer) serve, so it doubles as the "unavailable" sentinel.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a block hash in bytes
pub const HASH_LEN: usize = 32;

/// A 32-byte block hash
///
/// Serializes as a lowercase hex string with a `0x` prefix so audit entries
/// and snapshots stay readable.
///
/// # Example
/// ```
/// use entropy_draw_core_rs::BlockHash;
///
/// let hash: BlockHash = "0x4242424242424242424242424242424242424242424242424242424242424242"
///     .parse()
///     .unwrap();
/// assert!(!hash.is_zero());
/// assert!(BlockHash::ZERO.is_zero());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockHash([u8; HASH_LEN]);

impl BlockHash {
    /// The sentinel returned for unavailable heights
    pub const ZERO: BlockHash = BlockHash([0u8; HASH_LEN]);

    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// True for the all-zero sentinel
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH_LEN]> for BlockHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

/// Error parsing a block hash from hex
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseHashError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl FromStr for BlockHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseHashError::InvalidHex(e.to_string()))?;
        let array: [u8; HASH_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ParseHashError::InvalidLength {
                    expected: HASH_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
