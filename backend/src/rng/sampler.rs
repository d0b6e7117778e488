//! Rejection sampler for distinct values
//!
//! Draws `count` distinct values from `[1, max]` out of a block hash and a
//! caller salt. Every candidate is
//!
//! ```text
//! SHA-256( block_hash || be256(count) || be256(i) || be256(nonce) || SHA-256(salt) ) mod (max + 1)
//! ```
//!
//! where `be256(x)` is `x` as a 32-byte big-endian word and the digest is read
//! as an unsigned big-endian 256-bit integer. A candidate already in the
//! exclusion set (including the reserved 0) bumps `nonce` and is redrawn for
//! the same `i`. `nonce` starts at 0 once per draw and never resets.
//!
//! The byte layout above is a compatibility contract: changing the field
//! order or width changes every historical draw.
//!
//! # Determinism
//!
//! Same (hash, max, count, salt) → same values in the same order. This is
//! what lets a third party recompute a committed draw.

use crate::core::hash::BlockHash;
use crate::models::draw::DrawResult;
use crate::rng::exclusion::ExclusionSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Width of each integer field in the candidate preimage
const WORD_LEN: usize = 32;

/// Most values reserved up front; larger draws grow as they go
const MAX_PREALLOC: u64 = 1024;

/// Errors from a single draw
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("Invalid count {count}: must satisfy 1 <= count <= max ({max})")]
    InvalidCount { count: u64, max: u64 },

    #[error("Entropy source is the zero sentinel")]
    ZeroEntropy,

    #[error("Retry limit exceeded: more than {limit} collisions")]
    RetryLimitExceeded { limit: u64 },
}

/// Sampler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Hard ceiling on collisions per draw; `None` retries until done
    pub max_collisions: Option<u64>,
}

/// Deterministic distinct-value sampler
///
/// # Example
/// ```
/// use entropy_draw_core_rs::{BlockHash, Sampler};
///
/// let sampler = Sampler::default();
/// let hash = BlockHash::new([0x42; 32]);
///
/// let result = sampler.draw(&hash, 10, 10, b"abc").unwrap();
/// assert_eq!(result.values(), &[6, 10, 7, 8, 5, 4, 9, 1, 3, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    config: SamplerConfig,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draw `count` distinct values from `[1, max]`
    ///
    /// # Errors
    /// - `InvalidCount` unless `1 <= count <= max`
    /// - `ZeroEntropy` if `hash` is the unavailable sentinel
    /// - `RetryLimitExceeded` if a collision ceiling is configured and hit
    pub fn draw(
        &self,
        hash: &BlockHash,
        max: u64,
        count: u64,
        salt: &[u8],
    ) -> Result<DrawResult, SampleError> {
        validate_count(max, count)?;
        if hash.is_zero() {
            return Err(SampleError::ZeroEntropy);
        }

        let salt_digest = salt_digest(salt);
        let mut excluded = ExclusionSet::new(max);
        let mut values = Vec::with_capacity(count.min(MAX_PREALLOC) as usize);
        let mut nonce: u64 = 0;
        let mut i: u64 = 0;

        while i < count {
            let value = candidate(hash, max, count, i, nonce, &salt_digest);
            if excluded.insert(value) {
                values.push(value);
                i += 1;
                continue;
            }

            nonce += 1;
            if let Some(limit) = self.config.max_collisions {
                if nonce > limit {
                    tracing::warn!(max, count, drawn = i, limit, "draw hit collision ceiling");
                    return Err(SampleError::RetryLimitExceeded { limit });
                }
            }
        }

        tracing::debug!(max, count, collisions = nonce, "draw complete");
        Ok(DrawResult::new(values, nonce))
    }
}

/// Check `1 <= count <= max`
pub fn validate_count(max: u64, count: u64) -> Result<(), SampleError> {
    if count == 0 || count > max {
        return Err(SampleError::InvalidCount { count, max });
    }
    Ok(())
}

/// SHA-256 of the salt, the last field of every candidate preimage
pub fn salt_digest(salt: &[u8]) -> [u8; 32] {
    Sha256::digest(salt).into()
}

/// Candidate value for position `i` at `nonce`, in `[0, max]`
pub fn candidate(
    hash: &BlockHash,
    max: u64,
    count: u64,
    i: u64,
    nonce: u64,
    salt_digest: &[u8; 32],
) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(hash.as_bytes());
    hasher.update(be256(count));
    hasher.update(be256(i));
    hasher.update(be256(nonce));
    hasher.update(salt_digest);
    let digest: [u8; 32] = hasher.finalize().into();

    reduce(&digest, max as u128 + 1)
}

fn be256(value: u64) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Big-endian 256-bit integer mod `modulus` (modulus <= 2^64)
fn reduce(digest: &[u8; 32], modulus: u128) -> u64 {
    let mut remainder: u128 = 0;
    for byte in digest {
        remainder = ((remainder << 8) | *byte as u128) % modulus;
    }
    remainder as u64
}
