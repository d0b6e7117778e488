//! Draw inputs and outputs
//!
//! # Critical Invariants
//!
//! 1. A `DrawResult` holds exactly `count` values, pairwise distinct, each in `[1, max]`
//! 2. Values are kept in discovery order (never sorted)
//! 3. A `PinnedHash` is never the zero sentinel

use crate::core::hash::BlockHash;
use crate::rng::sampler::{validate_count, SampleError};
use serde::{Deserialize, Serialize};

/// Parameters of one draw
///
/// Only lives for the duration of a call; the audit log stores its fields
/// alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub max: u64,
    pub count: u64,
    pub height: u64,
    pub salt: String,
}

impl DrawRequest {
    pub fn new(max: u64, count: u64, height: u64, salt: impl Into<String>) -> Self {
        Self {
            max,
            count,
            height,
            salt: salt.into(),
        }
    }

    /// Check `1 <= count <= max`
    pub fn validate(&self) -> Result<(), SampleError> {
        validate_count(self.max, self.count)
    }
}

/// Values produced by one draw, in discovery order
///
/// Only the sampler builds one. Recorded draws travel as `AuditLogEntry`,
/// which is checked by recomputation, so a result cannot be read back from
/// JSON:
///
/// ```compile_fail
/// use entropy_draw_core_rs::DrawResult;
///
/// let forged: DrawResult = serde_json::from_str(r#"{"values":[0,0],"collisions":0}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    values: Vec<u64>,
    /// Rejected candidates along the way (the final nonce)
    collisions: u64,
}

impl DrawResult {
    pub(crate) fn new(values: Vec<u64>, collisions: u64) -> Self {
        Self { values, collisions }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<u64> {
        self.values
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, candidate: u64) -> bool {
        self.values.contains(&candidate)
    }
}

/// Snapshot of a block hash captured while it was still visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedHash {
    pub height: u64,
    pub hash: BlockHash,
}
