//! Draw Engine
//!
//! Wires the entropy cache, the sampler and the audit log together:
//!
//! ```text
//! height ──► EntropyCache (pinned?) ──► live source ──► BlockHash
//!                                                          │
//! (hash, max, count, salt) ──► Sampler ──► DrawResult ─────┤
//!                                                          ├──► commit: AuditLog
//!                                                          └──► is_member / verify
//! ```
//!
//! # Atomicity
//!
//! Every operation validates and computes first and mutates last. A failed
//! call leaves no pin and no log entry behind. Mutating operations take
//! `&mut self`; a multi-threaded host shares the engine behind a mutex, which
//! makes concurrent pins of one height resolve to exactly one winner.
//!
//! # Example
//!
//! ```rust
//! use entropy_draw_core_rs::{DrawEngine, EngineConfig, SimulatedLedger};
//!
//! let mut ledger = SimulatedLedger::new(7, 256);
//! ledger.mine_blocks(20);
//! let mut engine = DrawEngine::new(ledger, EngineConfig::default());
//!
//! let entry = engine.commit(10, 3, 19, "round-1").unwrap();
//! assert_eq!(entry.result.len(), 3);
//! assert!(engine.is_member(10, 3, 19, "round-1", entry.result[0]).unwrap());
//! assert!(engine.verify(&entry).unwrap());
//! ```

use crate::core::hash::BlockHash;
use crate::core::ledger::EntropySource;
use crate::engine::cache::EntropyCache;
use crate::engine::config::EngineConfig;
use crate::models::audit::{AuditLog, AuditLogEntry};
use crate::models::draw::{DrawRequest, DrawResult};
use crate::rng::sampler::{SampleError, Sampler};
use thiserror::Error;

/// Errors surfaced at the engine boundary
///
/// All of them are terminal for the call that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Invalid count {count}: must satisfy 1 <= count <= max ({max})")]
    InvalidCount { count: u64, max: u64 },

    #[error("Entropy unavailable for height {0}")]
    UnavailableHeight(u64),

    #[error("Height {0} is already pinned")]
    AlreadyPinned(u64),

    #[error("Retry limit exceeded: more than {limit} collisions")]
    RetryLimitExceeded { limit: u64 },

    #[error("Unsolicited transfer of {amount} rejected")]
    UnsolicitedTransfer { amount: u128 },
}

impl DrawError {
    /// Lift a sampler error, attributing entropy failures to `height`
    pub fn from_sample(err: SampleError, height: u64) -> Self {
        match err {
            SampleError::InvalidCount { count, max } => DrawError::InvalidCount { count, max },
            SampleError::ZeroEntropy => DrawError::UnavailableHeight(height),
            SampleError::RetryLimitExceeded { limit } => DrawError::RetryLimitExceeded { limit },
        }
    }
}

/// Sampling engine over an entropy source
pub struct DrawEngine<S: EntropySource> {
    source: S,
    config: EngineConfig,
    sampler: Sampler,
    cache: EntropyCache,
    audit_log: AuditLog,
}

impl<S: EntropySource> DrawEngine<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self::with_state(source, config, EntropyCache::new(), AuditLog::new())
    }

    pub(crate) fn with_state(
        source: S,
        config: EngineConfig,
        cache: EntropyCache,
        audit_log: AuditLog,
    ) -> Self {
        Self {
            source,
            config,
            sampler: Sampler::new(config.sampler),
            cache,
            audit_log,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source (e.g. to mine blocks on a simulated ledger)
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &EntropyCache {
        &self.cache
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    // ========================================================================
    // Entropy cache
    // ========================================================================

    /// Pin the live hash for `height`
    ///
    /// Not idempotent: a second pin of the same height is a caller error.
    /// Callers that just need the hash should use [`DrawEngine::pinned`] first.
    pub fn pin(&mut self, height: u64) -> Result<BlockHash, DrawError> {
        match self.cache.pin(&self.source, height) {
            Ok(hash) => {
                tracing::info!(height, hash = %hash, "pinned block hash");
                Ok(hash)
            }
            Err(err) => {
                tracing::warn!(height, error = %err, "pin rejected");
                Err(err)
            }
        }
    }

    /// Read an existing pin
    pub fn pinned(&self, height: u64) -> Option<BlockHash> {
        self.cache.get(height)
    }

    // ========================================================================
    // Draws
    // ========================================================================

    /// Draw `count` distinct values from `[1, max]` using the hash for `height`
    ///
    /// Pins the height as a side effect if it was not pinned yet. No log entry
    /// is written; use [`DrawEngine::commit`] for a verifiable record.
    pub fn draw(
        &mut self,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
    ) -> Result<DrawResult, DrawError> {
        let (result, hash) = self.preview(max, count, height, salt)?;
        self.record_pin(height, hash);
        Ok(result)
    }

    /// Validate, resolve the hash and sample without pinning
    ///
    /// For callers that have more fallible work to do after the draw: keep the
    /// returned hash and hand it to [`DrawEngine::record_pin`] once nothing
    /// else can fail.
    pub(crate) fn preview(
        &self,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
    ) -> Result<(DrawResult, BlockHash), DrawError> {
        crate::rng::sampler::validate_count(max, count)
            .map_err(|e| DrawError::from_sample(e, height))?;
        let (hash, _) = self.cache.resolve(&self.source, height)?;
        let result = self
            .sampler
            .draw(&hash, max, count, salt.as_bytes())
            .map_err(|e| DrawError::from_sample(e, height))?;
        Ok((result, hash))
    }

    /// Pin `hash` for `height` unless a pin already exists
    pub(crate) fn record_pin(&mut self, height: u64, hash: BlockHash) {
        if self.cache.insert_if_absent(height, hash) {
            tracing::info!(height, hash = %hash, "pinned block hash during draw");
        }
    }

    /// Draw and append an audit entry with every input and the full result
    pub fn commit(
        &mut self,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
    ) -> Result<AuditLogEntry, DrawError> {
        let result = self.draw(max, count, height, salt)?;
        let entry = AuditLogEntry {
            max,
            count,
            height,
            salt: salt.to_string(),
            result: result.into_values(),
        };

        tracing::info!(
            max,
            count,
            height,
            salt,
            result = ?entry.result,
            "committed draw"
        );
        self.audit_log.log(entry.clone());
        Ok(entry)
    }

    /// Same as [`DrawEngine::commit`] for a prepared request
    pub fn commit_request(&mut self, request: &DrawRequest) -> Result<AuditLogEntry, DrawError> {
        self.commit(request.max, request.count, request.height, &request.salt)
    }

    /// Whether `candidate` is among the values the draw would produce
    ///
    /// Read-only: pins nothing, logs nothing.
    pub fn is_member(
        &self,
        max: u64,
        count: u64,
        height: u64,
        salt: &str,
        candidate: u64,
    ) -> Result<bool, DrawError> {
        let (result, _) = self.preview(max, count, height, salt)?;
        Ok(result.contains(candidate))
    }

    /// Recompute an audit entry and compare with its recorded result
    pub fn verify(&self, entry: &AuditLogEntry) -> Result<bool, DrawError> {
        let (result, _) = self.preview(entry.max, entry.count, entry.height, &entry.salt)?;
        Ok(result.values() == entry.result.as_slice())
    }

    /// Reject any value sent to the engine outside a request
    pub fn receive_transfer(&self, amount: u128) -> Result<(), DrawError> {
        tracing::warn!(amount = %amount, "rejected unsolicited transfer");
        Err(DrawError::UnsolicitedTransfer { amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::SimulatedLedger;
    use crate::rng::sampler::SamplerConfig;

    fn engine() -> DrawEngine<SimulatedLedger> {
        let mut ledger = SimulatedLedger::new(1, 16);
        ledger.mine_blocks(32);
        DrawEngine::new(ledger, EngineConfig::default())
    }

    #[test]
    fn test_draw_pins_implicitly() {
        let mut engine = engine();
        assert!(engine.pinned(30).is_none());
        engine.draw(10, 3, 30, "s").unwrap();
        assert_eq!(engine.pinned(30), Some(engine.source().block_hash(30)));
        assert_eq!(engine.pin(30), Err(DrawError::AlreadyPinned(30)));
    }

    #[test]
    fn test_invalid_count_leaves_no_pin() {
        let mut engine = engine();
        assert_eq!(
            engine.draw(10, 0, 30, "s"),
            Err(DrawError::InvalidCount { count: 0, max: 10 })
        );
        assert_eq!(
            engine.commit(10, 11, 30, "s"),
            Err(DrawError::InvalidCount { count: 11, max: 10 })
        );
        assert!(engine.cache().is_empty());
        assert!(engine.audit_log().is_empty());
    }

    /// Serves the same hash for every height below 100
    struct FixedSource;

    impl EntropySource for FixedSource {
        fn block_hash(&self, height: u64) -> BlockHash {
            if height < 100 {
                BlockHash::new([0x42; 32])
            } else {
                BlockHash::ZERO
            }
        }

        fn current_height(&self) -> u64 {
            100
        }
    }

    #[test]
    fn test_retry_limit_leaves_no_pin() {
        // This draw needs 15 collisions
        let config = EngineConfig {
            sampler: SamplerConfig {
                max_collisions: Some(14),
            },
        };
        let mut engine = DrawEngine::new(FixedSource, config);

        assert_eq!(
            engine.commit(10, 10, 50, "abc"),
            Err(DrawError::RetryLimitExceeded { limit: 14 })
        );
        assert!(engine.cache().is_empty());
        assert!(engine.audit_log().is_empty());
    }

    #[test]
    fn test_golden_through_engine() {
        let mut engine = DrawEngine::new(FixedSource, EngineConfig::default());
        let result = engine.draw(10, 10, 50, "abc").unwrap();
        assert_eq!(result.values(), &[6, 10, 7, 8, 5, 4, 9, 1, 3, 2]);
    }

    #[test]
    fn test_future_height_unavailable() {
        let mut engine = DrawEngine::new(FixedSource, EngineConfig::default());
        assert_eq!(
            engine.draw(10, 3, 100, "abc"),
            Err(DrawError::UnavailableHeight(100))
        );
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_preview_pins_nothing_until_recorded() {
        let mut engine = engine();
        let (result, hash) = engine.preview(10, 3, 30, "s").unwrap();
        assert!(engine.cache().is_empty());

        engine.record_pin(30, hash);
        assert_eq!(engine.pinned(30), Some(hash));
        assert_eq!(engine.draw(10, 3, 30, "s").unwrap(), result);
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn test_is_member_does_not_mutate() {
        let engine = engine();
        let _ = engine.is_member(10, 3, 30, "s", 4).unwrap();
        assert!(engine.cache().is_empty());
        assert!(engine.audit_log().is_empty());
    }

    #[test]
    fn test_commit_logs_entry() {
        let mut engine = engine();
        let entry = engine.commit(100, 5, 31, "lottery").unwrap();
        assert_eq!(engine.audit_log().len(), 1);
        assert_eq!(engine.audit_log().entries()[0], entry);
        assert!(engine.verify(&entry).unwrap());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut engine = engine();
        let mut entry = engine.commit(100, 5, 31, "lottery").unwrap();
        entry.result.swap(0, 1);
        assert!(!engine.verify(&entry).unwrap());
    }

    #[test]
    fn test_unsolicited_transfer_rejected() {
        let engine = engine();
        assert_eq!(
            engine.receive_transfer(1),
            Err(DrawError::UnsolicitedTransfer { amount: 1 })
        );
    }

    #[test]
    fn test_from_sample_attributes_height() {
        assert_eq!(
            DrawError::from_sample(SampleError::ZeroEntropy, 9),
            DrawError::UnavailableHeight(9)
        );
    }
}
