//! Checkpoint - Save/Load Engine State
//!
//! The engine's persisted layout is the pinned-hash table plus the audit log.
//! Both serialize into an `EngineSnapshot` so a host can persist and reload
//! them across restarts.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: State can only be loaded with matching engine config
//! - **Unique Heights**: No height appears twice in the pinned table
//! - **No Sentinels**: A pinned hash is never zero
//! - **Verifiable Log**: Every audit entry recomputes from the pin at its height

use crate::core::ledger::EntropySource;
use crate::engine::cache::EntropyCache;
use crate::engine::config::{ConfigError, EngineConfig};
use crate::engine::draw_engine::{DrawEngine, DrawError};
use crate::models::audit::{AuditLog, AuditLogEntry};
use crate::models::draw::PinnedHash;
use crate::rng::sampler::Sampler;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from saving or restoring a snapshot
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Config mismatch: snapshot {expected}, engine {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Duplicate pinned height: {0}")]
    DuplicateHeight(u64),

    #[error("Zero hash pinned at height {0}")]
    ZeroHash(u64),

    #[error("Audit entry {index} at height {height} has no pinned hash")]
    UnpinnedEntry { index: usize, height: u64 },

    #[error("Audit entry {index} cannot be recomputed: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: DrawError,
    },

    #[error("Audit entry {index} does not match its recomputed draw")]
    EntryMismatch { index: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Complete persisted engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Pinned hashes ordered by height
    pub pinned: Vec<PinnedHash>,

    /// Audit log in commit order
    pub audit_log: Vec<AuditLogEntry>,

    /// SHA-256 of the engine config the state was produced under
    pub config_hash: String,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<S: EntropySource> DrawEngine<S> {
    /// Capture the pinned table and audit log
    pub fn snapshot(&self) -> Result<EngineSnapshot, CheckpointError> {
        Ok(EngineSnapshot {
            pinned: self.cache().pins(),
            audit_log: self.audit_log().entries().to_vec(),
            config_hash: self.config().config_hash()?,
        })
    }

    /// Rebuild an engine from a snapshot
    ///
    /// # Errors
    /// - `ConfigMismatch` if `config` hashes differently from the snapshot's
    /// - `DuplicateHeight` / `ZeroHash` if the pinned table is corrupt
    /// - `UnpinnedEntry` / `InvalidEntry` / `EntryMismatch` if an audit entry
    ///   does not recompute from the pin at its height
    pub fn restore(
        source: S,
        config: EngineConfig,
        snapshot: EngineSnapshot,
    ) -> Result<Self, CheckpointError> {
        let actual = config.config_hash()?;
        if actual != snapshot.config_hash {
            return Err(CheckpointError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual,
            });
        }

        let mut cache = EntropyCache::new();
        for pin in &snapshot.pinned {
            if pin.hash.is_zero() {
                return Err(CheckpointError::ZeroHash(pin.height));
            }
            if !cache.insert_if_absent(pin.height, pin.hash) {
                return Err(CheckpointError::DuplicateHeight(pin.height));
            }
        }

        let sampler = Sampler::new(config.sampler);
        for (index, entry) in snapshot.audit_log.iter().enumerate() {
            check_entry(&sampler, &cache, index, entry)?;
        }

        tracing::info!(
            pins = cache.len(),
            entries = snapshot.audit_log.len(),
            "restored engine state"
        );
        Ok(Self::with_state(
            source,
            config,
            cache,
            AuditLog::from_entries(snapshot.audit_log),
        ))
    }
}

/// Recompute one logged draw from the restored pins
fn check_entry(
    sampler: &Sampler,
    cache: &EntropyCache,
    index: usize,
    entry: &AuditLogEntry,
) -> Result<(), CheckpointError> {
    let hash = cache
        .get(entry.height)
        .ok_or(CheckpointError::UnpinnedEntry {
            index,
            height: entry.height,
        })?;
    let result = sampler
        .draw(&hash, entry.max, entry.count, entry.salt.as_bytes())
        .map_err(|e| CheckpointError::InvalidEntry {
            index,
            source: DrawError::from_sample(e, entry.height),
        })?;
    if result.values() != entry.result.as_slice() {
        tracing::warn!(index, height = entry.height, "audit entry failed recomputation");
        return Err(CheckpointError::EntryMismatch { index });
    }
    Ok(())
}
