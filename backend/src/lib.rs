//! Entropy Draw Core - Rust Engine
//!
//! Deterministic, verifiable draws of distinct integers from ledger block
//! hashes.
//!
//! # Architecture
//!
//! - **core**: Block hashes and the ledger that serves them
//! - **rng**: Rejection sampler and its bit-packed exclusion set
//! - **models**: Draw requests/results, pinned hashes, audit log
//! - **engine**: Entropy cache, commit/verify/membership, checkpoints, config
//! - **issuance**: Collectible issuance on top of draws (renderer, ownership)
//!
//! # Critical Invariants
//!
//! 1. Same (hash, max, count, salt) → same values in the same order
//! 2. A pinned height is never re-pinned or overwritten
//! 3. Failed operations leave no pin and no audit entry behind

// Module declarations
pub mod core;
pub mod engine;
pub mod issuance;
pub mod models;
pub mod rng;

// Re-exports for convenience
pub use self::core::{BlockHash, EntropySource, LedgerConfig, SimulatedLedger};
pub use engine::{
    CheckpointError, Config, ConfigError, DrawEngine, DrawError, EngineConfig, EngineSnapshot,
    EntropyCache,
};
pub use models::{AuditLog, AuditLogEntry, DrawRequest, DrawResult, PinnedHash};
pub use rng::{SampleError, Sampler, SamplerConfig};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn entropy_draw_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engine::PyDrawEngine>()?;
    Ok(())
}
