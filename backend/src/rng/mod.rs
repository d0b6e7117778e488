//! Deterministic sampling
//!
//! Derives distinct values from a block hash and a salt.
//! CRITICAL: Every draw in the engine MUST go through this module so that
//! committed results can be recomputed byte-for-byte by third parties.

pub mod exclusion;
pub mod sampler;

pub use exclusion::ExclusionSet;
pub use sampler::{candidate, salt_digest, validate_count, SampleError, Sampler, SamplerConfig};
