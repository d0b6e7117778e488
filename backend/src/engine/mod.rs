//! Draw engine: entropy cache, draw recording and membership queries
//!
//! See `draw_engine.rs` for the operations.

pub mod cache;
pub mod checkpoint;
pub mod config;
pub mod draw_engine;

// Re-export main types for convenience
pub use cache::EntropyCache;
pub use checkpoint::{CheckpointError, EngineSnapshot};
pub use config::{compute_config_hash, Config, ConfigError, EngineConfig};
pub use draw_engine::{DrawEngine, DrawError};
