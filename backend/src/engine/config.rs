//! Engine and ledger configuration
//!
//! Configuration is plain serde data loaded from JSON. Missing fields fall
//! back to defaults, so `{}` is a valid config.
//!
//! ```json
//! {
//!   "engine": { "sampler": { "max_collisions": null } },
//!   "ledger": { "genesis_seed": 7, "initial_blocks": 32, "retention_window": 256 }
//! }
//! ```

use crate::core::ledger::LedgerConfig;
use crate::rng::sampler::SamplerConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings that affect draw results
///
/// Its hash is stamped into every snapshot; a snapshot can only be restored
/// under the same settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sampler: SamplerConfig,
}

impl EngineConfig {
    /// Deterministic SHA-256 of the config
    ///
    /// Uses canonical JSON (sorted keys) so field order never affects the hash.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        compute_config_hash(self)
    }
}

/// Top-level config file layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub ledger: LedgerConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.retention_window == 0 {
            return Err(ConfigError::Invalid(
                "ledger.retention_window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// SHA-256 over the canonical (key-sorted) JSON of any serializable value
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, ConfigError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))?;
    Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
}
