//! Core types: block hashes and the ledger they come from

pub mod hash;
pub mod ledger;

pub use hash::{BlockHash, ParseHashError, HASH_LEN};
pub use ledger::{EntropySource, LedgerConfig, SimulatedLedger, DEFAULT_RETENTION_WINDOW};
