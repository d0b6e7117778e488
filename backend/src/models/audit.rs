//! Audit log of committed draws
//!
//! Every committed draw appends one entry holding all of its inputs and the
//! full output. Anyone holding an entry and the block hash for its height can
//! recompute the draw and check the result. The log is append-only.
//!
//! # Example
//!
//! ```rust
//! use entropy_draw_core_rs::models::{AuditLog, AuditLogEntry};
//!
//! let mut log = AuditLog::new();
//! log.log(AuditLogEntry {
//!     max: 10,
//!     count: 3,
//!     height: 42,
//!     salt: "round-1".to_string(),
//!     result: vec![7, 2, 9],
//! });
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.entries_at_height(42).len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Record of one committed draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub max: u64,
    pub count: u64,
    pub height: u64,
    pub salt: String,
    /// Drawn values in discovery order
    pub result: Vec<u64>,
}

impl AuditLogEntry {
    pub fn contains(&self, candidate: u64) -> bool {
        self.result.contains(&candidate)
    }
}

/// Append-only sequence of audit entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_entries(entries: Vec<AuditLogEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry
    pub fn log(&mut self, entry: AuditLogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in commit order
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&AuditLogEntry> {
        self.entries.last()
    }

    /// Entries drawn from a given height
    pub fn entries_at_height(&self, height: u64) -> Vec<&AuditLogEntry> {
        self.entries.iter().filter(|e| e.height == height).collect()
    }

    /// Entries committed with a given salt
    pub fn entries_with_salt(&self, salt: &str) -> Vec<&AuditLogEntry> {
        self.entries.iter().filter(|e| e.salt == salt).collect()
    }
}
