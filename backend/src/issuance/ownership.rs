//! Ownership bookkeeping for issued collectibles
//!
//! Identifiers are handed out sequentially starting at 1. Each identifier is
//! minted at most once and always has exactly one holder.

use crate::issuance::IssuanceError;
use std::collections::BTreeMap;

/// Identifier + holder registry
pub trait OwnershipLedger {
    /// Identifier the next mint will use
    fn next_id(&self) -> u64;

    /// Register `id` to `holder` with its display document
    fn mint(&mut self, id: u64, holder: &str, metadata: String) -> Result<(), IssuanceError>;

    fn owner_of(&self, id: u64) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    holder: String,
    metadata: String,
}

/// In-memory registry
#[derive(Debug, Clone, Default)]
pub struct InMemoryOwnershipLedger {
    records: BTreeMap<u64, Record>,
}

impl InMemoryOwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata_of(&self, id: u64) -> Option<&str> {
        self.records.get(&id).map(|r| r.metadata.as_str())
    }

    /// Number of identifiers minted
    pub fn total_supply(&self) -> usize {
        self.records.len()
    }

    /// Identifiers held by `holder`
    pub fn held_by(&self, holder: &str) -> Vec<u64> {
        self.records
            .iter()
            .filter(|(_, r)| r.holder == holder)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Move `id` from `from` to `to`; only the current holder may do this
    pub fn transfer(&mut self, id: u64, from: &str, to: &str) -> Result<(), IssuanceError> {
        if to.is_empty() {
            return Err(IssuanceError::EmptyHolder);
        }
        let record = self
            .records
            .get_mut(&id)
            .ok_or(IssuanceError::UnknownIdentifier(id))?;
        if record.holder != from {
            return Err(IssuanceError::NotHolder {
                id,
                caller: from.to_string(),
            });
        }
        record.holder = to.to_string();
        tracing::info!(id, from, to, "transferred collectible");
        Ok(())
    }
}

impl OwnershipLedger for InMemoryOwnershipLedger {
    fn next_id(&self) -> u64 {
        self.records.keys().next_back().map_or(1, |id| id + 1)
    }

    fn mint(&mut self, id: u64, holder: &str, metadata: String) -> Result<(), IssuanceError> {
        if holder.is_empty() {
            return Err(IssuanceError::EmptyHolder);
        }
        if self.records.contains_key(&id) {
            return Err(IssuanceError::DuplicateIdentifier(id));
        }
        self.records.insert(
            id,
            Record {
                holder: holder.to_string(),
                metadata,
            },
        );
        Ok(())
    }

    fn owner_of(&self, id: u64) -> Option<&str> {
        self.records.get(&id).map(|r| r.holder.as_str())
    }
}
