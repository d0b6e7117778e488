//! Entropy cache
//!
//! Pins block hashes by height before they age out of the ledger's
//! visibility window. Once a height is pinned its hash is available forever.
//!
//! # Critical Invariants
//!
//! - **Append-only**: entries are never overwritten or removed
//! - **Insert-if-absent**: a second pin for the same height is rejected
//! - **No sentinels**: the zero hash is never stored

use crate::core::hash::BlockHash;
use crate::core::ledger::EntropySource;
use crate::engine::draw_engine::DrawError;
use crate::models::draw::PinnedHash;
use std::collections::BTreeMap;

/// Process-wide table `height -> hash`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntropyCache {
    pins: BTreeMap<u64, BlockHash>,
}

impl EntropyCache {
    pub fn new() -> Self {
        Self {
            pins: BTreeMap::new(),
        }
    }

    /// Capture the live hash for `height`
    ///
    /// # Errors
    /// - `AlreadyPinned` if the height already has an entry (read it with `get`)
    /// - `UnavailableHeight` if the source returns the zero sentinel; nothing is stored
    pub fn pin<S: EntropySource>(
        &mut self,
        source: &S,
        height: u64,
    ) -> Result<BlockHash, DrawError> {
        if self.pins.contains_key(&height) {
            return Err(DrawError::AlreadyPinned(height));
        }

        let hash = source.block_hash(height);
        if hash.is_zero() {
            return Err(DrawError::UnavailableHeight(height));
        }

        self.pins.insert(height, hash);
        Ok(hash)
    }

    /// Pinned hash for `height`, if any
    pub fn get(&self, height: u64) -> Option<BlockHash> {
        self.pins.get(&height).copied()
    }

    pub fn contains(&self, height: u64) -> bool {
        self.pins.contains_key(&height)
    }

    /// Pinned hash if present, otherwise the live one
    ///
    /// The flag is true when the hash came from the table.
    pub fn resolve<S: EntropySource>(
        &self,
        source: &S,
        height: u64,
    ) -> Result<(BlockHash, bool), DrawError> {
        if let Some(hash) = self.get(height) {
            return Ok((hash, true));
        }
        let hash = source.block_hash(height);
        if hash.is_zero() {
            return Err(DrawError::UnavailableHeight(height));
        }
        Ok((hash, false))
    }

    /// Store a hash already read from the source; false if the height was taken
    pub(crate) fn insert_if_absent(&mut self, height: u64, hash: BlockHash) -> bool {
        if hash.is_zero() || self.pins.contains_key(&height) {
            return false;
        }
        self.pins.insert(height, hash);
        true
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// All pins ordered by height
    pub fn pins(&self) -> Vec<PinnedHash> {
        self.pins
            .iter()
            .map(|(height, hash)| PinnedHash {
                height: *height,
                hash: *hash,
            })
            .collect()
    }
}
