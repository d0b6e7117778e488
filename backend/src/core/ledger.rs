//! Ledger entropy source
//!
//! The live platform only serves block hashes for a short, recent range of
//! heights. `EntropySource` captures exactly that contract; `SimulatedLedger`
//! is a deterministic in-process ledger that honours it, used by the CLI,
//! the Python bindings and the tests.
//!
//! # Visibility window
//!
//! ```text
//! current_height - retention_window <= h < current_height   → real hash
//! anything else (too old, in production, or in the future)  → BlockHash::ZERO
//! ```

use crate::core::hash::BlockHash;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of recent heights the platform keeps visible by default
pub const DEFAULT_RETENTION_WINDOW: u64 = 256;

/// Read-only view of the live platform's block hashes
pub trait EntropySource {
    /// Hash of the block at `height`, or `BlockHash::ZERO` if it is not visible
    fn block_hash(&self, height: u64) -> BlockHash;

    /// Height of the block currently being produced
    fn current_height(&self) -> u64;
}

/// Simulated ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Seed for the genesis predecessor hash
    pub genesis_seed: u64,

    /// Blocks mined up front
    pub initial_blocks: u64,

    /// How many recent heights stay visible
    pub retention_window: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_seed: 0,
            initial_blocks: 0,
            retention_window: DEFAULT_RETENTION_WINDOW,
        }
    }
}

/// Deterministic ledger that produces one hash per mined block
///
/// Block `h` hashes to `SHA-256(previous_hash || be64(h))`; the predecessor of
/// block 0 is `SHA-256(be64(genesis_seed))`. Same seed → same chain.
///
/// # Example
/// ```
/// use entropy_draw_core_rs::{EntropySource, SimulatedLedger};
///
/// let mut ledger = SimulatedLedger::new(7, 256);
/// assert_eq!(ledger.current_height(), 0);
/// assert!(ledger.block_hash(0).is_zero()); // still being produced
///
/// ledger.mine_block();
/// assert_eq!(ledger.current_height(), 1);
/// assert!(!ledger.block_hash(0).is_zero());
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedLedger {
    genesis_seed: u64,
    retention_window: u64,
    /// Hash of every mined block, indexed by height
    hashes: Vec<BlockHash>,
}

impl SimulatedLedger {
    pub fn new(genesis_seed: u64, retention_window: u64) -> Self {
        Self {
            genesis_seed,
            retention_window,
            hashes: Vec::new(),
        }
    }

    /// Build a ledger from config, mining `initial_blocks` up front
    pub fn from_config(config: &LedgerConfig) -> Self {
        let mut ledger = Self::new(config.genesis_seed, config.retention_window);
        ledger.mine_blocks(config.initial_blocks);
        ledger
    }

    /// Seal the block at the current height and return its hash
    pub fn mine_block(&mut self) -> BlockHash {
        let height = self.hashes.len() as u64;
        let previous = match self.hashes.last() {
            Some(hash) => *hash,
            None => genesis_predecessor(self.genesis_seed),
        };

        let mut hasher = Sha256::new();
        hasher.update(previous.as_bytes());
        hasher.update(height.to_be_bytes());
        let hash = BlockHash::new(hasher.finalize().into());

        self.hashes.push(hash);
        hash
    }

    /// Mine `n` blocks
    pub fn mine_blocks(&mut self, n: u64) {
        for _ in 0..n {
            self.mine_block();
        }
    }

    pub fn retention_window(&self) -> u64 {
        self.retention_window
    }

    pub fn genesis_seed(&self) -> u64 {
        self.genesis_seed
    }

    /// Lowest height still visible
    pub fn oldest_visible_height(&self) -> u64 {
        self.current_height().saturating_sub(self.retention_window)
    }
}

impl EntropySource for SimulatedLedger {
    fn block_hash(&self, height: u64) -> BlockHash {
        if height >= self.current_height() || height < self.oldest_visible_height() {
            return BlockHash::ZERO;
        }
        self.hashes[height as usize]
    }

    fn current_height(&self) -> u64 {
        self.hashes.len() as u64
    }
}

fn genesis_predecessor(seed: u64) -> BlockHash {
    BlockHash::new(Sha256::digest(seed.to_be_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_chain() {
        let mut a = SimulatedLedger::new(99, 256);
        let mut b = SimulatedLedger::new(99, 256);
        a.mine_blocks(10);
        b.mine_blocks(10);
        for h in 0..10 {
            assert_eq!(a.block_hash(h), b.block_hash(h));
        }
    }

    #[test]
    fn test_different_seed_different_chain() {
        let mut a = SimulatedLedger::new(1, 256);
        let mut b = SimulatedLedger::new(2, 256);
        a.mine_block();
        b.mine_block();
        assert_ne!(a.block_hash(0), b.block_hash(0));
    }

    #[test]
    fn test_hash_ages_out_of_window() {
        let mut ledger = SimulatedLedger::new(5, 4);
        ledger.mine_blocks(4);
        assert!(!ledger.block_hash(0).is_zero());

        ledger.mine_block();
        assert!(ledger.block_hash(0).is_zero(), "height 0 should be outside the window");
        assert!(!ledger.block_hash(1).is_zero());
        assert_eq!(ledger.oldest_visible_height(), 1);
    }

    #[test]
    fn test_future_height_is_zero() {
        let mut ledger = SimulatedLedger::new(5, 256);
        ledger.mine_blocks(3);
        assert!(ledger.block_hash(3).is_zero());
        assert!(ledger.block_hash(1_000).is_zero());
    }

    #[test]
    fn test_from_config_mines_initial_blocks() {
        let config = LedgerConfig {
            genesis_seed: 3,
            initial_blocks: 12,
            retention_window: 256,
        };
        let ledger = SimulatedLedger::from_config(&config);
        assert_eq!(ledger.current_height(), 12);
    }
}
