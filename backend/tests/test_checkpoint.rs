//! Checkpoint Tests - Save/Load Engine State
//!
//! Critical invariants tested:
//! - Round trip: pins and audit log survive save/load
//! - Determinism: restored engine recomputes the same draws
//! - Config matching: reject state from a different config
//! - Table integrity: reject duplicate heights and zero hashes
//! - Log integrity: reject audit entries that do not recompute from their pin

use entropy_draw_core_rs::{
    BlockHash, CheckpointError, DrawEngine, DrawError, EngineConfig, EngineSnapshot,
    PinnedHash, SamplerConfig, SimulatedLedger,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_ledger() -> SimulatedLedger {
    let mut ledger = SimulatedLedger::new(42, 16);
    ledger.mine_blocks(40);
    ledger
}

/// Engine with two pins and two committed draws
fn create_populated_engine() -> DrawEngine<SimulatedLedger> {
    let mut engine = DrawEngine::new(create_test_ledger(), EngineConfig::default());
    engine.pin(30).unwrap();
    engine.commit(10, 4, 30, "first").unwrap();
    engine.commit(100, 6, 35, "second").unwrap();
    engine
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_snapshot_round_trip() {
    let engine = create_populated_engine();
    let snapshot = engine.snapshot().unwrap();

    assert_eq!(snapshot.pinned.len(), 2);
    assert_eq!(snapshot.audit_log.len(), 2);

    let json = snapshot.to_json().unwrap();
    let loaded = EngineSnapshot::from_json(&json).unwrap();
    assert_eq!(loaded, snapshot);

    let restored =
        DrawEngine::restore(create_test_ledger(), EngineConfig::default(), loaded).unwrap();
    assert_eq!(restored.cache(), engine.cache());
    assert_eq!(restored.audit_log(), engine.audit_log());
}

#[test]
fn test_restored_pins_still_reject_repin() {
    let engine = create_populated_engine();
    let snapshot = engine.snapshot().unwrap();
    let mut restored =
        DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot).unwrap();

    assert_eq!(restored.pin(30), Err(DrawError::AlreadyPinned(30)));
}

#[test]
fn test_restored_engine_verifies_after_window() {
    let engine = create_populated_engine();
    let snapshot = engine.snapshot().unwrap();

    // Restart much later: heights 30 and 35 are long gone from the ledger
    let mut later = create_test_ledger();
    later.mine_blocks(1_000);
    let restored = DrawEngine::restore(later, EngineConfig::default(), snapshot).unwrap();

    for entry in restored.audit_log().entries() {
        assert!(restored.verify(entry).unwrap(), "entry at {} failed", entry.height);
    }
}

#[test]
fn test_pins_sorted_by_height() {
    let mut engine = DrawEngine::new(create_test_ledger(), EngineConfig::default());
    engine.pin(38).unwrap();
    engine.pin(31).unwrap();
    engine.pin(35).unwrap();

    let heights: Vec<u64> = engine
        .snapshot()
        .unwrap()
        .pinned
        .iter()
        .map(|p| p.height)
        .collect();
    assert_eq!(heights, vec![31, 35, 38]);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_config_mismatch_rejected() {
    let snapshot = create_populated_engine().snapshot().unwrap();
    let other = EngineConfig {
        sampler: SamplerConfig {
            max_collisions: Some(1_000),
        },
    };

    let result = DrawEngine::restore(create_test_ledger(), other, snapshot);
    assert!(matches!(result, Err(CheckpointError::ConfigMismatch { .. })));
}

#[test]
fn test_duplicate_height_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    let dup = snapshot.pinned[0];
    snapshot.pinned.push(PinnedHash {
        height: dup.height,
        hash: BlockHash::new([9; 32]),
    });

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(
        result,
        Err(CheckpointError::DuplicateHeight(h)) if h == dup.height
    ));
}

#[test]
fn test_zero_hash_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    snapshot.pinned.push(PinnedHash {
        height: 5,
        hash: BlockHash::ZERO,
    });

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(result, Err(CheckpointError::ZeroHash(5))));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        EngineSnapshot::from_json("{\"pinned\": 3}"),
        Err(CheckpointError::Serialization(_))
    ));
}

#[test]
fn test_truncated_entry_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    snapshot.audit_log[1].result.pop();

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(result, Err(CheckpointError::EntryMismatch { index: 1 })));
}

#[test]
fn test_out_of_range_entry_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    snapshot.audit_log[0].result[0] = 11;

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(result, Err(CheckpointError::EntryMismatch { index: 0 })));
}

#[test]
fn test_entry_with_invalid_count_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    snapshot.audit_log[0].count = 0;
    snapshot.audit_log[0].result.clear();

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(
        result,
        Err(CheckpointError::InvalidEntry {
            index: 0,
            source: DrawError::InvalidCount { count: 0, max: 10 },
        })
    ));
}

#[test]
fn test_entry_without_pin_rejected() {
    let mut snapshot = create_populated_engine().snapshot().unwrap();
    snapshot.audit_log[1].height = 12;

    let result = DrawEngine::restore(create_test_ledger(), EngineConfig::default(), snapshot);
    assert!(matches!(
        result,
        Err(CheckpointError::UnpinnedEntry {
            index: 1,
            height: 12
        })
    ));
}
