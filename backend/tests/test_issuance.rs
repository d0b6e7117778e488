//! Tests for collectible issuance

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use entropy_draw_core_rs::issuance::{
    IssuanceCoordinator, IssuanceError, InMemoryOwnershipLedger, OwnershipLedger, Renderer,
    Selection, SvgRenderer, CREATURES, ELEMENTS,
};
use entropy_draw_core_rs::{
    BlockHash, DrawEngine, EngineConfig, EntropySource, Sampler, SimulatedLedger,
};

fn create_engine(blocks: u64) -> DrawEngine<SimulatedLedger> {
    let mut ledger = SimulatedLedger::new(8, 256);
    ledger.mine_blocks(blocks);
    DrawEngine::new(ledger, EngineConfig::default())
}

fn create_coordinator() -> IssuanceCoordinator<SvgRenderer, InMemoryOwnershipLedger> {
    IssuanceCoordinator::new(SvgRenderer::default(), InMemoryOwnershipLedger::new())
}

#[test]
fn test_issue_assigns_sequential_ids() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();

    let first = coordinator.issue(&mut engine, "alice", 100).unwrap();
    let second = coordinator.issue(&mut engine, "bob", 200).unwrap();

    assert_eq!(first.selection.id, 1);
    assert_eq!(second.selection.id, 2);
    assert_eq!(coordinator.ledger().owner_of(1), Some("alice"));
    assert_eq!(coordinator.ledger().owner_of(2), Some("bob"));
    assert_eq!(coordinator.ledger().total_supply(), 2);
    assert_eq!(
        coordinator.ledger().metadata_of(1),
        Some(first.document.as_str())
    );
}

#[test]
fn test_selection_matches_draw() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();
    let issued = coordinator.issue(&mut engine, "alice", 100).unwrap();
    let selection = &issued.selection;

    assert_eq!(selection.height, 9);
    assert_eq!(selection.salt, "issuance-1");

    // Recompute from the pinned hash
    let hash = engine.pinned(9).unwrap();
    let draw = Sampler::default()
        .draw(&hash, 10, 10, selection.salt.as_bytes())
        .unwrap();
    assert_eq!(draw.values(), selection.values.as_slice());

    for k in 0..3 {
        assert_eq!(selection.first[k], ELEMENTS[(draw.values()[k] - 1) as usize]);
        assert_eq!(selection.second[k], CREATURES[(draw.values()[k + 3] - 1) as usize]);
    }
}

#[test]
fn test_issuance_does_not_write_audit_log() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();
    coordinator.issue(&mut engine, "alice", 100).unwrap();
    assert!(engine.audit_log().is_empty());
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn test_same_block_different_ids_use_different_salts() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();
    let a = coordinator.issue(&mut engine, "alice", 100).unwrap();
    let b = coordinator.issue(&mut engine, "alice", 100).unwrap();
    assert_eq!(a.selection.height, b.selection.height);
    assert_ne!(a.selection.salt, b.selection.salt);
}

#[test]
fn test_no_sealed_block() {
    let mut engine = create_engine(0);
    let mut coordinator = create_coordinator();
    assert!(matches!(
        coordinator.issue(&mut engine, "alice", 100),
        Err(IssuanceError::NoSealedBlock)
    ));
    assert_eq!(coordinator.ledger().total_supply(), 0);
}

#[test]
fn test_empty_holder_rejected() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();
    assert!(matches!(
        coordinator.issue(&mut engine, "", 100),
        Err(IssuanceError::EmptyHolder)
    ));
}

#[test]
fn test_document_embeds_selection() {
    let mut engine = create_engine(10);
    let mut coordinator = create_coordinator();
    let issued = coordinator.issue(&mut engine, "alice", 1_700_000_000).unwrap();

    let payload = issued
        .document
        .strip_prefix("data:application/json;base64,")
        .unwrap();
    let doc: serde_json::Value =
        serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();

    assert_eq!(doc["name"], "Entropy Draw #1");
    let values: Vec<&str> = doc["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["value"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = issued
        .selection
        .first
        .iter()
        .chain(issued.selection.second.iter())
        .map(String::as_str)
        .collect();
    assert_eq!(values, expected);
}

/// Renderer that always fails
struct BrokenRenderer;

impl Renderer for BrokenRenderer {
    fn render(&self, _selection: &Selection) -> Result<String, IssuanceError> {
        Err(IssuanceError::Render("template missing".to_string()))
    }
}

#[test]
fn test_render_failure_mints_nothing() {
    let mut engine = create_engine(10);
    let mut coordinator = IssuanceCoordinator::new(BrokenRenderer, InMemoryOwnershipLedger::new());
    assert!(matches!(
        coordinator.issue(&mut engine, "alice", 100),
        Err(IssuanceError::Render(_))
    ));
    assert_eq!(coordinator.ledger().next_id(), 1);
    assert!(engine.cache().is_empty());
    assert!(engine.pinned(9).is_none());
}

/// Ownership ledger that refuses every mint
struct FrozenLedger;

impl OwnershipLedger for FrozenLedger {
    fn next_id(&self) -> u64 {
        1
    }

    fn mint(&mut self, id: u64, _holder: &str, _metadata: String) -> Result<(), IssuanceError> {
        Err(IssuanceError::DuplicateIdentifier(id))
    }

    fn owner_of(&self, _id: u64) -> Option<&str> {
        None
    }
}

#[test]
fn test_mint_failure_leaves_no_pin() {
    let mut engine = create_engine(10);
    let mut coordinator = IssuanceCoordinator::new(SvgRenderer::default(), FrozenLedger);
    assert!(matches!(
        coordinator.issue(&mut engine, "alice", 100),
        Err(IssuanceError::DuplicateIdentifier(1))
    ));
    assert!(engine.cache().is_empty());

    // The height is still free to pin explicitly
    assert!(engine.pin(9).is_ok());
}

/// Source with a single fixed hash at every height
struct FixedSource;

impl EntropySource for FixedSource {
    fn block_hash(&self, _height: u64) -> BlockHash {
        BlockHash::new([0x42; 32])
    }

    fn current_height(&self) -> u64 {
        10
    }
}

#[test]
fn test_golden_issuance() {
    let mut engine = DrawEngine::new(FixedSource, EngineConfig::default());
    let mut coordinator = create_coordinator();
    let issued = coordinator.issue(&mut engine, "alice", 0).unwrap();

    assert_eq!(issued.selection.values, vec![4, 6, 9, 1, 3, 2, 5, 10, 8, 7]);
    assert_eq!(issued.selection.first, ["Stone", "Bloom", "Dawn"]);
    assert_eq!(issued.selection.second, ["Fox", "Wolf", "Heron"]);
}
