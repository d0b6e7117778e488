//! Collectible issuance
//!
//! Consumes draws from the engine and hands them to two collaborators:
//! - a `Renderer` that turns a `Selection` into a document
//! - an `OwnershipLedger` that assigns identifiers and holders
//!
//! Both are traits; `SvgRenderer` and `InMemoryOwnershipLedger` are the
//! defaults.
//!
//! # Example
//!
//! ```rust
//! use entropy_draw_core_rs::{DrawEngine, EngineConfig, SimulatedLedger};
//! use entropy_draw_core_rs::issuance::{
//!     InMemoryOwnershipLedger, IssuanceCoordinator, OwnershipLedger, SvgRenderer,
//! };
//!
//! let mut chain = SimulatedLedger::new(3, 256);
//! chain.mine_blocks(5);
//! let mut engine = DrawEngine::new(chain, EngineConfig::default());
//! let mut coordinator =
//!     IssuanceCoordinator::new(SvgRenderer::default(), InMemoryOwnershipLedger::new());
//!
//! let issued = coordinator.issue(&mut engine, "alice", 1_700_000_000).unwrap();
//! assert_eq!(issued.selection.id, 1);
//! assert_eq!(coordinator.ledger().owner_of(1), Some("alice"));
//! ```

pub mod coordinator;
pub mod keywords;
pub mod ownership;
pub mod render;

use crate::engine::DrawError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use coordinator::{IssuanceCoordinator, Issued};
pub use keywords::{CREATURES, ELEMENTS};
pub use ownership::{InMemoryOwnershipLedger, OwnershipLedger};
pub use render::{Renderer, SvgRenderer};

/// Errors from issuing a collectible
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("Draw failed: {0}")]
    Draw(#[from] DrawError),

    #[error("No sealed block to draw from")]
    NoSealedBlock,

    #[error("Draw produced {got} values, need {needed}")]
    InsufficientDraw { needed: usize, got: usize },

    #[error("Drawn value {0} has no keyword")]
    KeywordOutOfRange(u64),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Identifier {0} already minted")]
    DuplicateIdentifier(u64),

    #[error("Unknown identifier {0}")]
    UnknownIdentifier(u64),

    #[error("{caller} does not hold identifier {id}")]
    NotHolder { id: u64, caller: String },

    #[error("Holder must not be empty")]
    EmptyHolder,
}

/// Everything the renderer needs for one collectible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: u64,
    pub timestamp: u64,
    /// Block the draw used
    pub height: u64,
    pub salt: String,
    /// Full draw in discovery order
    pub values: Vec<u64>,
    pub first: [String; 3],
    pub second: [String; 3],
}
