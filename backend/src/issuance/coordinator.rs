//! Issuance coordinator
//!
//! One issuance:
//!
//! ```text
//! 1. Reserve the next identifier from the ownership ledger
//! 2. Draw a permutation of 1..=10 from the latest sealed block, salt "issuance-{id}"
//! 3. Map values 1-3 onto ELEMENTS and 4-6 onto CREATURES
//! 4. Render the selection
//! 5. Mint the identifier to the holder with the rendered document
//! 6. Pin the block hash
//! ```
//!
//! The hash is pinned only after the mint succeeds, so a failed render or
//! mint leaves the engine untouched. No audit entry is written.

use crate::core::ledger::EntropySource;
use crate::engine::DrawEngine;
use crate::issuance::keywords::{self, LIST_LEN};
use crate::issuance::ownership::OwnershipLedger;
use crate::issuance::render::Renderer;
use crate::issuance::{IssuanceError, Selection};

/// Result of one issuance
#[derive(Debug, Clone, PartialEq)]
pub struct Issued {
    pub selection: Selection,
    pub document: String,
}

/// Drives draws into the renderer and the ownership ledger
#[derive(Debug, Clone)]
pub struct IssuanceCoordinator<R: Renderer, L: OwnershipLedger> {
    renderer: R,
    ledger: L,
}

impl<R: Renderer, L: OwnershipLedger> IssuanceCoordinator<R, L> {
    pub fn new(renderer: R, ledger: L) -> Self {
        Self { renderer, ledger }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Salt used for the draw behind identifier `id`
    pub fn salt_for(id: u64) -> String {
        format!("issuance-{}", id)
    }

    /// Issue one collectible to `holder`
    pub fn issue<S: EntropySource>(
        &mut self,
        engine: &mut DrawEngine<S>,
        holder: &str,
        timestamp: u64,
    ) -> Result<Issued, IssuanceError> {
        if holder.is_empty() {
            return Err(IssuanceError::EmptyHolder);
        }

        let id = self.ledger.next_id();
        let height = engine
            .source()
            .current_height()
            .checked_sub(1)
            .ok_or(IssuanceError::NoSealedBlock)?;
        let salt = Self::salt_for(id);

        let n = LIST_LEN as u64;
        let (result, hash) = engine.preview(n, n, height, &salt)?;
        let (first, second) = keywords::select(result.values())?;

        let selection = Selection {
            id,
            timestamp,
            height,
            salt,
            values: result.into_values(),
            first,
            second,
        };
        let document = self.renderer.render(&selection)?;
        self.ledger.mint(id, holder, document.clone())?;
        engine.record_pin(height, hash);

        tracing::info!(
            id,
            holder,
            height,
            first = ?selection.first,
            second = ?selection.second,
            "issued collectible"
        );
        Ok(Issued {
            selection,
            document,
        })
    }
}
