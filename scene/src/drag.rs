//! Multi-token drag: one live offset shared by every selected token.
//!
//! While a drag is active each selected token renders at
//! `snap(position) + offset`, so the preview starts from a grid-aligned base
//! and then follows the pointer smoothly. Releasing commits
//! `snap(position + offset)` for each token. The offset is expressed in world
//! units and only returns to zero after the committed positions have been
//! written into the document, so no frame ever shows the token back at its
//! old cell.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::doc::{TokenDoc, TokenKey};
use crate::geometry::Vector;
use crate::grid::GridSpec;

/// Live state of a token drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TokenDrag {
    /// Screen point where the drag started; `None` when idle.
    origin: Option<Vector>,
    /// Cumulative pointer travel in world units.
    offset: Vector,
}

impl TokenDrag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking from `screen_pt`. Any previous offset is discarded.
    pub fn begin(&mut self, screen_pt: Vector) {
        self.origin = Some(screen_pt);
        self.offset = Vector::ZERO;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    #[must_use]
    pub fn offset(&self) -> Vector {
        self.offset
    }

    /// Recompute the offset from the pointer's current screen point.
    ///
    /// The screen delta from the origin is divided by the viewport scale.
    /// Returns `true` when the offset changed.
    pub fn update(&mut self, screen_pt: Vector, scale: f64) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        let next = (screen_pt - origin) / scale;
        if !next.is_finite() || next == self.offset {
            return false;
        }
        self.offset = next;
        true
    }

    /// Where a dragged token is drawn right now.
    #[must_use]
    pub fn preview_position(&self, position: Vector, grid: &GridSpec) -> Vector {
        grid.snap(position) + self.offset
    }

    /// Where a dragged token lands if the drag ended now.
    #[must_use]
    pub fn committed_position(&self, position: Vector, grid: &GridSpec) -> Vector {
        grid.snap(position + self.offset)
    }

    /// Cells travelled by a dragged token, for the distance label.
    #[must_use]
    pub fn distance_cells(&self, position: Vector, grid: &GridSpec) -> u32 {
        grid.manhattan_cells(position, position + self.offset)
    }

    /// End the drag: resolve the final snapped position of every key still in
    /// the document, write them into `doc`, then clear the offset.
    ///
    /// The returned batch lists every moved token, including ones whose
    /// position did not change; re-sending an unchanged snapped position is
    /// harmless for the store.
    pub fn commit<I>(&mut self, keys: I, doc: &mut TokenDoc, grid: &GridSpec) -> Vec<(TokenKey, Vector)>
    where
        I: IntoIterator<Item = TokenKey>,
    {
        let batch: Vec<(TokenKey, Vector)> = keys
            .into_iter()
            .filter_map(|key| doc.get(&key).map(|token| (key, self.committed_position(token.position, grid))))
            .collect();

        for (key, position) in &batch {
            doc.set_position(key, *position);
        }
        tracing::debug!(count = batch.len(), offset = %self.offset, "token drag committed");
        self.reset();
        batch
    }

    /// Drop the gesture without committing, e.g. when the scene changes.
    pub fn reset(&mut self) {
        self.origin = None;
        self.offset = Vector::ZERO;
    }
}
