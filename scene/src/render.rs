//! Render frame: the per-frame view of the scene handed to the rendering
//! surface.
//!
//! Nothing here draws. The frame carries the CSS-equivalent view transform,
//! every token's resolved render position in world units (the transform is
//! applied by the surface), the marquee overlay in screen space, and the
//! selection's screen-space bounding box for anchoring floating menus.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::doc::TokenKey;
use crate::engine::EngineCore;
use crate::geometry::{Rect, Vector};
use crate::viewport::ViewTransform;

/// One token as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenView {
    pub key: TokenKey,
    /// Top-left corner in world coordinates, snapped and offset by any drag.
    pub position: Vector,
    pub visible: bool,
    pub selected: bool,
    /// Cells travelled so far, present only while the token is being dragged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_cells: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub transform: ViewTransform,
    /// Tokens the viewer may see, bottom first.
    pub tokens: Vec<TokenView>,
    /// Marquee overlay in screen coordinates.
    pub marquee: Option<Rect>,
    /// Screen-space box around the selection.
    pub selection_bounds: Option<Rect>,
}

impl RenderFrame {
    #[must_use]
    pub fn token(&self, key: &TokenKey) -> Option<&TokenView> {
        self.tokens.iter().find(|view| view.key == *key)
    }
}

/// Build the frame for the engine's current state.
#[must_use]
pub fn build(core: &EngineCore) -> RenderFrame {
    let grid = core.grid();
    let role = core.role();
    let selection = core.selection();
    let dragging = core.drag().is_active();

    let tokens = core
        .doc()
        .ordered()
        .into_iter()
        .filter(|&token| role.can_see(token))
        .map(|token| {
            let selected = selection.contains(&token.key);
            TokenView {
                key: token.key,
                position: core.render_position_of(token),
                visible: token.visible,
                selected,
                distance_cells: (dragging && selected).then(|| core.drag().distance_cells(token.position, &grid)),
            }
        })
        .collect();

    RenderFrame {
        transform: core.viewport().transform(),
        tokens,
        marquee: selection.marquee_rect(),
        selection_bounds: core.selection_bounds(),
    }
}
