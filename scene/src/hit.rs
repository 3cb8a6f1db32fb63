#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Token, TokenDoc, TokenKey, TokenKind};
use crate::geometry::{Rect, Vector};
use crate::grid::GridSpec;
use crate::viewport::Viewport;

/// Who is looking at the scene. Decides whether hidden tokens exist for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// The game owner sees and manipulates hidden tokens.
    Owner,
    /// Players never see, hit or select hidden tokens.
    #[default]
    Player,
}

impl Role {
    #[must_use]
    pub fn can_see(self, token: &Token) -> bool {
        token.visible || self == Role::Owner
    }
}

/// World-space bounds of a token placed at `position`.
///
/// Areas span their own size; characters occupy one cell.
#[must_use]
pub fn bounds_at(token: &Token, position: Vector, grid: &GridSpec) -> Rect {
    match token.kind {
        TokenKind::Area { size } => Rect::from_position_size(position, size),
        TokenKind::Character { .. } => Rect::from_position_size(position, grid.cell_size),
    }
}

/// World-space bounds of a token at its snapped canonical position.
#[must_use]
pub fn token_bounds(token: &Token, grid: &GridSpec) -> Rect {
    bounds_at(token, grid.snap(token.position), grid)
}

/// Topmost token visible to `role` whose bounds strictly contain `world_pt`.
///
/// `position_of` supplies the render position, so a token mid-drag is hit
/// where it is drawn.
#[must_use]
pub fn hit_test<F>(world_pt: Vector, doc: &TokenDoc, grid: &GridSpec, role: Role, position_of: F) -> Option<TokenKey>
where
    F: Fn(&Token) -> Vector,
{
    doc.ordered()
        .into_iter()
        .rev()
        .filter(|&token| role.can_see(token))
        .find(|&token| bounds_at(token, position_of(token), grid).contains(world_pt))
        .map(|token| token.key)
}

/// Screen-space bounds for every token visible to `role`, in draw order.
#[must_use]
pub fn screen_bounds<F>(
    doc: &TokenDoc,
    grid: &GridSpec,
    viewport: &Viewport,
    role: Role,
    position_of: F,
) -> Vec<(TokenKey, Rect)>
where
    F: Fn(&Token) -> Vector,
{
    doc.ordered()
        .into_iter()
        .filter(|&token| role.can_see(token))
        .map(|token| (token.key, viewport.world_rect_to_screen(&bounds_at(token, position_of(token), grid))))
        .collect()
}
