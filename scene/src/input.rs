//! Input model: modifier keys, pointer buttons, keys, wheel events, and the
//! gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and the
//! terminating pointer event. Heavier per-gesture data lives with its owner:
//! the marquee rectangle in [`crate::selection::Selection`], the drag offset in
//! [`crate::drag::TokenDrag`]. The variants here only carry what the engine
//! needs to decide the next transition.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::TokenKey;
use crate::geometry::Vector;
use crate::gestures::PanGesture;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Click toggles a single token instead of replacing the selection.
    #[must_use]
    pub fn toggles(self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Marquee extends the selection instead of replacing it.
    #[must_use]
    pub fn additive(self) -> bool {
        self.shift
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// A wheel event over the scene.
#[derive(Debug, Clone, Copy)]
pub struct WheelInput {
    /// Cursor position in screen coordinates.
    pub screen_pt: Vector,
    /// Vertical scroll amount (positive = down, i.e. zoom out).
    pub delta_y: f64,
    /// Whether the event target sits inside the viewport's element subtree.
    pub target_in_viewport: bool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Primary drag on empty space; the rectangle lives in the selection.
    Marquee,
    /// Primary press on a token that has not yet moved past the drag threshold.
    PressingToken {
        /// Token under the pointer at press time.
        key: TokenKey,
        /// Screen point of the press; the drag origin if it becomes a drag.
        start_screen: Vector,
        /// Collapse a multi-selection to `key` if released without dragging.
        collapse_on_release: bool,
    },
    /// Selected tokens are following the pointer.
    DraggingTokens,
    /// Secondary press that may still be a plain right-click.
    PanPending(PanGesture),
    /// Secondary drag moving the viewport.
    Panning(PanGesture),
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
