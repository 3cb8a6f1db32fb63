//! Auxiliary gesture helpers: secondary-button pan, context-menu suppression,
//! long-press ping, and wheel gating.
//!
//! None of these own a clock. Every time-dependent call takes the host's
//! millisecond timestamp, so the engine stays deterministic under test.

#[cfg(test)]
#[path = "gestures_test.rs"]
mod gestures_test;

use crate::geometry::Vector;
use crate::input::WheelInput;

// =============================================================
// Pan
// =============================================================

/// A secondary-button press that may turn into a pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    start: Vector,
    last: Vector,
}

impl PanGesture {
    #[must_use]
    pub fn new(screen_pt: Vector) -> Self {
        Self { start: screen_pt, last: screen_pt }
    }

    /// Whether `screen_pt` is far enough from the press point to start panning.
    #[must_use]
    pub fn exceeds(&self, screen_pt: Vector, threshold: f64) -> bool {
        (screen_pt - self.start).magnitude() > threshold
    }

    /// Screen delta since the previous step; advances the last point.
    pub fn step(&mut self, screen_pt: Vector) -> Vector {
        let delta = screen_pt - self.last;
        self.last = screen_pt;
        delta
    }
}

/// Blocks the context menu for a short window after a pan-drag ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextMenuGuard {
    suppressed_until: Option<f64>,
}

impl ContextMenuGuard {
    pub fn suppress(&mut self, now_ms: f64, window_ms: f64) {
        self.suppressed_until = Some(now_ms + window_ms);
    }

    /// Whether a context menu opening at `now_ms` should be shown.
    #[must_use]
    pub fn allows(&self, now_ms: f64) -> bool {
        self.suppressed_until.is_none_or(|until| now_ms >= until)
    }

    pub fn clear(&mut self) {
        self.suppressed_until = None;
    }
}

// =============================================================
// Long press
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingPress {
    screen_pt: Vector,
    last: Vector,
    started_at: f64,
    travelled: f64,
}

/// Long-press detector: fires once the pointer has been held for the
/// configured time without travelling more than the slop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongPress {
    pending: Option<PendingPress>,
}

impl LongPress {
    /// Start the timer for a press at `screen_pt`.
    pub fn arm(&mut self, screen_pt: Vector, now_ms: f64) {
        self.pending = Some(PendingPress { screen_pt, last: screen_pt, started_at: now_ms, travelled: 0.0 });
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Accumulate pointer travel. Returns `true` if this move cancelled the press.
    pub fn track(&mut self, screen_pt: Vector, slop: f64) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        pending.travelled += (screen_pt - pending.last).magnitude();
        pending.last = screen_pt;
        if pending.travelled > slop {
            self.pending = None;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Fire if the hold time has elapsed, yielding the press point in screen
    /// space. A fired press disarms itself.
    pub fn poll(&mut self, now_ms: f64, hold_ms: f64) -> Option<Vector> {
        let pending = self.pending?;
        if now_ms - pending.started_at < hold_ms {
            return None;
        }
        self.pending = None;
        Some(pending.screen_pt)
    }
}

// =============================================================
// Wheel
// =============================================================

/// Zoom direction and pivot for a wheel event, or `None` when the event must
/// be ignored: it came from outside the viewport (e.g. a portal overlay) or
/// carries no vertical delta.
#[must_use]
pub fn wheel_zoom(wheel: &WheelInput) -> Option<(f64, Vector)> {
    if !wheel.target_in_viewport || wheel.delta_y == 0.0 || wheel.delta_y.is_nan() {
        return None;
    }
    Some((-wheel.delta_y, wheel.screen_pt))
}
