//! Shared numeric constants for the scene crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Scale multiplier per zoom tick: `scale = ZOOM_BASE ^ tick`.
pub const ZOOM_BASE: f64 = 1.3;

/// Lowest reachable zoom tick.
pub const ZOOM_MIN_TICK: i32 = -10;

/// Highest reachable zoom tick.
pub const ZOOM_MAX_TICK: i32 = 10;

// ── Grid ────────────────────────────────────────────────────────

/// Cell size used when a scene does not provide a usable one.
pub const DEFAULT_CELL_SIZE: f64 = 70.0;

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space travel before a press on a token becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Screen-space travel before a secondary-button press becomes a pan.
pub const PAN_THRESHOLD_PX: f64 = 5.0;

/// Hold duration that turns a press into a ping.
pub const LONG_PRESS_MS: f64 = 500.0;

/// Cumulative travel that cancels a pending long press.
pub const LONG_PRESS_SLOP_PX: f64 = 10.0;

/// How long the context menu stays suppressed after a pan-drag ends.
pub const CONTEXT_MENU_SUPPRESS_MS: f64 = 300.0;
