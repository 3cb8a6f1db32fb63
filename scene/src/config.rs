//! Interaction tuning shared by the viewport and gesture handlers.
//!
//! Hosts usually take [`InteractionConfig::default`]. The struct is
//! deserializable with every field optional, so a partial JSON object only
//! overrides what it names.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CONTEXT_MENU_SUPPRESS_MS, DRAG_THRESHOLD_PX, LONG_PRESS_MS, LONG_PRESS_SLOP_PX, PAN_THRESHOLD_PX, ZOOM_BASE,
    ZOOM_MAX_TICK, ZOOM_MIN_TICK,
};

/// Zoom progression: `scale = base ^ tick`, tick clamped to `[min_tick, max_tick]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub base: f64,
    pub min_tick: i32,
    pub max_tick: i32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self { base: ZOOM_BASE, min_tick: ZOOM_MIN_TICK, max_tick: ZOOM_MAX_TICK }
    }
}

impl ZoomSettings {
    /// Clamp a tick into the configured range.
    #[must_use]
    pub fn clamp_tick(&self, tick: i32) -> i32 {
        tick.clamp(self.min_tick, self.max_tick.max(self.min_tick))
    }

    /// Scale factor for a tick.
    #[must_use]
    pub fn scale_for(&self, tick: i32) -> f64 {
        self.base.powi(tick)
    }
}

/// All gesture thresholds and timers, in screen pixels and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub zoom: ZoomSettings,
    /// Travel before a press on a token starts dragging.
    pub drag_threshold_px: f64,
    /// Travel before a secondary-button press starts panning.
    pub pan_threshold_px: f64,
    /// Hold time for a long-press ping.
    pub long_press_ms: f64,
    /// Travel that cancels a pending long press.
    pub long_press_slop_px: f64,
    /// Context-menu suppression window after a pan-drag.
    pub context_menu_suppress_ms: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            drag_threshold_px: DRAG_THRESHOLD_PX,
            pan_threshold_px: PAN_THRESHOLD_PX,
            long_press_ms: LONG_PRESS_MS,
            long_press_slop_px: LONG_PRESS_SLOP_PX,
            context_menu_suppress_ms: CONTEXT_MENU_SUPPRESS_MS,
        }
    }
}
