#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::Serialize;

use crate::config::ZoomSettings;
use crate::geometry::{Rect, Vector};

/// CSS-equivalent view transform handed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    /// Screen-space translation in CSS pixels.
    pub translate: Vector,
    /// Uniform scale factor.
    pub scale: f64,
}

impl ViewTransform {
    /// Render as a CSS `transform` value (translate first, then scale).
    #[must_use]
    pub fn css(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.translate.x, self.translate.y, self.scale)
    }
}

/// Pan/zoom state for one scene session.
///
/// `offset` is the world-to-screen translation in CSS pixels. Zoom is stored
/// only as an integer tick; the scale factor is always derived as
/// `base ^ tick`, so zooming in and back out by the same number of ticks
/// restores the exact scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Vector,
    scale_tick: i32,
    zoom: ZoomSettings,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomSettings::default())
    }
}

impl Viewport {
    #[must_use]
    pub fn new(zoom: ZoomSettings) -> Self {
        Self { offset: Vector::ZERO, scale_tick: 0, zoom }
    }

    /// Viewport at an explicit offset and tick (the tick is clamped).
    #[must_use]
    pub fn with_state(zoom: ZoomSettings, offset: impl Into<Vector>, scale_tick: i32) -> Self {
        Self { offset: offset.into(), scale_tick: zoom.clamp_tick(scale_tick), zoom }
    }

    #[must_use]
    pub fn scale_tick(&self) -> i32 {
        self.scale_tick
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.zoom.scale_for(self.scale_tick)
    }

    #[must_use]
    pub fn settings(&self) -> ZoomSettings {
        self.zoom
    }

    /// Back to zero offset and tick zero, keeping the zoom settings.
    pub fn reset(&mut self) {
        self.offset = Vector::ZERO;
        self.scale_tick = 0;
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Vector) -> Vector {
        world * self.scale() + self.offset
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vector) -> Vector {
        (screen - self.offset) / self.scale()
    }

    /// Convert a screen-space displacement to a world-space displacement.
    #[must_use]
    pub fn screen_delta_to_world(&self, delta: Vector) -> Vector {
        delta / self.scale()
    }

    #[must_use]
    pub fn world_rect_to_screen(&self, rect: &Rect) -> Rect {
        rect.map_corners(|p| self.world_to_screen(p))
    }

    /// Pan by a screen-space delta. Unbounded.
    pub fn move_by(&mut self, delta: Vector) {
        self.offset = self.offset + delta;
    }

    /// Step the zoom one tick in the sign of `direction`, keeping the world
    /// point under `pivot` (screen space) fixed.
    ///
    /// Returns `false` without touching the offset when `direction` is zero
    /// or the tick is already at the limit.
    pub fn zoom(&mut self, direction: f64, pivot: Vector) -> bool {
        let step = if direction > 0.0 {
            1
        } else if direction < 0.0 {
            -1
        } else {
            return false;
        };
        let next = self.zoom.clamp_tick(self.scale_tick.saturating_add(step));
        if next == self.scale_tick {
            return false;
        }

        let old_scale = self.scale();
        let new_scale = self.zoom.scale_for(next);
        self.offset = self.offset + (pivot - self.offset) * (1.0 - new_scale / old_scale);
        self.scale_tick = next;
        tracing::trace!(tick = next, scale = new_scale, pivot = %pivot, "viewport zoomed");
        true
    }

    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        ViewTransform { translate: self.offset, scale: self.scale() }
    }
}
