//! Grid snapping and in-game distance.
//!
//! Token positions are quantized to the scene's cell size (or a finer
//! sub-cell step when the scene subdivides its cells). Distances for the drag
//! label are counted in whole cells with the Manhattan metric, since movement
//! in the game system is orthogonal.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CELL_SIZE;
use crate::geometry::Vector;

/// Grid descriptor supplied by the scene collaborator. Read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Edge length of one cell in world units.
    pub cell_size: f64,
    /// Snap points per cell edge; 1 snaps to whole cells.
    pub subdivisions: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { cell_size: DEFAULT_CELL_SIZE, subdivisions: 1 }
    }
}

impl GridSpec {
    /// Build a grid, replacing an unusable cell size with the default.
    #[must_use]
    pub fn new(cell_size: f64, subdivisions: u32) -> Self {
        Self { cell_size, subdivisions }.sanitized()
    }

    /// Copy with an invalid cell size or zero subdivisions replaced.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let cell_size = if self.cell_size.is_finite() && self.cell_size > 0.0 {
            self.cell_size
        } else {
            tracing::warn!(cell_size = self.cell_size, "invalid grid cell size; using default");
            DEFAULT_CELL_SIZE
        };
        Self { cell_size, subdivisions: self.subdivisions.max(1) }
    }

    /// Distance between adjacent snap points.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.cell_size / f64::from(self.subdivisions.max(1))
    }

    /// Quantize a world position to the nearest snap point.
    #[must_use]
    pub fn snap(&self, position: Vector) -> Vector {
        position.rounded_to(self.step())
    }

    /// Whole-cell coordinates of a world position.
    #[must_use]
    pub fn cell_of(&self, position: Vector) -> Vector {
        (position / self.cell_size).round() + 0.0
    }

    /// Manhattan distance in cells between the snapped `from` and `to`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn manhattan_cells(&self, from: Vector, to: Vector) -> u32 {
        let delta = (self.cell_of(self.snap(to)) - self.cell_of(self.snap(from))).abs();
        let cells = delta.x + delta.y;
        if cells.is_finite() && cells >= 0.0 { cells as u32 } else { 0 }
    }
}
