//! Geometry primitives: immutable 2D vectors and corner-defined rectangles.
//!
//! Everything above this layer (viewport, grid, hit-testing, selection, drag)
//! is expressed in terms of [`Vector`] and [`Rect`]. Both are `Copy` value
//! types; every operation returns a new instance.
//!
//! Rectangles are stored as two opposite corners that are *not* required to be
//! ordered. All derived quantities (`top_left`, `bottom_right`, edges, size)
//! are normalized through component-wise min/max, so a marquee dragged up and
//! to the left behaves exactly like one dragged down and to the right.
//!
//! Hit-testing is strict on purpose: [`Rect::overlaps`] ignores rectangles that
//! merely touch along an edge, and [`Rect::contains`] excludes boundary points.
//! Marquee selection and click hit-tests both depend on that contract.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while constructing geometry from loosely-typed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The input did not match any accepted rectangle shape.
    #[error("invalid geometry input: received {shape}")]
    InvalidInput { shape: String },
}

// =============================================================
// Vector
// =============================================================

/// A 2D vector / point with real-valued components.
///
/// Deserializes from `{ "x": .., "y": .. }`, a `[x, y]` pair, or a bare number
/// (applied to both components). Always serializes as `{ "x", "y" }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "VectorRepr")]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VectorRepr {
    Pair { x: f64, y: f64 },
    Array([f64; 2]),
    Scalar(f64),
}

impl From<VectorRepr> for Vector {
    fn from(repr: VectorRepr) -> Self {
        match repr {
            VectorRepr::Pair { x, y } => Self::new(x, y),
            VectorRepr::Array([x, y]) => Self::new(x, y),
            VectorRepr::Scalar(v) => Self::new(v, v),
        }
    }
}

impl Vector {
    /// The rest state for drag offsets and pan deltas.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn top_left_most(self, other: impl Into<Vector>) -> Self {
        let other = other.into();
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn bottom_right_most(self, other: impl Into<Vector>) -> Self {
        let other = other.into();
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[must_use]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    #[must_use]
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Round each component to the nearest integer, halves away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    /// Round each component to the nearest multiple of `multiple`, halves
    /// away from zero. A non-positive or non-finite multiple leaves the
    /// vector unchanged.
    #[must_use]
    pub fn rounded_to(self, multiple: f64) -> Self {
        Self::new(round_to(self.x, multiple), round_to(self.y, multiple))
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Both components are finite (no NaN / infinity).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn round_to(value: f64, multiple: f64) -> f64 {
    if !(multiple.is_finite() && multiple > 0.0) {
        return value;
    }
    // `+ 0.0` folds negative zero so snapped values compare cleanly.
    (value / multiple).round() * multiple + 0.0
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Vector {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<f64> for Vector {
    fn from(v: f64) -> Self {
        Self::new(v, v)
    }
}

impl From<Vector> for (f64, f64) {
    fn from(v: Vector) -> Self {
        (v.x, v.y)
    }
}

impl<T: Into<Vector>> Add<T> for Vector {
    type Output = Vector;

    fn add(self, rhs: T) -> Vector {
        let rhs = rhs.into();
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Into<Vector>> Sub<T> for Vector {
    type Output = Vector;

    fn sub(self, rhs: T) -> Vector {
        let rhs = rhs.into();
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================
// Rect
// =============================================================

/// Axis-aligned rectangle defined by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub start: Vector,
    pub end: Vector,
}

/// Every rectangle shape accepted by [`Rect::from_value`].
///
/// Matched in declaration order; unknown extra keys are ignored so DOM-style
/// boxes (which carry `x/y/width/height` *and* `left/top/right/bottom`) work.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum RectInput {
    StartEnd {
        start: Vector,
        end: Vector,
    },
    FromTo {
        from: Vector,
        to: Vector,
    },
    Corners {
        #[serde(rename = "topLeft", alias = "top_left")]
        top_left: Vector,
        #[serde(rename = "bottomRight", alias = "bottom_right")]
        bottom_right: Vector,
    },
    PositionSize {
        position: Vector,
        size: Vector,
    },
    Xywh {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ltrb {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
    Ltwh {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
}

impl From<RectInput> for Rect {
    fn from(input: RectInput) -> Self {
        match input {
            RectInput::StartEnd { start, end } => Rect::new(start, end),
            RectInput::FromTo { from, to } => Rect::new(from, to),
            RectInput::Corners { top_left, bottom_right } => Rect::new(top_left, bottom_right),
            RectInput::PositionSize { position, size } => Rect::from_position_size(position, size),
            RectInput::Xywh { x, y, width, height } | RectInput::Ltwh { left: x, top: y, width, height } => {
                Rect::from_position_size((x, y), (width, height))
            }
            RectInput::Ltrb { left, top, right, bottom } => Rect::from_ltrb(left, top, right, bottom),
        }
    }
}

impl TryFrom<&Value> for Rect {
    type Error = GeometryError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Rect::from_value(value)
    }
}

impl Rect {
    #[must_use]
    pub fn new(start: impl Into<Vector>, end: impl Into<Vector>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    #[must_use]
    pub fn from_position_size(position: impl Into<Vector>, size: impl Into<Vector>) -> Self {
        let position = position.into();
        Self::new(position, position + size)
    }

    #[must_use]
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new((left, top), (right, bottom))
    }

    /// Build a rectangle from loosely-typed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidInput`] naming the received shape when
    /// the value matches none of the [`RectInput`] variants.
    pub fn from_value(value: &Value) -> Result<Self, GeometryError> {
        RectInput::deserialize(value)
            .map(Rect::from)
            .map_err(|_| GeometryError::InvalidInput { shape: describe_shape(value) })
    }

    /// Smallest rectangle covering every rect in `rects`; `None` when empty.
    pub fn bounding<I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    #[must_use]
    pub fn top_left(&self) -> Vector {
        self.start.top_left_most(self.end)
    }

    #[must_use]
    pub fn bottom_right(&self) -> Vector {
        self.start.bottom_right_most(self.end)
    }

    #[must_use]
    pub fn size(&self) -> Vector {
        self.bottom_right() - self.top_left()
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.top_left().x
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.top_left().y
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.bottom_right().x
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom_right().y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.size().x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.size().y
    }

    #[must_use]
    pub fn center(&self) -> Vector {
        (self.start + self.end) / 2.0
    }

    /// Zero width or zero height.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.x == 0.0 || size.y == 0.0
    }

    /// Interiors intersect. Rectangles sharing only an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// `point` lies strictly inside; boundary points are excluded.
    #[must_use]
    pub fn contains(&self, point: impl Into<Vector>) -> bool {
        let p = point.into();
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    /// Normalized copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: impl Into<Vector>) -> Rect {
        let delta = delta.into();
        Rect::new(self.top_left() + delta, self.bottom_right() + delta)
    }

    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.top_left().top_left_most(other.top_left()),
            self.bottom_right().bottom_right_most(other.bottom_right()),
        )
    }

    /// Map both corners through `f` (e.g. a world-to-screen transform).
    #[must_use]
    pub fn map_corners(&self, f: impl Fn(Vector) -> Vector) -> Rect {
        Rect::new(f(self.start), f(self.end))
    }
}

fn describe_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(_) => "boolean".to_owned(),
        Value::Number(_) => "number".to_owned(),
        Value::String(_) => "string".to_owned(),
        Value::Array(items) => format!("array of length {}", items.len()),
        Value::Object(map) => {
            let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
            format!("object with keys [{}]", keys.join(", "))
        }
    }
}
