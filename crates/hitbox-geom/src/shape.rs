//! Shape records: [`Circle`], [`Rect`] and the closed [`Shape`] variant set.
//!
//! Geometry (radius, extents) is normalized on construction so that every
//! shape satisfies its invariants; pose (position, rotation) is freely
//! mutable by the driver between ticks. None of the collision queries mutate
//! the shapes they inspect.

use nalgebra::Rotation2;
use serde::{Deserialize, Serialize};

use crate::primitives;
use crate::vector::Vec2;
use crate::GeomError;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// A closed 1D interval `[min, max]`, used for axis projections.
///
/// [`Interval::EMPTY`] has `min = +inf` and `max = -inf`, so including any
/// value makes it a degenerate single-point interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Interval {
    /// The empty interval.
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Build an interval from two bounds in either order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        if a < b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Grow the interval to include `value`.
    #[inline]
    pub fn include(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Strict overlap: intervals that only share an endpoint do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min < other.max && other.min < self.max
    }

    /// Strict containment of a single value (endpoints excluded).
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min < value && value < self.max
    }

    /// Length of the shared part of both intervals (negative when disjoint).
    #[inline]
    pub fn overlap_depth(&self, other: &Interval) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

// ---------------------------------------------------------------------------
// Circle
// ---------------------------------------------------------------------------

/// A circle given by its centre and a non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CircleRepr")]
pub struct Circle {
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    radius: f64,
}

#[derive(Deserialize)]
struct CircleRepr {
    x: f64,
    y: f64,
    radius: f64,
}

impl From<CircleRepr> for Circle {
    fn from(r: CircleRepr) -> Self {
        Circle::new(r.x, r.y, r.radius)
    }
}

impl Circle {
    /// Create a circle. A negative radius is replaced by its absolute value.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            radius: radius.abs(),
        }
    }

    /// The radius (always `>= 0`).
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius, keeping it non-negative.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.abs();
    }

    /// The centre point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same as [`Circle::center`]; every shape exposes a `middle`.
    #[inline]
    pub fn middle(&self) -> Vec2 {
        self.center()
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// Strict point containment: points on the circumference are outside.
    pub fn collide_point(&self, x: f64, y: f64) -> bool {
        primitives::distance_squared(self.center(), Vec2::new(x, y)) < self.radius * self.radius
    }

    /// Reject NaN or infinite fields.
    pub fn validate(&self) -> Result<(), GeomError> {
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        check_finite("radius", self.radius)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle given by its top-left corner, extents and a rotation.
///
/// The rotation (radians) pivots about [`Rect::middle`]. A rotation of
/// exactly `0.0` is the canonical axis-aligned case and takes the fast path
/// in every query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectRepr")]
pub struct Rect {
    /// Top-left x (before rotation).
    pub x: f64,
    /// Top-left y (before rotation).
    pub y: f64,
    width: f64,
    height: f64,
    /// Rotation about the middle, in radians.
    pub rotation: f64,
}

#[derive(Deserialize)]
struct RectRepr {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    rotation: f64,
}

impl From<RectRepr> for Rect {
    fn from(r: RectRepr) -> Self {
        Rect::new(r.x, r.y, r.width, r.height).with_rotation(r.rotation)
    }
}

impl Rect {
    /// Create an axis-aligned rectangle.
    ///
    /// Negative extents grow the rectangle to the left / upward: the origin is
    /// shifted and the sign flipped, so `Rect::new(10, 0, -4, 2)` covers
    /// `x in [6, 10]`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = normalize_extent(x, width);
        let (y, height) = normalize_extent(y, height);
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Create a rectangle rotated by `rotation` radians about its middle.
    pub fn rotated(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self::new(x, y, width, height).with_rotation(rotation)
    }

    /// Builder-style rotation setter.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Width (always `>= 0`).
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height (always `>= 0`).
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Resize, applying the same negative-extent normalization as [`Rect::new`].
    pub fn set_size(&mut self, width: f64, height: f64) {
        let (x, width) = normalize_extent(self.x, width);
        let (y, height) = normalize_extent(self.y, height);
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    /// Whether the rotation is exactly zero.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation == 0.0
    }

    /// Centre point (also the rotation pivot).
    #[inline]
    pub fn middle(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half of the width and height.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// World-space corners, clockwise on screen starting at the top-left,
    /// after rotation about the middle.
    pub fn corners(&self) -> [Vec2; 4] {
        let m = self.middle();
        let h = self.half_extents();
        let local = [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ];
        if self.is_axis_aligned() {
            return local.map(|p| m + p);
        }
        let rot = Rotation2::new(self.rotation);
        local.map(|p| m + rot * p)
    }

    /// The two unit edge normals of the rotated rectangle.
    pub fn axes(&self) -> [Vec2; 2] {
        if self.is_axis_aligned() {
            return [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        }
        let rot = Rotation2::new(self.rotation);
        [rot * Vec2::x(), rot * Vec2::y()]
    }

    /// Axis-aligned bounding box; the rectangle itself when unrotated.
    pub fn bounding_box(&self) -> Rect {
        if self.is_axis_aligned() {
            return *self;
        }
        let mut xs = Interval::EMPTY;
        let mut ys = Interval::EMPTY;
        for c in self.corners() {
            xs.include(c.x);
            ys.include(c.y);
        }
        Rect::new(xs.min, ys.min, xs.max - xs.min, ys.max - ys.min)
    }

    /// Move the rectangle so that its middle lands on `middle`.
    pub fn set_middle(&mut self, middle: Vec2) {
        self.x = middle.x - self.width / 2.0;
        self.y = middle.y - self.height / 2.0;
    }

    /// Strict point containment honouring the rotation.
    pub fn collide_point(&self, x: f64, y: f64) -> bool {
        crate::oriented::point_in_oriented_rect(self, Vec2::new(x, y))
    }

    /// Reject NaN or infinite fields.
    pub fn validate(&self) -> Result<(), GeomError> {
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        check_finite("width", self.width)?;
        check_finite("height", self.height)?;
        check_finite("rotation", self.rotation)
    }
}

fn normalize_extent(origin: f64, extent: f64) -> (f64, f64) {
    if extent < 0.0 {
        (origin + extent, -extent)
    } else {
        (origin, extent)
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), GeomError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeomError::NonFinite { field, value })
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// The closed set of collidable shapes.
///
/// Every pairwise query matches exhaustively over both operands, so adding a
/// variant is a compile error until each query handles it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A circle.
    Circle(Circle),
    /// An axis-aligned or rotated rectangle.
    Rect(Rect),
}

impl Shape {
    /// Geometric centre.
    pub fn middle(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.middle(),
            Shape::Rect(r) => r.middle(),
        }
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Circle(c) => c.bounding_box(),
            Shape::Rect(r) => r.bounding_box(),
        }
    }

    /// Overlap test against any other shape. Symmetric:
    /// `a.collide_box(&b) == b.collide_box(&a)`.
    pub fn collide_box(&self, other: &Shape) -> bool {
        primitives::overlap(self, other)
    }

    /// Strict point containment.
    pub fn collide_point(&self, x: f64, y: f64) -> bool {
        match self {
            Shape::Circle(c) => c.collide_point(x, y),
            Shape::Rect(r) => r.collide_point(x, y),
        }
    }

    /// Move the shape so its middle lands on `middle` and set the rotation.
    /// Circles ignore the rotation.
    pub fn set_pose(&mut self, middle: Vec2, rotation: f64) {
        match self {
            Shape::Circle(c) => {
                c.x = middle.x;
                c.y = middle.y;
            }
            Shape::Rect(r) => {
                r.set_middle(middle);
                r.rotation = rotation;
            }
        }
    }

    /// Reject NaN or infinite fields.
    pub fn validate(&self) -> Result<(), GeomError> {
        match self {
            Shape::Circle(c) => c.validate(),
            Shape::Rect(r) => r.validate(),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
