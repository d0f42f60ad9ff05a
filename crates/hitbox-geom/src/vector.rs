//! Vector type and screen-space direction constants.
//!
//! The engine works in screen space: x grows to the right and y grows
//! downward, so [`UP`] is `(0, -1)`.

use nalgebra::Vector2;

/// The 2D vector used throughout the collision core.
pub type Vec2 = Vector2<f64>;

/// Unit vector pointing left, `(-1, 0)`.
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
/// Unit vector pointing right, `(1, 0)`.
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
/// Unit vector pointing up the screen, `(0, -1)`.
pub const UP: Vec2 = Vec2::new(0.0, -1.0);
/// Unit vector pointing down the screen, `(0, 1)`.
pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);

/// Scalar projection of `point` onto the unit `axis`.
#[inline]
pub fn project_onto(point: Vec2, axis: Vec2) -> f64 {
    point.dot(&axis)
}
