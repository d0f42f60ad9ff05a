//! Hitbox Geom -- narrow-phase 2D collision geometry.
//!
//! This crate holds the pure half of the collision core: shape records
//! ([`Circle`](shape::Circle), [`Rect`](shape::Rect) with optional rotation),
//! distance and overlap predicates between them, a separating-axis test for
//! oriented rectangles, and contact-normal computation for overlapping pairs.
//!
//! Every predicate uses strict comparisons: shapes that merely touch do not
//! overlap. Coordinates are screen-space, with y growing downward.
//!
//! # Quick Start
//!
//! ```
//! use hitbox_geom::prelude::*;
//!
//! let wall = Shape::from(Rect::new(0.0, 0.0, 10.0, 10.0));
//! let ball = Shape::from(Circle::new(12.0, 5.0, 3.0));
//!
//! assert!(wall.collide_box(&ball));
//! assert!(ball.collide_box(&wall));
//! assert!(!wall.collide_point(10.0, 5.0)); // boundary is outside
//! ```

#![deny(unsafe_code)]

pub mod contact;
pub mod oriented;
pub mod primitives;
pub mod shape;
pub mod vector;

/// Re-export the math crate so downstream crates share one vector type.
pub use nalgebra;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when validating geometry.
///
/// Overlap and distance queries themselves never fail; only shapes built from
/// untrusted numbers are checked, before they enter a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeomError {
    /// A coordinate, extent, radius or rotation is NaN or infinite.
    #[error("shape field '{field}' is not finite (got {value})")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::contact::contact_normal;
    pub use crate::oriented::{
        overlap_oriented_rect_circle, overlap_oriented_rect_rect, point_in_oriented_rect,
    };
    pub use crate::primitives::{
        distance, distance_squared, distance_to_circle, distance_to_rect,
        distance_to_rect_squared, overlap, overlap_circle_circle, overlap_circle_rect,
        overlap_rect_rect, point_in_rect,
    };
    pub use crate::shape::{Circle, Interval, Rect, Shape};
    pub use crate::vector::{Vec2, DOWN, LEFT, RIGHT, UP};
    pub use crate::GeomError;
}
