//! Contact normals for overlapping shape pairs.
//!
//! [`contact_normal`] returns the unit direction pointing from the first
//! shape toward the second. The driver stores `n` on the first body's monitor
//! and `-n` on the second's, so a body standing on the ground sees the ground
//! in its `bottom` view and the ground sees the body in its `top` view.

use nalgebra::Rotation2;

use crate::oriented::project_points;
use crate::primitives::overlap;
use crate::shape::{Circle, Rect, Shape};
use crate::vector::{Vec2, DOWN};

/// Unit contact normal from `a` toward `b`, or `None` when the shapes do not
/// overlap.
pub fn contact_normal(a: &Shape, b: &Shape) -> Option<Vec2> {
    if !overlap(a, b) {
        return None;
    }
    let n = match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle_normal(a, b),
        (Shape::Rect(r), Shape::Circle(c)) => rect_circle_normal(r, c),
        (Shape::Circle(c), Shape::Rect(r)) => -rect_circle_normal(r, c),
        (Shape::Rect(a), Shape::Rect(b)) => rect_rect_normal(a, b),
    };
    Some(n)
}

fn circle_circle_normal(a: &Circle, b: &Circle) -> Vec2 {
    // Coincident centres have no preferred direction.
    (b.center() - a.center()).try_normalize(0.0).unwrap_or(DOWN)
}

/// Normal from the rectangle toward the circle, computed in the rectangle's
/// local frame and rotated back into world space.
fn rect_circle_normal(rect: &Rect, circle: &Circle) -> Vec2 {
    let rot = Rotation2::new(rect.rotation);
    let half = rect.half_extents();
    let local = rot.inverse() * (circle.center() - rect.middle());
    let clamped = Vec2::new(local.x.clamp(-half.x, half.x), local.y.clamp(-half.y, half.y));

    let local_normal = match (local - clamped).try_normalize(0.0) {
        Some(n) => n,
        // Centre inside (or on) the rectangle: push out through the nearest face.
        None => {
            let gap_x = half.x - local.x.abs();
            let gap_y = half.y - local.y.abs();
            if gap_x < gap_y {
                Vec2::new(local.x.signum(), 0.0)
            } else {
                Vec2::new(0.0, local.y.signum())
            }
        }
    };
    rot * local_normal
}

/// Minimum-penetration axis over the edge normals of both rectangles,
/// oriented from `a` toward `b`. Ties keep the earliest axis.
fn rect_rect_normal(a: &Rect, b: &Rect) -> Vec2 {
    let a_corners = a.corners();
    let b_corners = b.corners();
    let [a0, a1] = a.axes();
    let [b0, b1] = b.axes();

    let mut best = a0;
    let mut best_depth = f64::INFINITY;
    for axis in [a0, a1, b0, b1] {
        let depth = project_points(&a_corners, axis).overlap_depth(&project_points(&b_corners, axis));
        if depth < best_depth {
            best_depth = depth;
            best = axis;
        }
    }

    if (b.middle() - a.middle()).dot(&best) < 0.0 {
        -best
    } else {
        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
