//! Separating-axis tests for rotated rectangles.
//!
//! Two convex shapes are disjoint iff some axis separates their projections.
//! For a rotated rectangle the candidate axes are its two edge normals; a
//! circle opponent adds the axis from the rectangle's middle to the circle
//! centre, and a rectangle opponent adds its own two edge normals.
//!
//! Every entry point starts with an exact `rotation == 0` fast path that
//! defers to [`crate::primitives`], so an unrotated rectangle gives the same
//! answer here as in the axis-aligned predicates.

use crate::primitives::{overlap_circle_rect, overlap_rect_rect, point_in_rect};
use crate::shape::{Circle, Interval, Rect};
use crate::vector::{project_onto, Vec2};

/// Project every point onto the unit `axis` and return the covered interval.
pub fn project_points(points: &[Vec2], axis: Vec2) -> Interval {
    let mut range = Interval::EMPTY;
    for &p in points {
        range.include(project_onto(p, axis));
    }
    range
}

/// Rotated rectangle versus circle.
pub fn overlap_oriented_rect_circle(rect: &Rect, circle: &Circle) -> bool {
    if rect.is_axis_aligned() {
        return overlap_circle_rect(circle, rect);
    }
    if !overlap_rect_rect(&rect.bounding_box(), &circle.bounding_box()) {
        return false;
    }

    let center = circle.center();
    let corners = rect.corners();
    let [edge_a, edge_b] = rect.axes();
    // Coincident centres give no usable third axis; the face axes decide.
    let center_axis = (center - rect.middle()).try_normalize(0.0);

    [Some(edge_a), Some(edge_b), center_axis]
        .into_iter()
        .flatten()
        .all(|axis| {
            let rect_range = project_points(&corners, axis);
            let p = project_onto(center, axis);
            let circle_range = Interval::new(p - circle.radius(), p + circle.radius());
            rect_range.overlaps(&circle_range)
        })
}

/// Rectangle versus rectangle where either side may be rotated.
///
/// Tests the edge normals of both rectangles, so the result is exact and
/// independent of argument order.
pub fn overlap_oriented_rect_rect(a: &Rect, b: &Rect) -> bool {
    if a.is_axis_aligned() && b.is_axis_aligned() {
        return overlap_rect_rect(a, b);
    }
    if !overlap_rect_rect(&a.bounding_box(), &b.bounding_box()) {
        return false;
    }

    let a_corners = a.corners();
    let b_corners = b.corners();
    let [a0, a1] = a.axes();
    let [b0, b1] = b.axes();

    [a0, a1, b0, b1].into_iter().all(|axis| {
        project_points(&a_corners, axis).overlaps(&project_points(&b_corners, axis))
    })
}

/// Strict point containment in a possibly rotated rectangle.
///
/// A square around the bounding circle (`hypot(w/2, h/2)`) rejects far points
/// before the exact per-axis check.
pub fn point_in_oriented_rect(rect: &Rect, point: Vec2) -> bool {
    if rect.is_axis_aligned() {
        return point_in_rect(point, rect);
    }

    let middle = rect.middle();
    let reach = rect.half_extents().norm();
    let coarse = Rect::new(middle.x - reach, middle.y - reach, reach * 2.0, reach * 2.0);
    if !point_in_rect(point, &coarse) {
        return false;
    }

    let corners = rect.corners();
    rect.axes()
        .into_iter()
        .all(|axis| project_points(&corners, axis).contains(project_onto(point, axis)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
