//! Distance and overlap primitives.
//!
//! Pure functions over points, circles and axis-aligned rectangles. The
//! rectangle helpers in this module read only `x`, `y`, `width` and `height`
//! and ignore any rotation; [`overlap`] is the rotation-aware entry point that
//! routes rotated rectangles to [`crate::oriented`].
//!
//! All comparisons are strict: touching shapes do not overlap, and boundary
//! points are not contained.

use crate::oriented;
use crate::shape::{Circle, Rect, Shape};
use crate::vector::Vec2;

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Signed distance from `point` to the circumference of `circle`
/// (negative inside).
#[inline]
pub fn distance_to_circle(point: Vec2, circle: &Circle) -> f64 {
    distance(point, circle.center()) - circle.radius()
}

/// Squared distance from `point` to the nearest point of the axis-aligned
/// rectangle (boundary or interior). Zero when the point is inside.
pub fn distance_to_rect_squared(point: Vec2, rect: &Rect) -> f64 {
    let middle = rect.middle();
    let half = rect.half_extents();
    let dx = ((point.x - middle.x).abs() - half.x).max(0.0);
    let dy = ((point.y - middle.y).abs() - half.y).max(0.0);
    dx * dx + dy * dy
}

/// Distance from `point` to the axis-aligned rectangle.
#[inline]
pub fn distance_to_rect(point: Vec2, rect: &Rect) -> f64 {
    distance_to_rect_squared(point, rect).sqrt()
}

/// Strict containment in the axis-aligned rectangle; boundary points are
/// outside.
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x > rect.x
        && point.x < rect.x + rect.width()
        && point.y > rect.y
        && point.y < rect.y + rect.height()
}

/// Circles overlap when their centres are strictly closer than the sum of
/// their radii.
#[inline]
pub fn overlap_circle_circle(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius() + b.radius();
    distance_squared(a.center(), b.center()) < reach * reach
}

/// Circle versus axis-aligned rectangle.
///
/// Either the clamped distance is below the radius, or the centre lies inside
/// the rectangle. Both disjuncts are kept: the second one is what classifies a
/// zero-radius circle sitting inside the rectangle.
#[inline]
pub fn overlap_circle_rect(circle: &Circle, rect: &Rect) -> bool {
    let r = circle.radius();
    distance_to_rect_squared(circle.center(), rect) < r * r || point_in_rect(circle.center(), rect)
}

/// Classic AABB test. Rectangles sharing only an edge do not overlap.
#[inline]
pub fn overlap_rect_rect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width()
        && b.x < a.x + a.width()
        && a.y < b.y + b.height()
        && b.y < a.y + a.height()
}

/// Rotation-aware overlap between any two shapes.
///
/// Dispatch is exhaustive over both operands, and mixed pairs are always
/// evaluated with the rectangle first, so the result does not depend on the
/// argument order.
pub fn overlap(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Circle(a), Shape::Circle(b)) => overlap_circle_circle(a, b),
        (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
            oriented::overlap_oriented_rect_circle(r, c)
        }
        (Shape::Rect(a), Shape::Rect(b)) => oriented::overlap_oriented_rect_rect(a, b),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn distances() {
        assert_eq!(distance_squared(v(0.0, 0.0), v(3.0, 4.0)), 25.0);
        assert_eq!(distance(v(0.0, 0.0), v(3.0, 4.0)), 5.0);
        assert_eq!(distance_to_circle(v(0.0, 0.0), &Circle::new(5.0, 0.0, 2.0)), 3.0);
        assert_eq!(distance_to_circle(v(5.0, 0.0), &Circle::new(5.0, 0.0, 2.0)), -2.0);
    }

    #[test]
    fn distance_to_rect_zero_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(distance_to_rect_squared(v(5.0, 5.0), &r), 0.0);
        assert_eq!(distance_to_rect_squared(v(10.0, 5.0), &r), 0.0);
    }

    #[test]
    fn distance_to_rect_corner_and_face() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(distance_to_rect_squared(v(13.0, 14.0), &r), 25.0);
        assert_eq!(distance_to_rect(v(13.0, 14.0), &r), 5.0);
        assert_eq!(distance_to_rect_squared(v(5.0, -2.0), &r), 4.0);
    }

    #[test]
    fn point_in_rect_excludes_boundary() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(v(5.0, 5.0), &r));
        assert!(!point_in_rect(v(0.0, 5.0), &r));
        assert!(!point_in_rect(v(10.0, 10.0), &r));
    }

    #[test]
    fn touching_circles_do_not_overlap() {
        let a = Circle::new(0.0, 0.0, 2.0);
        assert!(!overlap_circle_circle(&a, &Circle::new(5.0, 0.0, 3.0)));
        assert!(overlap_circle_circle(&a, &Circle::new(4.999, 0.0, 3.0)));
    }

    #[test]
    fn edge_sharing_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlap_rect_rect(&a, &b));
        assert!(!overlap_rect_rect(&b, &a));
        assert!(overlap_rect_rect(&a, &Rect::new(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn circle_inside_rect_overlaps() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlap_circle_rect(&Circle::new(5.0, 5.0, 1.0), &r));
    }

    #[test]
    fn zero_radius_circle_relies_on_containment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dot = Circle::new(5.0, 5.0, 0.0);
        // The clamped distance is 0, which is not < 0^2.
        assert_eq!(distance_to_rect_squared(dot.center(), &r), 0.0);
        assert!(overlap_circle_rect(&dot, &r));
        assert!(!overlap_circle_rect(&Circle::new(10.0, 5.0, 0.0), &r));
    }

    #[test]
    fn circle_touching_rect_face_does_not_overlap() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlap_circle_rect(&Circle::new(13.0, 5.0, 3.0), &r));
        assert!(overlap_circle_rect(&Circle::new(12.9, 5.0, 3.0), &r));
    }

    #[test]
    fn circle_near_corner_uses_euclidean_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Distance to corner (10,10) is sqrt(8) ~ 2.83.
        assert!(!overlap_circle_rect(&Circle::new(12.0, 12.0, 2.8), &r));
        assert!(overlap_circle_rect(&Circle::new(12.0, 12.0, 2.9), &r));
    }

    #[test]
    fn dispatch_covers_every_pair() {
        let c = Shape::from(Circle::new(0.0, 0.0, 1.0));
        let r = Shape::from(Rect::new(0.5, -1.0, 2.0, 2.0));
        let far = Shape::from(Rect::new(50.0, 50.0, 1.0, 1.0));
        assert!(overlap(&c, &c));
        assert!(overlap(&c, &r) && overlap(&r, &c));
        assert!(overlap(&r, &r));
        assert!(!overlap(&c, &far) && !overlap(&far, &c));
    }
}
