//! Small 2D helpers on `nalgebra::Vector2<f64>`.

use nalgebra::Vector2;

/// A projected map position (also used as a free vector).
pub type Point = Vector2<f64>;

/// Length tolerance: shorter edges are self-loops, smaller offsets have no direction.
pub const EPS: f64 = 1e-7;

/// Point on segment `a → b` at fraction `alpha` (0 → `a`, 1 → `b`).
#[inline]
pub fn between(a: Point, b: Point, alpha: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * alpha, a.y + (b.y - a.y) * alpha)
}

#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    between(a, b, 0.5)
}

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).norm()
}

/// Orthogonal projection of `p` onto the infinite line through `l0` and `l1`.
///
/// Pre: `l0 != l1`.
#[inline]
pub fn project_point_to_line(l0: Point, l1: Point, p: Point) -> Point {
    let d = l1 - l0;
    let r = (p - l0).dot(&d) / d.norm_squared();
    l0 + d * r
}

/// Cosine of the angle between two non-zero vectors.
#[inline]
pub fn cos_angle(p: Point, q: Point) -> f64 {
    p.dot(&q) / (p.norm() * q.norm())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_and_midpoint() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -2.0);
        assert_eq!(midpoint(a, b), Point::new(2.0, 0.0));
        assert_eq!(between(a, b, 0.0), a);
        assert_eq!(between(a, b, 1.0), b);
        let q = between(a, b, 0.25);
        assert!((q - Point::new(1.5, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn projection_onto_axis_and_diagonal() {
        let origin = Point::new(0.0, 0.0);
        let p = project_point_to_line(origin, Point::new(2.0, 0.0), Point::new(5.0, 3.0));
        assert!((p - Point::new(5.0, 0.0)).norm() < 1e-12);
        let d = project_point_to_line(origin, Point::new(1.0, 1.0), Point::new(2.0, 0.0));
        assert!((d - Point::new(1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn cosine_of_parallel_and_opposite() {
        let p = Point::new(3.0, 0.0);
        assert!((cos_angle(p, Point::new(0.5, 0.0)) - 1.0).abs() < 1e-12);
        assert!((cos_angle(p, Point::new(-2.0, 0.0)) + 1.0).abs() < 1e-12);
        assert!(cos_angle(p, Point::new(0.0, 4.0)).abs() < 1e-12);
    }
}
