//! Geometric predicates for 2-D triangles.
//!
//! Orientation and barycentric location use plain floating-point arithmetic.
//! Only exact zeros are treated as degenerate; no adaptive precision is used.

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Represents the position of a point relative to a circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The point lies exactly on the circumcircle
    BOUNDARY,
    /// The point is strictly inside the circumcircle
    INSIDE,
}

/// Represents the orientation of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Clockwise (cross product < 0)
    NEGATIVE,
    /// Collinear (cross product exactly 0)
    DEGENERATE,
    /// Counter-clockwise (cross product > 0)
    POSITIVE,
}

/// Determine the orientation of the triangle `(p0, p1, p2)`.
///
/// Uses the sign of the cross product `(p1 - p0) × (p2 - p0)`.
///
/// # Example
///
/// ```
/// use schematic_mapping::geometry::point::Point;
/// use schematic_mapping::geometry::predicates::{Orientation, orientation};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([0.0, 1.0]);
/// assert_eq!(orientation(&a, &b, &c), Orientation::POSITIVE);
/// assert_eq!(orientation(&a, &c, &b), Orientation::NEGATIVE);
/// ```
#[inline]
#[must_use]
pub fn orientation<T>(p0: &Point<T>, p1: &Point<T>, p2: &Point<T>) -> Orientation
where
    T: CoordinateScalar,
{
    let cross = (p1.x() - p0.x()) * (p2.y() - p0.y()) - (p2.x() - p0.x()) * (p1.y() - p0.y());
    if cross > T::zero() {
        Orientation::POSITIVE
    } else if cross < T::zero() {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Barycentric weights of `q` in the triangle `(p0, p1, p2)`, if `q` lies inside
/// or on the boundary of the triangle.
///
/// The weights are computed with Cramer's rule:
///
/// ```text
/// det = (y1 - y2)(x0 - x2) + (x2 - x1)(y0 - y2)
/// t0  = ((y1 - y2)(qx - x2) + (x2 - x1)(qy - y2)) / det
/// t1  = ((y2 - y0)(qx - x2) + (x0 - x2)(qy - y2)) / det
/// t2  = 1 - t0 - t1
/// ```
///
/// Each weight is checked against `[0, 1]` as soon as it is known; the first
/// weight outside that range rejects the triangle. Returns `None` for a
/// triangle with a zero determinant.
///
/// # Example
///
/// ```
/// use schematic_mapping::geometry::point::Point;
/// use schematic_mapping::geometry::predicates::barycentric_weights;
///
/// let tri = [Point::new([0.0, 0.0]), Point::new([4.0, 0.0]), Point::new([0.0, 4.0])];
/// let w = barycentric_weights(&tri, &Point::new([1.0, 1.0])).unwrap();
/// assert_eq!(w, [0.5, 0.25, 0.25]);
/// assert!(barycentric_weights(&tri, &Point::new([3.0, 3.0])).is_none());
/// ```
#[must_use]
pub fn barycentric_weights<T>(triangle: &[Point<T>; 3], q: &Point<T>) -> Option<[T; 3]>
where
    T: CoordinateScalar,
{
    let [p0, p1, p2] = triangle;
    let det = (p1.y() - p2.y()) * (p0.x() - p2.x()) + (p2.x() - p1.x()) * (p0.y() - p2.y());
    if det == T::zero() {
        return None;
    }
    let inv_det = det.recip();
    let unit = |t: T| t >= T::zero() && t <= T::one();

    let dx = q.x() - p2.x();
    let dy = q.y() - p2.y();

    let t0 = ((p1.y() - p2.y()) * dx + (p2.x() - p1.x()) * dy) * inv_det;
    if !unit(t0) {
        return None;
    }
    let t1 = ((p2.y() - p0.y()) * dx + (p0.x() - p2.x()) * dy) * inv_det;
    if !unit(t1) {
        return None;
    }
    let t2 = T::one() - t0 - t1;
    if !unit(t2) {
        return None;
    }

    Some([t0, t1, t2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orientation_detects_collinear_points() {
        let a = Point::new([0.0, 0.0]);
        let b = Point::new([2.0, 2.0]);
        let c = Point::new([5.0, 5.0]);
        assert_eq!(orientation(&a, &b, &c), Orientation::DEGENERATE);
    }

    #[test]
    fn barycentric_weights_at_vertices() {
        let tri = [
            Point::new([1.0, 1.0]),
            Point::new([5.0, 2.0]),
            Point::new([2.0, 6.0]),
        ];

        for (i, vertex) in tri.iter().enumerate() {
            let w = barycentric_weights(&tri, vertex).unwrap();
            for (j, weight) in w.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*weight, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn barycentric_weights_on_edge_are_accepted() {
        let tri = [
            Point::new([0.0, 0.0]),
            Point::new([4.0, 0.0]),
            Point::new([0.0, 4.0]),
        ];
        let w = barycentric_weights(&tri, &Point::new([2.0, 2.0])).unwrap();
        assert_relative_eq!(w[0], 0.0);
        assert_relative_eq!(w[1], 0.5);
        assert_relative_eq!(w[2], 0.5);
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let tri = [
            Point::new([-3.0_f32, -1.0]),
            Point::new([4.0, 0.5]),
            Point::new([0.5, 6.0]),
        ];
        let w = barycentric_weights(&tri, &Point::new([0.5, 1.5])).unwrap();
        assert_relative_eq!(w[0] + w[1] + w[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_triangle_has_no_weights() {
        let tri = [
            Point::new([0.0, 0.0]),
            Point::new([1.0, 1.0]),
            Point::new([2.0, 2.0]),
        ];
        assert!(barycentric_weights(&tri, &Point::new([1.0, 1.0])).is_none());
    }
}
