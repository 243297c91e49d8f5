//! Triangles with a cached circumcircle.
//!
//! A [`Triangle`] stores three point indices in counter-clockwise order plus the
//! center and squared radius of its circumcircle. The circumcircle is computed
//! once at construction and reused by every in-circle test of the
//! triangulation. Triangles are never mutated: the triangulation discards a
//! triangle and creates new ones instead.
//!
//! Equality and hashing use the sorted index triple, so two triangles built
//! from the same three indices compare equal regardless of construction order.

use crate::core::edge::EdgeKey;
use crate::geometry::point::Point;
use crate::geometry::predicates::{InCircle, Orientation, orientation};
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::{CircumcenterError, circumcircle};
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur while constructing a [`Triangle`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TriangleError {
    /// A vertex index does not refer to a point of the point set.
    #[error("Vertex index {index} is out of bounds for {len} points")]
    VertexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of points available.
        len: usize,
    },
    /// The three points are collinear (or coincide) so no circumcircle exists.
    #[error("Degenerate triangle {vertices:?}: {source}")]
    Degenerate {
        /// The vertex indices as passed to the constructor.
        vertices: [usize; 3],
        /// The underlying circumcircle failure.
        source: CircumcenterError,
    },
}

/// A triangle over an indexed point set.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::triangle::Triangle;
/// use schematic_mapping::geometry::point::Point;
///
/// let points = [Point::new([0.0, 0.0]), Point::new([0.0, 4.0]), Point::new([4.0, 0.0])];
///
/// // Clockwise input is stored counter-clockwise.
/// let tri = Triangle::new(&points, 0, 1, 2).unwrap();
/// assert_eq!(tri.vertices(), [0, 2, 1]);
/// assert_eq!(tri.center(), Point::new([2.0, 2.0]));
/// assert!(tri.circumcircle_contains(&Point::new([1.0, 1.0])));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Triangle<T> {
    vertices: [usize; 3],
    center: Point<T>,
    radius_squared: T,
}

impl<T> Triangle<T>
where
    T: CoordinateScalar,
{
    /// Creates the triangle `(p0, p1, p2)` over `points`.
    ///
    /// If the input is not counter-clockwise, `p1` and `p2` are swapped so the
    /// stored triple always is; `p0` keeps the first position.
    ///
    /// # Errors
    ///
    /// - [`TriangleError::VertexOutOfBounds`] if an index is not in `points`
    /// - [`TriangleError::Degenerate`] if the points are exactly collinear or the
    ///   circumcircle overflows
    pub fn new(points: &[Point<T>], p0: usize, p1: usize, p2: usize) -> Result<Self, TriangleError> {
        let vertex = |index: usize| {
            points
                .get(index)
                .copied()
                .ok_or(TriangleError::VertexOutOfBounds {
                    index,
                    len: points.len(),
                })
        };
        let (a, b, c) = (vertex(p0)?, vertex(p1)?, vertex(p2)?);

        let (vertices, b, c) = if orientation(&a, &b, &c) == Orientation::POSITIVE {
            ([p0, p1, p2], b, c)
        } else {
            ([p0, p2, p1], c, b)
        };

        let circle = circumcircle(&a, &b, &c).map_err(|source| TriangleError::Degenerate {
            vertices: [p0, p1, p2],
            source,
        })?;

        Ok(Self {
            vertices,
            center: circle.center,
            radius_squared: circle.radius_squared,
        })
    }

    /// The vertex indices in counter-clockwise order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// Center of the circumcircle.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point<T> {
        self.center
    }

    /// Squared radius of the circumcircle.
    #[inline]
    #[must_use]
    pub const fn radius_squared(&self) -> T {
        self.radius_squared
    }

    /// Classifies `point` against the circumcircle.
    #[inline]
    #[must_use]
    pub fn in_circumcircle(&self, point: &Point<T>) -> InCircle {
        let distance = self.center.squared_distance(point);
        if distance < self.radius_squared {
            InCircle::INSIDE
        } else if distance > self.radius_squared {
            InCircle::OUTSIDE
        } else {
            InCircle::BOUNDARY
        }
    }

    /// Returns `true` iff `point` is strictly inside the circumcircle.
    ///
    /// Points exactly on the circle are excluded, so two triangles sharing a
    /// co-circular configuration are not both invalidated by the same point.
    #[inline]
    #[must_use]
    pub fn circumcircle_contains(&self, point: &Point<T>) -> bool {
        self.center.squared_distance(point) < self.radius_squared
    }

    /// The three edges `(P0, P1)`, `(P1, P2)`, `(P2, P0)`.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [EdgeKey; 3] {
        let [a, b, c] = self.vertices;
        [EdgeKey::new(a, b), EdgeKey::new(b, c), EdgeKey::new(c, a)]
    }

    /// The sorted index triple used for equality and hashing.
    #[inline]
    #[must_use]
    pub fn key(&self) -> [usize; 3] {
        let mut key = self.vertices;
        key.sort_unstable();
        key
    }

    /// Returns `true` if `index` is a vertex of this triangle.
    #[inline]
    #[must_use]
    pub fn has_vertex(&self, index: usize) -> bool {
        self.vertices.contains(&index)
    }

    /// Returns `true` if any vertex index is `>= point_count`, i.e. the triangle
    /// references one of the synthetic super points appended after the real ones.
    #[inline]
    #[must_use]
    pub fn touches_super_point(&self, point_count: usize) -> bool {
        self.vertices.iter().any(|&v| v >= point_count)
    }
}

impl<T> PartialEq for Triangle<T>
where
    T: CoordinateScalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Triangle<T> where T: CoordinateScalar {}

impl<T> Hash for Triangle<T>
where
    T: CoordinateScalar,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::FastHashSet;
    use crate::geometry::predicates::orientation;

    fn sample_points() -> Vec<Point<f64>> {
        vec![
            Point::new([0.0, 0.0]),
            Point::new([4.0, 0.0]),
            Point::new([0.0, 4.0]),
            Point::new([4.0, 4.0]),
            Point::new([8.0, 8.0]),
        ]
    }

    #[test]
    fn stored_vertices_are_counter_clockwise() {
        let points = sample_points();
        for (a, b, c) in [(0, 1, 2), (0, 2, 1), (2, 1, 0), (1, 3, 2)] {
            let tri = Triangle::new(&points, a, b, c).unwrap();
            let [p0, p1, p2] = tri.vertices();
            assert_eq!(p0, a, "first vertex keeps its position");
            assert_eq!(
                orientation(&points[p0], &points[p1], &points[p2]),
                Orientation::POSITIVE
            );
        }
    }

    #[test]
    fn circumcircle_is_an_open_disk() {
        let points = sample_points();
        let tri = Triangle::new(&points, 0, 1, 2).unwrap();

        // (4, 4) is co-circular with the three vertices.
        assert_eq!(tri.in_circumcircle(&points[3]), InCircle::BOUNDARY);
        assert!(!tri.circumcircle_contains(&points[3]));
        assert!(tri.circumcircle_contains(&Point::new([2.0, 2.0])));
        assert_eq!(tri.in_circumcircle(&points[4]), InCircle::OUTSIDE);
    }

    #[test]
    fn collinear_triangle_is_rejected() {
        let points = sample_points();
        let err = Triangle::new(&points, 0, 3, 4).unwrap_err();
        assert_eq!(
            err,
            TriangleError::Degenerate {
                vertices: [0, 3, 4],
                source: CircumcenterError::CollinearPoints,
            }
        );
    }

    #[test]
    fn out_of_bounds_vertex_is_rejected() {
        let points = sample_points();
        let err = Triangle::new(&points, 0, 1, 9).unwrap_err();
        assert_eq!(err, TriangleError::VertexOutOfBounds { index: 9, len: 5 });
    }

    #[test]
    fn equality_ignores_construction_order() {
        let points = sample_points();
        let a = Triangle::new(&points, 0, 1, 2).unwrap();
        let b = Triangle::new(&points, 2, 0, 1).unwrap();
        let c = Triangle::new(&points, 1, 3, 2).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: FastHashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn edges_cover_all_vertex_pairs() {
        let points = sample_points();
        let tri = Triangle::new(&points, 1, 3, 2).unwrap();
        let edges = tri.edges();

        for (a, b) in [(1, 3), (3, 2), (2, 1)] {
            assert!(edges.contains(&EdgeKey::new(a, b)));
        }
        assert!(tri.has_vertex(3));
        assert!(!tri.touches_super_point(5));
        assert!(tri.touches_super_point(3));
    }
}
