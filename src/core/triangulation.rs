//! The result of a triangulation and the queries it supports.
//!
//! A [`Triangulation`] is an immutable list of counter-clockwise index triples
//! into the point slice it was built from. It does not own the points; every
//! geometric query takes the slice again and checks its length.

use crate::core::triangle::{Triangle, TriangleError};
use crate::geometry::point::Point;
use crate::geometry::predicates::barycentric_weights;
use crate::geometry::traits::coordinate::CoordinateScalar;
use thiserror::Error;

/// Counters collected while building a triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangulationStatistics {
    /// Number of real points inserted.
    pub points_inserted: usize,
    /// Number of triangles created, including the two seed triangles.
    pub triangles_created: usize,
    /// Number of triangles removed, either as bad triangles or by the final
    /// trimming of triangles that touch the super points.
    pub triangles_removed: usize,
    /// Number of collinear candidate triangles dropped under
    /// [`DegeneracyPolicy::Skip`](crate::core::algorithms::bowyer_watson::DegeneracyPolicy::Skip).
    pub degenerate_skipped: usize,
}

impl TriangulationStatistics {
    /// Returns true if any candidate triangle was dropped as degenerate.
    #[must_use]
    pub const fn skipped_any(&self) -> bool {
        self.degenerate_skipped > 0
    }
}

/// A located query point: the containing triangle and the barycentric weights
/// of the query with respect to its vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location<T> {
    /// Position of the triangle in [`Triangulation::triangles`].
    pub triangle: usize,
    /// The triangle's vertex indices, counter-clockwise.
    pub vertices: [usize; 3],
    /// Weights for `vertices[0]`, `vertices[1]`, `vertices[2]`; they sum to 1.
    pub weights: [T; 3],
}

/// Errors reported by [`Triangulation::validate_delaunay`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelaunayValidationError {
    /// The point slice is not the one the triangulation was built from.
    #[error("Triangulation was built over {expected} points but {actual} were supplied")]
    PointCountMismatch {
        /// Number of points the triangulation was built from.
        expected: usize,
        /// Number of points supplied for validation.
        actual: usize,
    },
    /// An input point lies strictly inside the circumcircle of a triangle.
    #[error("Point {point} lies inside the circumcircle of triangle {triangle:?}")]
    EmptyCircumcircleViolation {
        /// The violated triangle.
        triangle: [usize; 3],
        /// The offending point.
        point: usize,
    },
    /// A stored triangle could not be rebuilt from the supplied points.
    #[error(transparent)]
    Triangle(#[from] TriangleError),
}

/// An immutable triangle set over `number_of_points` points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
    number_of_points: usize,
    statistics: TriangulationStatistics,
}

impl Triangulation {
    pub(crate) const fn new(
        triangles: Vec<[usize; 3]>,
        number_of_points: usize,
        statistics: TriangulationStatistics,
    ) -> Self {
        Self {
            triangles,
            number_of_points,
            statistics,
        }
    }

    /// The triangles as counter-clockwise index triples, in build order.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if no triangle survived the trimming step.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of points the triangulation was built from.
    #[must_use]
    pub const fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    /// Build counters.
    #[must_use]
    pub const fn statistics(&self) -> &TriangulationStatistics {
        &self.statistics
    }

    /// Finds the first triangle, in build order, that contains `query`
    /// (boundary included).
    ///
    /// Returns `None` when the query is outside every triangle or when
    /// `points` is too short for a stored index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schematic_mapping::core::algorithms::bowyer_watson::BowyerWatson;
    /// use schematic_mapping::geometry::point::Point;
    ///
    /// let points = [Point::new([0.0, 0.0]), Point::new([4.0, 0.0]), Point::new([0.0, 4.0])];
    /// let triangulation = BowyerWatson::default().triangulate(&points).unwrap();
    ///
    /// let location = triangulation.locate(&points, &Point::new([1.0, 1.0])).unwrap();
    /// assert_eq!(location.triangle, 0);
    /// assert!(triangulation.locate(&points, &Point::new([5.0, 5.0])).is_none());
    /// ```
    #[must_use]
    pub fn locate<T>(&self, points: &[Point<T>], query: &Point<T>) -> Option<Location<T>>
    where
        T: CoordinateScalar,
    {
        self.triangles
            .iter()
            .enumerate()
            .find_map(|(triangle, &vertices)| {
                let [a, b, c] = vertices;
                let corners = [*points.get(a)?, *points.get(b)?, *points.get(c)?];
                barycentric_weights(&corners, query).map(|weights| Location {
                    triangle,
                    vertices,
                    weights,
                })
            })
    }

    /// Indices of input points that are not a vertex of any triangle.
    ///
    /// Empty for any input without three collinear points.
    #[must_use]
    pub fn uncovered_points(&self) -> Vec<usize> {
        let mut covered = vec![false; self.number_of_points];
        for &index in self.triangles.iter().flatten() {
            if let Some(slot) = covered.get_mut(index) {
                *slot = true;
            }
        }
        covered
            .iter()
            .enumerate()
            .filter_map(|(index, &is_covered)| (!is_covered).then_some(index))
            .collect()
    }

    /// Checks the empty-circumcircle property against every input point.
    ///
    /// A point counts as a violation only if its squared distance to the center
    /// is below `radius² * (1 - relative_tolerance)`, which absorbs the rounding
    /// of near co-circular configurations.
    ///
    /// # Errors
    ///
    /// - [`DelaunayValidationError::PointCountMismatch`] if `points` has the wrong length
    /// - [`DelaunayValidationError::Triangle`] if a stored triangle cannot be rebuilt
    /// - [`DelaunayValidationError::EmptyCircumcircleViolation`] for the first violation found
    pub fn validate_delaunay<T>(
        &self,
        points: &[Point<T>],
        relative_tolerance: T,
    ) -> Result<(), DelaunayValidationError>
    where
        T: CoordinateScalar,
    {
        if points.len() != self.number_of_points {
            return Err(DelaunayValidationError::PointCountMismatch {
                expected: self.number_of_points,
                actual: points.len(),
            });
        }

        let shrink = T::one() - relative_tolerance;
        for &[a, b, c] in &self.triangles {
            let triangle = Triangle::new(points, a, b, c)?;
            let limit = triangle.radius_squared() * shrink;

            let violation = points.iter().enumerate().find(|&(index, point)| {
                !triangle.has_vertex(index) && triangle.center().squared_distance(point) < limit
            });
            if let Some((point, _)) = violation {
                return Err(DelaunayValidationError::EmptyCircumcircleViolation {
                    triangle: [a, b, c],
                    point,
                });
            }
        }

        Ok(())
    }
}
