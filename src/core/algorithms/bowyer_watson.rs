//! Bowyer-Watson Delaunay triangulation with a bounding halo.
//!
//! # Algorithm Overview
//!
//! 1. **Halo**: the bounding box of the input is expanded by a fixed margin and
//!    its four corners are appended as synthetic "super" points at indices
//!    `N..N + 4`. The box is split along a diagonal into two seed triangles.
//! 2. **Incremental insertion**: real points are inserted in index order. For
//!    each point, every triangle whose circumcircle strictly contains it is
//!    removed; the edges used by exactly one removed triangle form the hole
//!    boundary, and each boundary edge is joined to the new point.
//! 3. **Trimming**: triangles still referencing a super point are discarded.
//!
//! No spatial index is used. Every insertion scans all current triangles, which
//! is adequate for the tens to low hundreds of correspondence points a mapping
//! carries. Triangles are kept in a `Vec` and the hole boundary is walked in
//! encounter order, so the output is a pure function of the input order.
//!
//! # References
//!
//! - **Bowyer, A.** "Computing Dirichlet tessellations." *The Computer Journal* 24.2 (1981): 162-166.
//!   DOI: [10.1093/comjnl/24.2.162](https://doi.org/10.1093/comjnl/24.2.162)
//!
//! - **Watson, D.F.** "Computing the n-dimensional Delaunay tessellation with application to
//!   Voronoi polytopes." *The Computer Journal* 24.2 (1981): 167-172.
//!   DOI: [10.1093/comjnl/24.2.167](https://doi.org/10.1093/comjnl/24.2.167)

use crate::core::collections::{
    CAVITY_BUFFER_SIZE, FastHashMap, SmallBuffer, fast_hash_map_with_capacity,
};
use crate::core::edge::EdgeKey;
use crate::core::triangle::{Triangle, TriangleError};
use crate::core::triangulation::{Triangulation, TriangulationStatistics};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::bounding_box;
use thiserror::Error;

/// Default expansion of the bounding box used for the super points.
pub const DEFAULT_MARGIN: f64 = 1000.0;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors that can occur while building a triangulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangulationError {
    /// Fewer than three points were supplied.
    #[error("Insufficient points for triangulation: got {count}, need at least 3")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// A point has a NaN or infinite coordinate.
    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },
    /// The halo margin is not a finite positive number.
    #[error("Invalid halo margin {margin}: must be finite and positive")]
    InvalidMargin {
        /// The rejected margin.
        margin: f64,
    },
    /// A candidate triangle was collinear and the policy is [`DegeneracyPolicy::Fail`].
    #[error("Geometric degeneracy during triangulation: {0}")]
    GeometricDegeneracy(#[from] TriangleError),
}

// =============================================================================
// OPTIONS
// =============================================================================

/// What to do when a candidate triangle created while repairing the hole is
/// exactly collinear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DegeneracyPolicy {
    /// Abort the whole triangulation with
    /// [`TriangulationError::GeometricDegeneracy`].
    #[default]
    Fail,
    /// Drop the candidate, log a warning and keep going. The skipped count is
    /// reported in [`TriangulationStatistics::degenerate_skipped`].
    Skip,
}

impl std::fmt::Display for DegeneracyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Tunables of the triangulation.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::algorithms::bowyer_watson::{
///     DegeneracyPolicy, TriangulationOptions, TriangulationOptionsBuilder,
/// };
///
/// let options = TriangulationOptionsBuilder::default()
///     .margin(5_000.0)
///     .degeneracy_policy(DegeneracyPolicy::Skip)
///     .build()
///     .unwrap();
/// assert_eq!(options.margin, 5_000.0);
///
/// assert!(TriangulationOptionsBuilder::default().margin(-1.0).build().is_err());
/// assert_eq!(TriangulationOptions::default().margin, 1000.0);
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct TriangulationOptions {
    /// Distance by which the bounding box is expanded before its corners become
    /// super points.
    pub margin: f64,
    /// Handling of collinear candidate triangles.
    pub degeneracy_policy: DegeneracyPolicy,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            degeneracy_policy: DegeneracyPolicy::Fail,
        }
    }
}

impl TriangulationOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.margin {
            Some(margin) if !margin.is_finite() || margin <= 0.0 => Err(format!(
                "margin must be finite and positive, got {margin}"
            )),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// ALGORITHM
// =============================================================================

/// Bowyer-Watson triangulation builder.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::algorithms::bowyer_watson::BowyerWatson;
/// use schematic_mapping::geometry::point::Point;
///
/// let points = [
///     Point::new([0.0, 0.0]),
///     Point::new([4.0, 0.0]),
///     Point::new([0.0, 4.0]),
///     Point::new([4.0, 4.0]),
/// ];
/// let triangulation = BowyerWatson::default().triangulate(&points).unwrap();
/// assert_eq!(triangulation.len(), 2);
/// assert!(triangulation.uncovered_points().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BowyerWatson {
    options: TriangulationOptions,
}

impl BowyerWatson {
    /// Creates a builder with the given options.
    #[must_use]
    pub const fn new(options: TriangulationOptions) -> Self {
        Self { options }
    }

    /// The options this builder runs with.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    /// Triangulates `points`.
    ///
    /// Points are inserted in index order, so two calls on the same slice yield
    /// identical triangle triples in identical order.
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::InsufficientPoints`] for fewer than 3 points
    /// - [`TriangulationError::NonFiniteCoordinate`] for NaN or infinite input
    /// - [`TriangulationError::InvalidMargin`] if the configured margin is unusable
    /// - [`TriangulationError::GeometricDegeneracy`] if a candidate triangle is
    ///   collinear under [`DegeneracyPolicy::Fail`]
    pub fn triangulate<T>(&self, points: &[Point<T>]) -> Result<Triangulation, TriangulationError>
    where
        T: CoordinateScalar,
    {
        let count = points.len();
        if count < 3 {
            return Err(TriangulationError::InsufficientPoints { count });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(TriangulationError::NonFiniteCoordinate { index });
        }
        let margin = self.options.margin;
        if !margin.is_finite() || margin <= 0.0 {
            return Err(TriangulationError::InvalidMargin { margin });
        }

        let mut vertices = points.to_vec();
        vertices.extend(super_points(points, T::from_f64_lossy(margin)));

        let mut statistics = TriangulationStatistics::default();
        let mut triangles = Vec::with_capacity(2 * count + 2);
        triangles.push(Triangle::new(&vertices, count, count + 1, count + 2)?);
        triangles.push(Triangle::new(&vertices, count, count + 2, count + 3)?);
        statistics.triangles_created += 2;

        for (index, point) in points.iter().enumerate() {
            self.insert(&vertices, index, point, &mut triangles, &mut statistics)?;
        }

        let before_trim = triangles.len();
        triangles.retain(|t| !t.touches_super_point(count));
        statistics.triangles_removed += before_trim - triangles.len();

        tracing::debug!(
            "[bowyer-watson] triangulated {count} points with margin {margin}, policy {}: {} triangles ({} created, {} removed, {} degenerate skipped)",
            self.options.degeneracy_policy,
            triangles.len(),
            statistics.triangles_created,
            statistics.triangles_removed,
            statistics.degenerate_skipped,
        );

        Ok(Triangulation::new(
            triangles.iter().map(Triangle::vertices).collect(),
            count,
            statistics,
        ))
    }

    /// Inserts `vertices[index]` into `triangles`.
    fn insert<T>(
        &self,
        vertices: &[Point<T>],
        index: usize,
        point: &Point<T>,
        triangles: &mut Vec<Triangle<T>>,
        statistics: &mut TriangulationStatistics,
    ) -> Result<(), TriangulationError>
    where
        T: CoordinateScalar,
    {
        let mut bad: SmallBuffer<Triangle<T>, CAVITY_BUFFER_SIZE> = SmallBuffer::new();
        triangles.retain(|t| {
            if t.circumcircle_contains(point) {
                bad.push(*t);
                false
            } else {
                true
            }
        });

        let boundary = hole_boundary(&bad);
        tracing::trace!(
            "[bowyer-watson] point {index}: {} bad triangles, {} boundary edges",
            bad.len(),
            boundary.len(),
        );

        for edge in boundary.iter().filter(|e| !e.has_endpoint(index)) {
            match Triangle::new(vertices, index, edge.v0(), edge.v1()) {
                Ok(triangle) => {
                    triangles.push(triangle);
                    statistics.triangles_created += 1;
                }
                Err(err @ TriangleError::Degenerate { .. })
                    if self.options.degeneracy_policy == DegeneracyPolicy::Skip =>
                {
                    tracing::warn!("[bowyer-watson] skipping candidate triangle: {err}");
                    statistics.degenerate_skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        statistics.points_inserted += 1;
        statistics.triangles_removed += bad.len();
        Ok(())
    }
}

/// The four corners of the bounding box of `points` expanded by `margin`:
/// top-left, top-right, bottom-right, bottom-left.
fn super_points<T>(points: &[Point<T>], margin: T) -> [Point<T>; 4]
where
    T: CoordinateScalar,
{
    let (min, max) = bounding_box(points).unwrap_or_default();
    let (min_x, min_y) = (min.x() - margin, min.y() - margin);
    let (max_x, max_y) = (max.x() + margin, max.y() + margin);
    [
        Point::new([min_x, max_y]),
        Point::new([max_x, max_y]),
        Point::new([max_x, min_y]),
        Point::new([min_x, min_y]),
    ]
}

/// Edges used by exactly one of `bad`, in first-encounter order.
///
/// An edge seen two or more times is interior to the cavity.
fn hole_boundary<T>(bad: &[Triangle<T>]) -> SmallBuffer<EdgeKey, CAVITY_BUFFER_SIZE>
where
    T: CoordinateScalar,
{
    let mut multiplicity: FastHashMap<EdgeKey, usize> = fast_hash_map_with_capacity(bad.len() * 3);
    let mut encountered: SmallBuffer<EdgeKey, CAVITY_BUFFER_SIZE> = SmallBuffer::new();

    for edge in bad.iter().flat_map(Triangle::edges) {
        let seen = multiplicity.entry(edge).or_insert(0);
        if *seen == 0 {
            encountered.push(edge);
        }
        *seen += 1;
    }

    encountered.retain(|edge| multiplicity.get(edge) == Some(&1));
    encountered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::util::CircumcenterError;

    fn square() -> Vec<Point<f64>> {
        vec![
            Point::new([0.0, 0.0]),
            Point::new([4.0, 0.0]),
            Point::new([0.0, 4.0]),
            Point::new([4.0, 4.0]),
        ]
    }

    fn duplicated_vertex() -> [Point<f64>; 4] {
        [
            Point::new([0.5, 1.4]),
            Point::new([0.1, 1.4]),
            Point::new([0.1, 0.7]),
            Point::new([0.1, 1.4]),
        ]
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let triangulation = BowyerWatson::default().triangulate(&square()).unwrap();

        assert_eq!(triangulation.len(), 2);
        assert_eq!(triangulation.number_of_points(), 4);
        assert!(
            triangulation
                .triangles()
                .iter()
                .all(|t| t.iter().all(|&v| v < 4))
        );
        assert_eq!(triangulation.statistics().points_inserted, 4);
    }

    #[test]
    fn single_triangle_is_recovered() {
        let points = [
            Point::new([1.0, 1.0]),
            Point::new([6.0, 2.0]),
            Point::new([3.0, 5.0]),
        ];
        let triangulation = BowyerWatson::default().triangulate(&points).unwrap();
        let mut key = triangulation.triangles()[0];
        key.sort_unstable();
        assert_eq!(triangulation.len(), 1);
        assert_eq!(key, [0, 1, 2]);
    }

    #[test]
    fn too_few_points_are_rejected() {
        let err = BowyerWatson::default()
            .triangulate(&square()[..2])
            .unwrap_err();
        assert_eq!(err, TriangulationError::InsufficientPoints { count: 2 });
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let mut points = square();
        points[2] = Point::new([f64::NAN, 1.0]);
        let err = BowyerWatson::default().triangulate(&points).unwrap_err();
        assert_eq!(err, TriangulationError::NonFiniteCoordinate { index: 2 });
    }

    #[test]
    fn unusable_margin_is_rejected() {
        let options = TriangulationOptions {
            margin: 0.0,
            ..TriangulationOptions::default()
        };
        let err = BowyerWatson::new(options).triangulate(&square()).unwrap_err();
        assert_eq!(err, TriangulationError::InvalidMargin { margin: 0.0 });
    }

    #[test]
    fn degenerate_candidate_fails_by_default() {
        // Point 3 duplicates point 1; rounding puts it strictly inside a
        // circumcircle through point 1, so the repair proposes a flat triangle.
        let points = duplicated_vertex();
        let err = BowyerWatson::default().triangulate(&points).unwrap_err();
        assert!(matches!(
            err,
            TriangulationError::GeometricDegeneracy(TriangleError::Degenerate {
                source: CircumcenterError::CollinearPoints,
                ..
            })
        ));
    }

    #[test]
    fn degenerate_candidate_is_skipped_when_requested() {
        let points = duplicated_vertex();
        let options = TriangulationOptionsBuilder::default()
            .degeneracy_policy(DegeneracyPolicy::Skip)
            .build()
            .unwrap();
        let triangulation = BowyerWatson::new(options).triangulate(&points).unwrap();

        assert_eq!(triangulation.statistics().degenerate_skipped, 2);
        assert_eq!(triangulation.len(), 1);
    }

    #[test]
    fn hole_boundary_excludes_shared_edges() {
        let points = square();
        let a = Triangle::new(&points, 0, 1, 3).unwrap();
        let b = Triangle::new(&points, 0, 3, 2).unwrap();

        let boundary = hole_boundary(&[a, b]);
        assert_eq!(boundary.len(), 4);
        assert!(!boundary.contains(&EdgeKey::new(0, 3)));
    }

    #[test]
    fn hole_boundary_excludes_edges_seen_three_times() {
        let points = square();
        let a = Triangle::new(&points, 0, 1, 3).unwrap();

        // The same triangle three times: every edge has multiplicity 3.
        assert!(hole_boundary(&[a, a, a]).is_empty());
    }

    #[test]
    fn super_points_surround_the_input() {
        let corners = super_points(&square(), 10.0);
        assert_eq!(
            corners,
            [
                Point::new([-10.0, 14.0]),
                Point::new([14.0, 14.0]),
                Point::new([14.0, -10.0]),
                Point::new([-10.0, -10.0]),
            ]
        );
    }

    #[test]
    fn degeneracy_policy_display() {
        assert_eq!(DegeneracyPolicy::default().to_string(), "fail");
        assert_eq!(DegeneracyPolicy::Skip.to_string(), "skip");
    }

    #[test]
    fn builder_rejects_non_finite_margin() {
        assert!(
            TriangulationOptionsBuilder::default()
                .margin(f64::INFINITY)
                .build()
                .is_err()
        );
        let options = TriangulationOptionsBuilder::default().build().unwrap();
        assert_eq!(options, TriangulationOptions::default());
    }
}
