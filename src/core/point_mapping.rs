//! Barycentric lookup over a triangulated set of correspondence points.
//!
//! A [`PointMapping`] pairs every sample point with a value and answers
//! "what value corresponds to this query point?" by locating the triangle that
//! contains the query and blending the values of its three vertices with the
//! query's barycentric weights.
//!
//! The triangulation is built lazily, at most once per mapping, behind a
//! [`OnceLock`]. Concurrent first lookups block on the same build and then all
//! read the same immutable triangle list. A failed build is memoized too.

use crate::core::algorithms::bowyer_watson::{BowyerWatson, TriangulationError, TriangulationOptions};
use crate::core::triangulation::Triangulation;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::bounding_box;
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Blends three values with three weights summing to 1:
/// `(v0, t0, v1, t1, v2, t2) -> v`.
pub type Interpolator<T, V> = Arc<dyn Fn(&V, T, &V, T, &V, T) -> V + Send + Sync>;

/// Errors that can occur while constructing or triangulating a [`PointMapping`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointMappingError {
    /// Fewer than three sample points.
    #[error("Insufficient points for a mapping: got {count}, need at least 3")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// Points and values are not parallel.
    #[error("Mismatched sample lengths: {points} points but {values} values")]
    LengthMismatch {
        /// Number of points supplied.
        points: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// The builder was finished without an interpolation function.
    #[error("No interpolation function was supplied")]
    MissingInterpolator,
    /// A sample point has a NaN or infinite coordinate.
    #[error("Sample point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },
    /// The triangulation of the sample points failed.
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Maps query points to values by barycentric interpolation.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::point_mapping::PointMapping;
/// use schematic_mapping::geometry::point::Point;
///
/// let points = vec![
///     Point::new([0.0, 0.0]),
///     Point::new([4.0, 0.0]),
///     Point::new([0.0, 4.0]),
///     Point::new([4.0, 4.0]),
/// ];
/// let values = vec![
///     Point::new([0.0, 0.0]),
///     Point::new([1.0, 0.0]),
///     Point::new([0.0, 1.0]),
///     Point::new([1.0, 1.0]),
/// ];
/// let mapping = PointMapping::new(points, values, Point::weighted_sum).unwrap();
///
/// assert_eq!(mapping.get(&Point::new([2.0, 2.0])).unwrap(), Some(Point::new([0.5, 0.5])));
/// assert_eq!(mapping.get(&Point::new([10.0, 10.0])).unwrap(), None);
/// ```
pub struct PointMapping<T, V> {
    points: Vec<Point<T>>,
    values: Vec<V>,
    interpolate: Interpolator<T, V>,
    options: TriangulationOptions,
    triangulation: OnceLock<Result<Triangulation, TriangulationError>>,
}

impl<T, V> PointMapping<T, V>
where
    T: CoordinateScalar,
{
    /// Creates a mapping with default triangulation options.
    ///
    /// # Errors
    ///
    /// Returns [`PointMappingError`] if there are fewer than 3 points, the
    /// lengths differ, or a point is not finite.
    pub fn new<F>(points: Vec<Point<T>>, values: Vec<V>, interpolate: F) -> Result<Self, PointMappingError>
    where
        F: Fn(&V, T, &V, T, &V, T) -> V + Send + Sync + 'static,
    {
        Self::builder(points, values).interpolator(interpolate).build()
    }

    /// Starts a [`PointMappingBuilder`].
    #[must_use]
    pub fn builder(points: Vec<Point<T>>, values: Vec<V>) -> PointMappingBuilder<T, V> {
        PointMappingBuilder {
            points,
            values,
            interpolate: None,
            options: TriangulationOptions::default(),
        }
    }

    /// Builds the triangulation if it has not been attempted yet and returns it.
    ///
    /// Only the first call (across all threads) runs the triangulation. Later
    /// calls return the memoized outcome.
    ///
    /// # Errors
    ///
    /// Returns the (memoized) [`TriangulationError`] of a failed build.
    pub fn triangulate(&self) -> Result<&Triangulation, TriangulationError> {
        self.triangulation
            .get_or_init(|| BowyerWatson::new(self.options).triangulate(&self.points))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The triangulation, if it has already been built successfully.
    #[must_use]
    pub fn triangulation(&self) -> Option<&Triangulation> {
        self.triangulation.get().and_then(|built| built.as_ref().ok())
    }

    /// Returns true once a triangulation has been built successfully.
    #[must_use]
    pub fn is_triangulated(&self) -> bool {
        self.triangulation().is_some()
    }

    /// Looks up the value corresponding to `query`.
    ///
    /// Returns `Ok(None)` when `query` lies outside the convex hull of the
    /// sample points. On a shared edge the first triangle in build order wins.
    ///
    /// # Errors
    ///
    /// Returns the [`TriangulationError`] if the lazy triangulation failed.
    pub fn get(&self, query: &Point<T>) -> Result<Option<V>, TriangulationError> {
        let triangulation = self.triangulate()?;
        Ok(triangulation
            .locate(&self.points, query)
            .and_then(|location| {
                let [a, b, c] = location.vertices;
                let [t0, t1, t2] = location.weights;
                Some((self.interpolate)(
                    self.values.get(a)?,
                    t0,
                    self.values.get(b)?,
                    t1,
                    self.values.get(c)?,
                    t2,
                ))
            }))
    }

    /// The sample points.
    #[must_use]
    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    /// The values, parallel to [`points`](Self::points).
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of sample pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a mapping holds at least three samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lower-left and upper-right corners of the sample points' bounding box.
    #[must_use]
    pub fn bounds(&self) -> (Point<T>, Point<T>) {
        bounding_box(&self.points).unwrap_or_default()
    }

    /// The triangulation options this mapping builds with.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }
}

impl<T> PointMapping<T, Point<T>>
where
    T: CoordinateScalar,
{
    /// Creates a coordinate-to-coordinate mapping that blends with
    /// [`Point::weighted_sum`].
    ///
    /// # Errors
    ///
    /// See [`PointMapping::new`].
    pub fn for_coordinates(
        points: Vec<Point<T>>,
        values: Vec<Point<T>>,
        options: TriangulationOptions,
    ) -> Result<Self, PointMappingError> {
        Self::builder(points, values)
            .interpolator(Point::weighted_sum)
            .options(options)
            .build()
    }
}

impl<T, V> fmt::Debug for PointMapping<T, V>
where
    T: CoordinateScalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointMapping")
            .field("points", &self.points)
            .field("values", &self.values.len())
            .field("options", &self.options)
            .field("triangulation", &self.triangulation.get())
            .finish_non_exhaustive()
    }
}

/// Fluent constructor for [`PointMapping`].
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::algorithms::bowyer_watson::TriangulationOptionsBuilder;
/// use schematic_mapping::core::point_mapping::{PointMapping, PointMappingError};
/// use schematic_mapping::geometry::point::Point;
///
/// let points = vec![Point::new([0.0, 0.0]), Point::new([2.0, 0.0]), Point::new([0.0, 2.0])];
/// let heights = vec![10.0, 20.0, 30.0];
///
/// let missing = PointMapping::builder(points.clone(), heights.clone()).build();
/// assert_eq!(missing.unwrap_err(), PointMappingError::MissingInterpolator);
///
/// let mapping = PointMapping::builder(points, heights)
///     .interpolator(|a: &f64, ta, b: &f64, tb, c: &f64, tc| a * ta + b * tb + c * tc)
///     .options(TriangulationOptionsBuilder::default().margin(50.0).build().unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(mapping.get(&Point::new([0.0, 0.0])).unwrap(), Some(10.0));
/// ```
pub struct PointMappingBuilder<T, V> {
    points: Vec<Point<T>>,
    values: Vec<V>,
    interpolate: Option<Interpolator<T, V>>,
    options: TriangulationOptions,
}

impl<T, V> PointMappingBuilder<T, V>
where
    T: CoordinateScalar,
{
    /// Sets the interpolation function.
    #[must_use]
    pub fn interpolator<F>(mut self, interpolate: F) -> Self
    where
        F: Fn(&V, T, &V, T, &V, T) -> V + Send + Sync + 'static,
    {
        self.interpolate = Some(Arc::new(interpolate));
        self
    }

    /// Sets an interpolation function shared with other mappings.
    #[must_use]
    pub fn shared_interpolator(mut self, interpolate: Interpolator<T, V>) -> Self {
        self.interpolate = Some(interpolate);
        self
    }

    /// Sets the triangulation options.
    #[must_use]
    pub const fn options(mut self, options: TriangulationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the samples and creates the mapping. The triangulation is not
    /// built yet.
    ///
    /// # Errors
    ///
    /// - [`PointMappingError::InsufficientPoints`] for fewer than 3 points
    /// - [`PointMappingError::LengthMismatch`] if points and values differ in length
    /// - [`PointMappingError::MissingInterpolator`] if no interpolator was set
    /// - [`PointMappingError::NonFiniteCoordinate`] for a NaN or infinite point
    pub fn build(self) -> Result<PointMapping<T, V>, PointMappingError> {
        let Self {
            points,
            values,
            interpolate,
            options,
        } = self;

        if points.len() < 3 {
            return Err(PointMappingError::InsufficientPoints {
                count: points.len(),
            });
        }
        if points.len() != values.len() {
            return Err(PointMappingError::LengthMismatch {
                points: points.len(),
                values: values.len(),
            });
        }
        let interpolate = interpolate.ok_or(PointMappingError::MissingInterpolator)?;
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PointMappingError::NonFiniteCoordinate { index });
        }

        Ok(PointMapping {
            points,
            values,
            interpolate,
            options,
            triangulation: OnceLock::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_mapping() -> PointMapping<f64, Point<f64>> {
        PointMapping::for_coordinates(
            vec![
                Point::new([0.0, 0.0]),
                Point::new([4.0, 0.0]),
                Point::new([0.0, 4.0]),
                Point::new([4.0, 4.0]),
            ],
            vec![
                Point::new([0.0, 0.0]),
                Point::new([1.0, 0.0]),
                Point::new([0.0, 1.0]),
                Point::new([1.0, 1.0]),
            ],
            TriangulationOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn center_of_square_maps_to_center_of_unit_square() {
        let mapping = unit_square_mapping();
        let value = mapping.get(&Point::new([2.0, 2.0])).unwrap().unwrap();
        assert_relative_eq!(value.x(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(value.y(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn point_outside_hull_is_not_found() {
        let mapping = unit_square_mapping();
        assert_eq!(mapping.get(&Point::new([10.0, 10.0])).unwrap(), None);
    }

    #[test]
    fn triangulation_is_built_on_first_lookup() {
        let mapping = unit_square_mapping();
        assert!(!mapping.is_triangulated());
        assert!(mapping.triangulation().is_none());

        mapping.get(&Point::new([1.0, 1.0])).unwrap();
        assert!(mapping.is_triangulated());

        let first = mapping.triangulation().unwrap() as *const Triangulation;
        let second = mapping.triangulate().unwrap() as *const Triangulation;
        assert_eq!(first, second);
    }

    #[test]
    fn sample_points_map_to_their_own_values() {
        let mapping = unit_square_mapping();
        for (point, value) in mapping.points().iter().zip(mapping.values()) {
            let found = mapping.get(point).unwrap().unwrap();
            assert_relative_eq!(found.x(), value.x(), epsilon = 1e-12);
            assert_relative_eq!(found.y(), value.y(), epsilon = 1e-12);
        }
    }

    #[test]
    fn construction_errors() {
        let three = vec![
            Point::new([0.0, 0.0]),
            Point::new([1.0, 0.0]),
            Point::new([0.0, 1.0]),
        ];

        let err = PointMapping::new(three[..2].to_vec(), vec![0.0; 2], |a: &f64, _, _, _, _, _| *a)
            .unwrap_err();
        assert_eq!(err, PointMappingError::InsufficientPoints { count: 2 });

        let err = PointMapping::new(three.clone(), vec![0.0; 4], |a: &f64, _, _, _, _, _| *a)
            .unwrap_err();
        assert_eq!(err, PointMappingError::LengthMismatch { points: 3, values: 4 });

        let err = PointMapping::<f64, f64>::builder(three.clone(), vec![0.0; 3])
            .build()
            .unwrap_err();
        assert_eq!(err, PointMappingError::MissingInterpolator);

        let mut bad = three;
        bad[1] = Point::new([f64::INFINITY, 0.0]);
        let err = PointMapping::new(bad, vec![0.0; 3], |a: &f64, _, _, _, _, _| *a).unwrap_err();
        assert_eq!(err, PointMappingError::NonFiniteCoordinate { index: 1 });
    }

    #[test]
    fn failed_triangulation_is_memoized() {
        let mapping = PointMapping::for_coordinates(
            vec![
                Point::new([0.5, 1.4]),
                Point::new([0.1, 1.4]),
                Point::new([0.1, 0.7]),
                Point::new([0.1, 1.4]),
            ],
            vec![Point::default(); 4],
            TriangulationOptions::default(),
        )
        .unwrap();

        let first = mapping.get(&Point::new([0.2, 1.2])).unwrap_err();
        let second = mapping.triangulate().unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, TriangulationError::GeometricDegeneracy(_)));
        assert!(!mapping.is_triangulated());
    }

    #[test]
    fn concurrent_lookups_share_one_triangulation() {
        let mapping = unit_square_mapping();
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| mapping.get(&Point::new([3.0, 1.0])).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert!(results[0].is_some());
    }

    #[test]
    fn bounds_span_the_samples() {
        let mapping = unit_square_mapping();
        assert_eq!(
            mapping.bounds(),
            (Point::new([0.0, 0.0]), Point::new([4.0, 4.0]))
        );
        assert_eq!(mapping.len(), 4);
        assert!(!mapping.is_empty());
    }
}
