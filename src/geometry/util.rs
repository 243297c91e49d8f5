//! Geometric utility functions.
//!
//! This module contains the circumcircle construction used by every in-circle
//! test of the triangulation, the bounding box used to place the super points,
//! and seeded point generation for tests and benchmarks.

pub mod circumcircle;
pub mod point_generation;

pub use circumcircle::*;
pub use point_generation::*;

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use thiserror::Error;

/// Errors that can occur while computing a circumcircle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CircumcenterError {
    /// The three points are exactly collinear: the twice-signed-area
    /// denominator is zero and the circumcircle is undefined.
    #[error("Points are collinear: circumcircle is undefined")]
    CollinearPoints,
    /// The circumcircle could be computed but overflowed to a non-finite value.
    #[error("Circumcircle center or radius is not finite")]
    NonFiniteCircumcircle,
}

/// Errors that can occur during random point generation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or inverted.
    #[error("Invalid coordinate range: min {min} must be less than max {max}")]
    InvalidRange {
        /// Lower bound as a string.
        min: String,
        /// Upper bound as a string.
        max: String,
    },
    /// Grid spacing or jitter is not a finite, usable value.
    #[error("Invalid grid parameters: spacing {spacing}, jitter {jitter}")]
    InvalidGrid {
        /// Requested spacing as a string.
        spacing: String,
        /// Requested jitter as a string.
        jitter: String,
    },
}

/// Axis-aligned bounding box of a point set as `(min, max)` corners.
///
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::geometry::point::Point;
/// use schematic_mapping::geometry::util::bounding_box;
///
/// let points = [Point::new([1.0, 5.0]), Point::new([-2.0, 3.0]), Point::new([4.0, 0.0])];
/// let (min, max) = bounding_box(&points).unwrap();
/// assert_eq!(min, Point::new([-2.0, 0.0]));
/// assert_eq!(max, Point::new([4.0, 5.0]));
/// ```
#[must_use]
pub fn bounding_box<T>(points: &[Point<T>]) -> Option<(Point<T>, Point<T>)>
where
    T: CoordinateScalar,
{
    let first = points.first()?;
    let (mut min_x, mut min_y) = (first.x(), first.y());
    let (mut max_x, mut max_y) = (min_x, min_y);

    for p in &points[1..] {
        min_x = min_x.min(p.x());
        min_y = min_y.min(p.y());
        max_x = max_x.max(p.x());
        max_y = max_y.max(p.y());
    }

    Some((Point::new([min_x, min_y]), Point::new([max_x, max_y])))
}
