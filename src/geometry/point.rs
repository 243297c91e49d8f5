//! Two-dimensional points.
//!
//! A [`Point`] is the only coordinate type in the crate: query points, the sample
//! points of a mapping and (in the coordinate-to-coordinate case) the mapped
//! values are all `Point<T>`.

use crate::geometry::traits::coordinate::CoordinateScalar;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// An immutable 2-D coordinate.
///
/// Points are intended to be immutable once created, so the `coords` field is
/// private to prevent modification after instantiation. The arithmetic
/// operators treat points as vectors, which is what barycentric blending needs.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// assert_eq!(p.x(), 1.0);
/// assert_eq!(p.y(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point<T> {
    /// The coordinates of the point.
    coords: [T; 2],
}

impl<T> Point<T>
where
    T: CoordinateScalar,
{
    /// Create a new point from an array of coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [T; 2]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the point's coordinates.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[T; 2] {
        &self.coords
    }

    /// The first coordinate.
    #[inline]
    #[must_use]
    pub fn x(&self) -> T {
        self.coords[0]
    }

    /// The second coordinate.
    #[inline]
    #[must_use]
    pub fn y(&self) -> T {
        self.coords[1]
    }

    /// Returns `true` if neither coordinate is NaN or infinite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schematic_mapping::geometry::point::Point;
    ///
    /// let a = Point::new([0.0, 0.0]);
    /// let b = Point::new([3.0, 4.0]);
    /// assert_eq!(a.squared_distance(&b), 25.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn squared_distance(&self, other: &Self) -> T {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }

    /// Blends three points with three scalar weights.
    ///
    /// This is the interpolator used when the values of a mapping are
    /// coordinates: `v0 * t0 + v1 * t1 + v2 * t2`. Its signature matches
    /// [`Interpolator`](crate::core::point_mapping::Interpolator).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schematic_mapping::geometry::point::Point;
    ///
    /// let blended = Point::weighted_sum(
    ///     &Point::new([0.0, 0.0]), 0.5,
    ///     &Point::new([1.0, 0.0]), 0.0,
    ///     &Point::new([1.0, 1.0]), 0.5,
    /// );
    /// assert_eq!(blended, Point::new([0.5, 0.5]));
    /// ```
    #[inline]
    #[must_use]
    pub fn weighted_sum(v0: &Self, t0: T, v1: &Self, t1: T, v2: &Self, t2: T) -> Self {
        *v0 * t0 + *v1 * t1 + *v2 * t2
    }
}

impl<T> From<[T; 2]> for Point<T>
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(coords: [T; 2]) -> Self {
        Self::new(coords)
    }
}

impl<T> From<Point<T>> for [T; 2]
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(point: Point<T>) -> Self {
        point.coords
    }
}

impl<T> Add for Point<T>
where
    T: CoordinateScalar,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new([self.x() + rhs.x(), self.y() + rhs.y()])
    }
}

impl<T> Sub for Point<T>
where
    T: CoordinateScalar,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new([self.x() - rhs.x(), self.y() - rhs.y()])
    }
}

impl<T> Mul<T> for Point<T>
where
    T: CoordinateScalar,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new([self.x() * rhs, self.y() * rhs])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_arithmetic() {
        let a = Point::new([1.0, 2.0]);
        let b = Point::new([0.5, -1.0]);

        assert_eq!(a + b, Point::new([1.5, 1.0]));
        assert_eq!(a - b, Point::new([0.5, 3.0]));
        assert_eq!(a * 2.0, Point::new([2.0, 4.0]));
    }

    #[test]
    fn weighted_sum_reduces_to_vertex_value() {
        let v0 = Point::new([3.0_f32, 4.0]);
        let v1 = Point::new([10.0, 10.0]);
        let v2 = Point::new([-7.0, 1.0]);

        let blended = Point::weighted_sum(&v0, 1.0, &v1, 0.0, &v2, 0.0);
        assert_relative_eq!(blended.x(), 3.0);
        assert_relative_eq!(blended.y(), 4.0);
    }

    #[test]
    fn non_finite_points_are_detected() {
        assert!(Point::new([0.0, 1.0]).is_finite());
        assert!(!Point::new([f64::NAN, 1.0]).is_finite());
        assert!(!Point::new([0.0, f64::INFINITY]).is_finite());
    }

    #[test]
    fn point_serializes_as_coordinate_array() {
        let p = Point::new([1.5, -2.0]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,-2.0]");

        let back: Point<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
