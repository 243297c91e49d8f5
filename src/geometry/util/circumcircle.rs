//! Circumcircle calculations for triangles.
//!
//! The center is computed directly from the determinant formulas of the three
//! vertex coordinates:
//!
//! ```text
//! dA = |p0|², dB = |p1|², dC = |p2|²
//! cx = (dA (y2 - y1) + dB (y0 - y2) + dC (y1 - y0)) / div
//! cy = -(dA (x2 - x1) + dB (x0 - x2) + dC (x1 - x0)) / div
//! div = 2 (x0 (y2 - y1) + x1 (y0 - y2) + x2 (y1 - y0))
//! ```
//!
//! `div` is twice the signed area of the triangle, so it is exactly zero for
//! collinear points. No tolerance is applied: only an exact zero is rejected.

use super::CircumcenterError;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// A circle stored as center and squared radius.
///
/// The squared radius is kept instead of the radius so that in-circle tests can
/// compare squared distances without a square root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle<T> {
    /// Center of the circle.
    pub center: Point<T>,
    /// Squared radius of the circle.
    pub radius_squared: T,
}

/// Calculate the circumcircle of the triangle `(p0, p1, p2)`.
///
/// # Errors
///
/// - [`CircumcenterError::CollinearPoints`] if the denominator is exactly zero
/// - [`CircumcenterError::NonFiniteCircumcircle`] if the result overflowed
///
/// # Example
///
/// ```
/// use schematic_mapping::geometry::point::Point;
/// use schematic_mapping::geometry::util::circumcircle;
///
/// let circle = circumcircle(
///     &Point::new([0.0, 0.0]),
///     &Point::new([4.0, 0.0]),
///     &Point::new([0.0, 4.0]),
/// )
/// .unwrap();
/// assert_eq!(circle.center, Point::new([2.0, 2.0]));
/// assert_eq!(circle.radius_squared, 8.0);
/// ```
pub fn circumcircle<T>(
    p0: &Point<T>,
    p1: &Point<T>,
    p2: &Point<T>,
) -> Result<Circumcircle<T>, CircumcenterError>
where
    T: CoordinateScalar,
{
    let (x0, y0) = (p0.x(), p0.y());
    let (x1, y1) = (p1.x(), p1.y());
    let (x2, y2) = (p2.x(), p2.y());

    let d_a = x0 * x0 + y0 * y0;
    let d_b = x1 * x1 + y1 * y1;
    let d_c = x2 * x2 + y2 * y2;

    let aux1 = d_a * (y2 - y1) + d_b * (y0 - y2) + d_c * (y1 - y0);
    let aux2 = -(d_a * (x2 - x1) + d_b * (x0 - x2) + d_c * (x1 - x0));
    let two = T::one() + T::one();
    let div = two * (x0 * (y2 - y1) + x1 * (y0 - y2) + x2 * (y1 - y0));

    if div == T::zero() {
        return Err(CircumcenterError::CollinearPoints);
    }

    let center = Point::new([aux1 / div, aux2 / div]);
    let radius_squared = center.squared_distance(p0);

    if !center.is_finite() || !radius_squared.is_finite() {
        return Err(CircumcenterError::NonFiniteCircumcircle);
    }

    Ok(Circumcircle {
        center,
        radius_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circumcircle_is_independent_of_winding() {
        let a = Point::new([1.0, 1.0]);
        let b = Point::new([5.0, 2.0]);
        let c = Point::new([2.0, 6.0]);

        let ccw = circumcircle(&a, &b, &c).unwrap();
        let cw = circumcircle(&a, &c, &b).unwrap();

        assert_relative_eq!(ccw.center.x(), cw.center.x(), epsilon = 1e-12);
        assert_relative_eq!(ccw.center.y(), cw.center.y(), epsilon = 1e-12);
        assert_relative_eq!(ccw.radius_squared, cw.radius_squared, epsilon = 1e-12);
    }

    #[test]
    fn circumcircle_passes_through_all_vertices() {
        let a = Point::new([-3.5, 0.25]);
        let b = Point::new([7.0, -1.0]);
        let c = Point::new([0.5, 9.75]);
        let circle = circumcircle(&a, &b, &c).unwrap();

        for p in [a, b, c] {
            assert_relative_eq!(
                circle.center.squared_distance(&p),
                circle.radius_squared,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn collinear_points_are_rejected() {
        let result = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([1.0, 1.0]),
            &Point::new([3.0, 3.0]),
        );
        assert_eq!(result, Err(CircumcenterError::CollinearPoints));
    }

    #[test]
    fn coincident_points_are_rejected() {
        let p = Point::new([2.0_f32, 2.0]);
        let q = Point::new([5.0_f32, -1.0]);
        assert_eq!(
            circumcircle(&p, &p, &q),
            Err(CircumcenterError::CollinearPoints)
        );
    }

    #[test]
    fn overflowing_circumcircle_is_rejected() {
        let result = circumcircle(
            &Point::new([0.0, 0.0]),
            &Point::new([f64::MAX / 2.0, 1.0]),
            &Point::new([1.0, f64::MAX / 2.0]),
        );
        assert_eq!(result, Err(CircumcenterError::NonFiniteCircumcircle));
    }
}
