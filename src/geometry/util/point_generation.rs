//! Random point generation functions.
//!
//! Reproducible point sets for tests and benchmarks. Every generator takes an
//! explicit seed so repeated runs produce identical inputs.

use rand::distr::uniform::SampleUniform;
use rand::{Rng, SeedableRng};

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

pub use super::RandomPointGenerationError;

/// Generate `n_points` uniformly distributed points in `[range.0, range.1)²`.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if `range.0 >= range.1`.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::geometry::util::generate_random_points_seeded;
///
/// let a = generate_random_points_seeded::<f64>(50, (-10.0, 10.0), 7).unwrap();
/// let b = generate_random_points_seeded::<f64>(50, (-10.0, 10.0), 7).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|p| (-10.0..10.0).contains(&p.x())));
/// ```
pub fn generate_random_points_seeded<T>(
    n_points: usize,
    range: (T, T),
    seed: u64,
) -> Result<Vec<Point<T>>, RandomPointGenerationError>
where
    T: CoordinateScalar + SampleUniform,
{
    if range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: format!("{:?}", range.0),
            max: format!("{:?}", range.1),
        });
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let points = (0..n_points)
        .map(|_| {
            Point::new([
                rng.random_range(range.0..range.1),
                rng.random_range(range.0..range.1),
            ])
        })
        .collect();

    Ok(points)
}

/// Generate a `columns × rows` grid with spacing `spacing`, each point displaced
/// by a random offset in `(-jitter, jitter)` on both axes.
///
/// Jittered grids resemble surveyed correspondence points: evenly spread,
/// without the exact collinearity of a regular grid. Points are emitted
/// row by row starting at the origin.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidGrid`] unless `spacing` is
/// finite and positive and `jitter` is finite, positive and below half the
/// spacing (so neighbouring cells never swap order).
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::geometry::util::generate_jittered_grid_points_seeded;
///
/// let points = generate_jittered_grid_points_seeded::<f64>(4, 3, 10.0, 2.0, 1).unwrap();
/// assert_eq!(points.len(), 12);
/// ```
pub fn generate_jittered_grid_points_seeded<T>(
    columns: usize,
    rows: usize,
    spacing: T,
    jitter: T,
    seed: u64,
) -> Result<Vec<Point<T>>, RandomPointGenerationError>
where
    T: CoordinateScalar + SampleUniform,
{
    let half_spacing = spacing / (T::one() + T::one());
    if !spacing.is_finite()
        || spacing <= T::zero()
        || !jitter.is_finite()
        || jitter <= T::zero()
        || jitter >= half_spacing
    {
        return Err(RandomPointGenerationError::InvalidGrid {
            spacing: format!("{spacing:?}"),
            jitter: format!("{jitter:?}"),
        });
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(columns * rows);

    for row in 0..rows {
        for column in 0..columns {
            let x = T::from_f64_lossy(column as f64) * spacing;
            let y = T::from_f64_lossy(row as f64) * spacing;
            points.push(Point::new([
                x + rng.random_range(-jitter..jitter),
                y + rng.random_range(-jitter..jitter),
            ]));
        }
    }

    Ok(points)
}
