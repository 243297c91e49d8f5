//! Projection of a regular grid through a coordinate mapping.
//!
//! Used to draw the source space's grid on top of the target space: vertical
//! and horizontal lines are sampled at a fixed step, each sample is mapped, and
//! the samples that fall inside the mapping's hull form a polyline.

use crate::core::algorithms::bowyer_watson::TriangulationError;
use crate::core::point_mapping::PointMapping;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Upper bound on the samples along one line and on the lines per axis.
const MAX_SAMPLES_PER_AXIS: f64 = 1_000_000.0;

/// Sampling parameters for [`grid_lines`].
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::grid_lines::GridLineOptionsBuilder;
///
/// let options = GridLineOptionsBuilder::default().spacing(25.0).build().unwrap();
/// assert_eq!(options.spacing, 25.0);
/// assert_eq!(options.step, 1.0);
///
/// assert!(GridLineOptionsBuilder::default().step(0.0).build().is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct GridLineOptions {
    /// Distance between neighbouring grid lines.
    pub spacing: f64,
    /// Distance between samples along a line.
    pub step: f64,
}

impl Default for GridLineOptions {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            step: 1.0,
        }
    }
}

impl GridLineOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [("spacing", self.spacing), ("step", self.step)] {
            if let Some(value) = value
                && (!value.is_finite() || value <= 0.0)
            {
                return Err(format!("{name} must be finite and positive, got {value}"));
            }
        }
        Ok(())
    }
}

/// Samples the grid lines covering the mapping's sample points and maps them.
///
/// Vertical lines start at `round(min_x / spacing) * spacing` and advance by
/// `spacing` while below `max_x`; each is sampled from `round(min_y)` in
/// increments of `step` while below `max_y`. Horizontal lines follow with the
/// axes exchanged. Samples outside the mapping's hull are dropped and only
/// lines with at least two mapped samples are returned, vertical lines first.
///
/// Options that are not finite and positive produce no lines, as do options
/// that would need more than a million samples along a line or lines per axis.
///
/// # Errors
///
/// Returns the mapping's [`TriangulationError`] if its triangulation failed.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::algorithms::bowyer_watson::TriangulationOptions;
/// use schematic_mapping::core::grid_lines::{GridLineOptions, grid_lines};
/// use schematic_mapping::core::point_mapping::PointMapping;
/// use schematic_mapping::geometry::point::Point;
///
/// let corners = vec![
///     Point::new([0.0, 0.0]),
///     Point::new([20.0, 0.0]),
///     Point::new([0.0, 20.0]),
///     Point::new([20.0, 20.0]),
/// ];
/// let identity =
///     PointMapping::for_coordinates(corners.clone(), corners, TriangulationOptions::default())
///         .unwrap();
///
/// let lines = grid_lines(&identity, &GridLineOptions::default()).unwrap();
/// // x = 0 and x = 10, then y = 0 and y = 10.
/// assert_eq!(lines.len(), 4);
/// assert_eq!(lines[1].len(), 20);
/// ```
pub fn grid_lines<T, V>(
    mapping: &PointMapping<T, V>,
    options: &GridLineOptions,
) -> Result<Vec<Vec<V>>, TriangulationError>
where
    T: CoordinateScalar,
{
    mapping.triangulate()?;

    let spacing = T::from_f64_lossy(options.spacing);
    let step = T::from_f64_lossy(options.step);
    if !(spacing > T::zero() && step > T::zero() && spacing.is_finite() && step.is_finite()) {
        return Ok(Vec::new());
    }

    let (min, max) = mapping.bounds();
    let extent = (max.x() - min.x()).max(max.y() - min.y()) + T::one();
    let cap = T::from_f64_lossy(MAX_SAMPLES_PER_AXIS);
    if extent / step > cap || extent / spacing > cap {
        tracing::warn!(
            "[grid-lines] spacing {} and step {} are too fine for extent {extent}",
            options.spacing,
            options.step
        );
        return Ok(Vec::new());
    }

    let mut lines = Vec::new();

    for x in samples((min.x() / spacing).round() * spacing, max.x(), spacing) {
        let line = mapped_line(mapping, samples(min.y().round(), max.y(), step).map(|y| [x, y]))?;
        if line.len() > 1 {
            lines.push(line);
        }
    }
    for y in samples((min.y() / spacing).round() * spacing, max.y(), spacing) {
        let line = mapped_line(mapping, samples(min.x().round(), max.x(), step).map(|x| [x, y]))?;
        if line.len() > 1 {
            lines.push(line);
        }
    }

    tracing::debug!(
        "[grid-lines] projected {} lines over {} samples",
        lines.len(),
        mapping.len()
    );
    Ok(lines)
}

/// `start, start + step, ...` while below `end`.
///
/// Stops early once adding `step` no longer changes the value, which happens
/// when `step` is below the spacing of representable values near `start`.
fn samples<T>(start: T, end: T, step: T) -> impl Iterator<Item = T>
where
    T: CoordinateScalar,
{
    std::iter::successors(Some(start), move |&value| {
        let next = value + step;
        (next > value).then_some(next)
    })
    .take_while(move |&value| value < end)
}

fn mapped_line<T, V>(
    mapping: &PointMapping<T, V>,
    coords: impl Iterator<Item = [T; 2]>,
) -> Result<Vec<V>, TriangulationError>
where
    T: CoordinateScalar,
{
    let mut line = Vec::new();
    for coords in coords {
        if let Some(value) = mapping.get(&Point::new(coords))? {
            line.push(value);
        }
    }
    Ok(line)
}
