//! Named correspondence data sets and the sources that supply them.
//!
//! A [`DataSource`] is the boundary between the mapping cache and wherever the
//! correspondence points live (a file, a web service, a test fixture). The cache
//! only ever asks for one named [`DataSet`] at a time.
//!
//! [`InMemoryDataSource`] holds data sets in memory and can be populated from
//! the JSON document format used by the schematic editor:
//!
//! ```json
//! [
//!   {
//!     "name": "Harbor",
//!     "points": [{ "map": [120, 80], "world": [52.5, 13.4] }],
//!     "rects": [{ "points": [0, 1, 2, 3], "linkTarget": "Harbor-Detail" }]
//!   }
//! ]
//! ```
//!
//! World coordinates are stored latitude first, so `"world": [a, b]` becomes
//! the point `(b, a)`.

use crate::core::collections::FastHashMap;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a [`DataSource`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataSourceError {
    /// The backing document could not be parsed.
    #[error("Failed to parse data sets: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// The backing store could not be reached.
    #[error("Data source unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// A world/map correspondence pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
pub struct PointPair<T> {
    /// Position in world space.
    pub world: Point<T>,
    /// Position in map space.
    pub map: Point<T>,
}

/// A clickable quadrilateral on the map that links to another data set.
///
/// The corners are indices into the data set's point pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectLink {
    /// Index of the top-left corner.
    pub top_left: usize,
    /// Index of the top-right corner.
    pub top_right: usize,
    /// Index of the bottom-right corner.
    pub bottom_right: usize,
    /// Index of the bottom-left corner.
    pub bottom_left: usize,
    /// Name of the linked data set.
    pub target: String,
}

impl RectLink {
    /// The corner indices in top-left, top-right, bottom-right, bottom-left order.
    #[must_use]
    pub const fn indices(&self) -> [usize; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Resolves the corners against `points` (typically the map-space points).
    ///
    /// Returns `None` if any index is out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schematic_mapping::cache::data_source::RectLink;
    /// use schematic_mapping::geometry::point::Point;
    ///
    /// let rect = RectLink {
    ///     top_left: 0,
    ///     top_right: 1,
    ///     bottom_right: 2,
    ///     bottom_left: 3,
    ///     target: "Yard".to_owned(),
    /// };
    /// let points = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]].map(Point::new);
    /// assert_eq!(rect.corners(&points), Some(points));
    /// assert_eq!(rect.corners(&points[..3]), None);
    /// ```
    #[must_use]
    pub fn corners<T>(&self, points: &[Point<T>]) -> Option<[Point<T>; 4]>
    where
        T: CoordinateScalar,
    {
        let [a, b, c, d] = self.indices();
        Some([
            *points.get(a)?,
            *points.get(b)?,
            *points.get(c)?,
            *points.get(d)?,
        ])
    }
}

/// One named data set: correspondence pairs plus rectangle links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
pub struct DataSet<T> {
    /// Correspondence pairs; their order defines the point indices.
    pub points: Vec<PointPair<T>>,
    /// Rectangle links referencing indices of `points`.
    pub rects: Vec<RectLink>,
}

impl<T> DataSet<T>
where
    T: CoordinateScalar,
{
    /// The world-space side of every pair, in order.
    #[must_use]
    pub fn world_points(&self) -> Vec<Point<T>> {
        self.points.iter().map(|pair| pair.world).collect()
    }

    /// The map-space side of every pair, in order.
    #[must_use]
    pub fn map_points(&self) -> Vec<Point<T>> {
        self.points.iter().map(|pair| pair.map).collect()
    }
}

/// Supplies named data sets to a [`MappingCache`](crate::cache::mapping_cache::MappingCache).
pub trait DataSource: Send + Sync {
    /// Coordinate scalar of the supplied points.
    type Scalar: CoordinateScalar;

    /// Fetches the data set called `name`, or `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError`] if the backing store cannot be read.
    fn fetch_data_set(&self, name: &str) -> Result<Option<DataSet<Self::Scalar>>, DataSourceError>;
}

impl<S> DataSource for Arc<S>
where
    S: DataSource + ?Sized,
{
    type Scalar = S::Scalar;

    fn fetch_data_set(&self, name: &str) -> Result<Option<DataSet<Self::Scalar>>, DataSourceError> {
        (**self).fetch_data_set(name)
    }
}

impl<S> DataSource for &S
where
    S: DataSource + ?Sized,
{
    type Scalar = S::Scalar;

    fn fetch_data_set(&self, name: &str) -> Result<Option<DataSet<Self::Scalar>>, DataSourceError> {
        (**self).fetch_data_set(name)
    }
}

// =============================================================================
// IN-MEMORY SOURCE
// =============================================================================

/// Data sets held in memory.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::cache::data_source::{DataSource, InMemoryDataSource};
///
/// let source = InMemoryDataSource::<f64>::from_json_str(
///     r#"[{ "name": "Yard", "points": [{ "map": [1, 2], "world": [30, 40] }] }]"#,
/// )
/// .unwrap();
///
/// let yard = source.fetch_data_set("Yard").unwrap().unwrap();
/// assert_eq!(yard.points[0].world.coords(), &[40.0, 30.0]);
/// assert!(source.fetch_data_set("Unknown").unwrap().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataSource<T> {
    data_sets: FastHashMap<String, DataSet<T>>,
}

impl<T> InMemoryDataSource<T>
where
    T: CoordinateScalar,
{
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_sets: FastHashMap::default(),
        }
    }

    /// Adds or replaces the data set called `name`.
    pub fn insert(&mut self, name: impl Into<String>, data_set: DataSet<T>) -> Option<DataSet<T>> {
        self.data_sets.insert(name.into(), data_set)
    }

    /// Removes the data set called `name`.
    pub fn remove(&mut self, name: &str) -> Option<DataSet<T>> {
        self.data_sets.remove(name)
    }

    /// Names of all data sets, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data_sets.keys().map(String::as_str)
    }

    /// Number of data sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data_sets.len()
    }

    /// Returns true if the source holds no data sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_sets.is_empty()
    }

    /// Parses the editor's JSON document.
    ///
    /// Missing `points` or `rects` default to empty, unknown fields are
    /// ignored and the first entry wins when a name repeats.
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError::Parse`] for malformed JSON or wrongly typed fields.
    pub fn from_json_str(json: &str) -> Result<Self, DataSourceError> {
        let documents: Vec<JsonDataSet<T>> =
            serde_json::from_str(json).map_err(|err| DataSourceError::Parse {
                message: err.to_string(),
            })?;

        let mut source = Self::new();
        for document in documents {
            if source.data_sets.contains_key(&document.name) {
                tracing::debug!("[data-source] ignoring repeated data set `{}`", document.name);
                continue;
            }
            let (name, data_set) = document.into_data_set();
            source.data_sets.insert(name, data_set);
        }
        Ok(source)
    }
}

impl<T> DataSource for InMemoryDataSource<T>
where
    T: CoordinateScalar,
{
    type Scalar = T;

    fn fetch_data_set(&self, name: &str) -> Result<Option<DataSet<T>>, DataSourceError> {
        Ok(self.data_sets.get(name).cloned())
    }
}

// Editor document layout.

#[derive(Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
struct JsonDataSet<T> {
    name: String,
    #[serde(default)]
    points: Vec<JsonPointPair<T>>,
    #[serde(default)]
    rects: Vec<JsonRect>,
}

#[derive(Deserialize)]
#[serde(bound = "T: CoordinateScalar")]
struct JsonPointPair<T> {
    map: [T; 2],
    world: [T; 2],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRect {
    points: [usize; 4],
    #[serde(default)]
    link_target: Option<String>,
}

impl<T> JsonDataSet<T>
where
    T: CoordinateScalar,
{
    fn into_data_set(self) -> (String, DataSet<T>) {
        let points = self
            .points
            .into_iter()
            .map(|pair| PointPair {
                world: Point::new([pair.world[1], pair.world[0]]),
                map: Point::new(pair.map),
            })
            .collect();
        let rects = self
            .rects
            .into_iter()
            .map(|rect| {
                let [top_left, top_right, bottom_right, bottom_left] = rect.points;
                RectLink {
                    top_left,
                    top_right,
                    bottom_right,
                    bottom_left,
                    target: rect.link_target.unwrap_or_default(),
                }
            })
            .collect();
        (self.name, DataSet { points, rects })
    }
}
