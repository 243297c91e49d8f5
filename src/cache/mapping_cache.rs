//! Lazily built, invalidatable cache of named mappings.
//!
//! For every data-set name the cache holds one [`MappingEntry`]: a
//! world-to-map mapping, the inverse map-to-world mapping, and the data set's
//! rectangle links. Entries are built on first request and memoized, failures
//! included, until [`MappingCache::invalidate`] drops everything.
//!
//! # Concurrency
//!
//! The name-to-slot table is an immutable snapshot behind an [`ArcSwap`]:
//!
//! - lookups `load()` the snapshot without locking
//! - a missing name is added with `rcu()`, which copies the snapshot, inserts an
//!   empty slot and retries if another writer got there first
//! - invalidation `store()`s a fresh empty snapshot
//!
//! Each slot is an `Arc<OnceLock<_>>`. Every caller that finds the same slot
//! blocks on the same `get_or_init`, so the data source is queried and the
//! triangulations are built once per name per generation. A lookup racing an
//! invalidation may finish on the old slot and return a stale entry, but never
//! a partially built one.

use crate::cache::data_source::{DataSource, DataSourceError, RectLink};
use crate::core::algorithms::bowyer_watson::TriangulationOptions;
use crate::core::collections::FastHashMap;
use crate::core::point_mapping::{PointMapping, PointMappingError};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Reasons a data set has no mapping. Memoized per name until invalidation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MappingCacheError {
    /// The data source has no data set with this name.
    #[error("mapping unavailable for data set `{name}`: no such data set")]
    DataSetNotFound {
        /// The requested name.
        name: String,
    },
    /// The data set has fewer than three correspondence points.
    #[error(
        "mapping unavailable for data set `{name}`: {count} correspondence points, need at least 3"
    )]
    InsufficientPoints {
        /// The requested name.
        name: String,
        /// Number of correspondence points in the data set.
        count: usize,
    },
    /// The data source failed.
    #[error("mapping unavailable for data set `{name}`: {source}")]
    DataSource {
        /// The requested name.
        name: String,
        /// The data source failure.
        source: DataSourceError,
    },
    /// Building or triangulating one of the two mappings failed.
    #[error("mapping unavailable for data set `{name}`: {source}")]
    Mapping {
        /// The requested name.
        name: String,
        /// The mapping failure.
        source: PointMappingError,
    },
}

impl MappingCacheError {
    /// The data-set name the error is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::DataSetNotFound { name }
            | Self::InsufficientPoints { name, .. }
            | Self::DataSource { name, .. }
            | Self::Mapping { name, .. } => name,
        }
    }
}

/// Which way a mapping translates coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MappingDirection {
    /// From world coordinates to map coordinates.
    #[default]
    WorldToMap,
    /// From map coordinates to world coordinates.
    MapToWorld,
}

impl From<bool> for MappingDirection {
    /// `true` selects [`WorldToMap`](Self::WorldToMap).
    fn from(world_to_map: bool) -> Self {
        if world_to_map {
            Self::WorldToMap
        } else {
            Self::MapToWorld
        }
    }
}

/// The memoized mappings of one data set.
#[derive(Debug)]
pub struct MappingEntry<T>
where
    T: CoordinateScalar,
{
    name: String,
    forward: Arc<PointMapping<T, Point<T>>>,
    inverse: Arc<PointMapping<T, Point<T>>>,
    rects: Arc<[RectLink]>,
}

impl<T> MappingEntry<T>
where
    T: CoordinateScalar,
{
    /// The data-set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The world-to-map mapping.
    #[must_use]
    pub const fn forward(&self) -> &Arc<PointMapping<T, Point<T>>> {
        &self.forward
    }

    /// The map-to-world mapping.
    #[must_use]
    pub const fn inverse(&self) -> &Arc<PointMapping<T, Point<T>>> {
        &self.inverse
    }

    /// The mapping for `direction`.
    #[must_use]
    pub const fn mapping(&self, direction: MappingDirection) -> &Arc<PointMapping<T, Point<T>>> {
        match direction {
            MappingDirection::WorldToMap => &self.forward,
            MappingDirection::MapToWorld => &self.inverse,
        }
    }

    /// The rectangle links; their indices refer to the mapping points.
    #[must_use]
    pub const fn rects(&self) -> &Arc<[RectLink]> {
        &self.rects
    }
}

type EntrySlot<T> = Arc<OnceLock<Result<Arc<MappingEntry<T>>, MappingCacheError>>>;
type SlotTable<T> = FastHashMap<String, EntrySlot<T>>;

/// A cache of [`MappingEntry`] values keyed by data-set name.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::cache::data_source::InMemoryDataSource;
/// use schematic_mapping::cache::mapping_cache::{MappingCache, MappingDirection};
/// use schematic_mapping::geometry::point::Point;
///
/// let source = InMemoryDataSource::<f64>::from_json_str(
///     r#"[{ "name": "Yard", "points": [
///         { "map": [0, 0], "world": [0, 0] },
///         { "map": [10, 0], "world": [0, 100] },
///         { "map": [0, 10], "world": [100, 0] }
///     ] }]"#,
/// )
/// .unwrap();
/// let cache = MappingCache::new(source);
///
/// let to_map = cache.mapping("Yard", MappingDirection::WorldToMap).unwrap();
/// assert_eq!(to_map.get(&Point::new([50.0, 0.0])).unwrap(), Some(Point::new([5.0, 0.0])));
///
/// assert!(cache.mapping("Unknown", MappingDirection::WorldToMap).is_none());
/// ```
pub struct MappingCache<S>
where
    S: DataSource,
{
    source: S,
    options: TriangulationOptions,
    slots: ArcSwap<SlotTable<S::Scalar>>,
    generation: AtomicU64,
}

impl<S> MappingCache<S>
where
    S: DataSource,
{
    /// Creates an empty cache over `source` with default triangulation options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, TriangulationOptions::default())
    }

    /// Creates an empty cache whose mappings triangulate with `options`.
    pub fn with_options(source: S, options: TriangulationOptions) -> Self {
        Self {
            source,
            options,
            slots: ArcSwap::from_pointee(SlotTable::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// The data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The triangulation options applied to every mapping.
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    /// Returns the entry for `name`, building it on first request.
    ///
    /// # Errors
    ///
    /// Returns the memoized [`MappingCacheError`] if the data set is missing,
    /// too small, unreadable or cannot be triangulated.
    pub fn entry(&self, name: &str) -> Result<Arc<MappingEntry<S::Scalar>>, MappingCacheError> {
        self.slot(name)
            .get_or_init(|| self.build_entry(name))
            .clone()
    }

    /// The mapping of `name` in `direction`, or `None` if the data set has no
    /// mapping.
    pub fn mapping(
        &self,
        name: &str,
        direction: MappingDirection,
    ) -> Option<Arc<PointMapping<S::Scalar, Point<S::Scalar>>>> {
        self.entry(name)
            .ok()
            .map(|entry| Arc::clone(entry.mapping(direction)))
    }

    /// The rectangle links of `name`, or `None` if the data set has no mapping.
    pub fn rects(&self, name: &str) -> Option<Arc<[RectLink]>> {
        self.entry(name).ok().map(|entry| Arc::clone(entry.rects()))
    }

    /// Drops every memoized entry. The next lookup of any name rebuilds it.
    pub fn invalidate(&self) {
        let dropped = self.slots.swap(Arc::new(SlotTable::default())).len();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!("[mapping-cache] invalidated {dropped} entries, now at generation {generation}");
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of names with a memoized (or in-progress) entry.
    pub fn len(&self) -> usize {
        self.slots.load().len()
    }

    /// Returns true if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.slots.load().is_empty()
    }

    /// Returns the slot for `name`, inserting an empty one if needed.
    fn slot(&self, name: &str) -> EntrySlot<S::Scalar> {
        if let Some(slot) = self.slots.load().get(name) {
            return Arc::clone(slot);
        }

        let mut slot = EntrySlot::default();
        self.slots.rcu(|current| {
            if let Some(existing) = current.get(name) {
                slot = Arc::clone(existing);
                return Arc::clone(current);
            }
            slot = EntrySlot::default();
            let mut next = SlotTable::clone(current);
            next.insert(name.to_owned(), Arc::clone(&slot));
            Arc::new(next)
        });
        slot
    }

    fn build_entry(&self, name: &str) -> Result<Arc<MappingEntry<S::Scalar>>, MappingCacheError> {
        let built = self.try_build_entry(name);
        match &built {
            Ok(entry) => tracing::debug!(
                "[mapping-cache] built `{name}`: {} points, {} triangles, {} rects",
                entry.forward.len(),
                entry.forward.triangulation().map_or(0, |t| t.len()),
                entry.rects.len(),
            ),
            Err(err) => tracing::warn!("[mapping-cache] {err}"),
        }
        built.map(Arc::new)
    }

    fn try_build_entry(&self, name: &str) -> Result<MappingEntry<S::Scalar>, MappingCacheError> {
        let data_set = self
            .source
            .fetch_data_set(name)
            .map_err(|source| MappingCacheError::DataSource {
                name: name.to_owned(),
                source,
            })?
            .ok_or_else(|| MappingCacheError::DataSetNotFound {
                name: name.to_owned(),
            })?;

        let count = data_set.points.len();
        if count < 3 {
            return Err(MappingCacheError::InsufficientPoints {
                name: name.to_owned(),
                count,
            });
        }

        let mapping_error = |source: PointMappingError| MappingCacheError::Mapping {
            name: name.to_owned(),
            source,
        };
        let world = data_set.world_points();
        let map = data_set.map_points();

        let forward = PointMapping::for_coordinates(world.clone(), map.clone(), self.options)
            .map_err(mapping_error)?;
        forward
            .triangulate()
            .map_err(|err| mapping_error(err.into()))?;

        let inverse =
            PointMapping::for_coordinates(map, world, self.options).map_err(mapping_error)?;
        inverse
            .triangulate()
            .map_err(|err| mapping_error(err.into()))?;

        Ok(MappingEntry {
            name: name.to_owned(),
            forward: Arc::new(forward),
            inverse: Arc::new(inverse),
            rects: data_set.rects.into(),
        })
    }
}
