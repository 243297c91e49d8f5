//! # schematic-mapping
//!
//! This is a library for mapping points between two related 2-D coordinate
//! spaces, typically a physical *world* space and a schematic *map* space,
//! using nothing but a scattered set of known correspondence pairs.
//!
//! # Features
//!
//! - Bowyer-Watson Delaunay triangulation with a bounding super-point halo
//! - Barycentric lookup and blending of arbitrary per-point values
//! - A lazily built, invalidatable cache of named world/map mapping pairs
//! - Projection of a regular grid through a mapping
//! - Generic floating-point coordinates (`f32`, `f64`, see [`CoordinateScalar`](geometry::traits::coordinate::CoordinateScalar))
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use schematic_mapping::prelude::*;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0]),
//!     Point::new([4.0, 0.0]),
//!     Point::new([0.0, 4.0]),
//!     Point::new([4.0, 4.0]),
//! ];
//! let values = vec![
//!     Point::new([0.0, 0.0]),
//!     Point::new([1.0, 0.0]),
//!     Point::new([0.0, 1.0]),
//!     Point::new([1.0, 1.0]),
//! ];
//!
//! let mapping = PointMapping::new(points, values, Point::weighted_sum).unwrap();
//!
//! // Inside the hull of the samples: interpolated.
//! assert_eq!(mapping.get(&Point::new([2.0, 2.0])).unwrap(), Some(Point::new([0.5, 0.5])));
//! // Outside: not found.
//! assert_eq!(mapping.get(&Point::new([10.0, 10.0])).unwrap(), None);
//! ```
//!
//! The triangulation is built on the first lookup and reused afterwards. It
//! can also be built up front with
//! [`PointMapping::triangulate`](core::point_mapping::PointMapping::triangulate).
//!
//! # Named Mappings
//!
//! A [`MappingCache`](cache::mapping_cache::MappingCache) builds a forward and an
//! inverse mapping per named data set from a [`DataSource`](cache::data_source::DataSource)
//! and memoizes both, together with the data set's rectangle links:
//!
//! ```rust
//! use schematic_mapping::prelude::*;
//!
//! let source = InMemoryDataSource::<f64>::from_json_str(
//!     r#"[{
//!         "name": "Yard",
//!         "points": [
//!             { "map": [0, 0], "world": [0, 0] },
//!             { "map": [10, 0], "world": [0, 100] },
//!             { "map": [0, 10], "world": [100, 0] },
//!             { "map": [10, 10], "world": [100, 100] }
//!         ],
//!         "rects": [{ "points": [0, 1, 3, 2], "linkTarget": "Yard-Detail" }]
//!     }]"#,
//! )
//! .unwrap();
//! let cache = MappingCache::new(source);
//!
//! let to_map = cache.mapping("Yard", MappingDirection::WorldToMap).unwrap();
//! let to_world = cache.mapping("Yard", MappingDirection::MapToWorld).unwrap();
//! assert_eq!(to_map.get(&Point::new([50.0, 50.0])).unwrap(), Some(Point::new([5.0, 5.0])));
//! assert_eq!(to_world.get(&Point::new([5.0, 5.0])).unwrap(), Some(Point::new([50.0, 50.0])));
//! assert_eq!(cache.rects("Yard").unwrap()[0].target, "Yard-Detail");
//!
//! // Unknown names are memoized as "no mapping" until the cache is invalidated.
//! assert!(cache.mapping("Unknown", MappingDirection::WorldToMap).is_none());
//! cache.invalidate();
//! ```
//!
//! # Numerical Behavior
//!
//! All predicates use plain floating-point arithmetic. Only exact zeros are
//! treated as degenerate:
//!
//! 1. **Collinear candidates** - if the hole repair proposes a triangle whose
//!    circumcircle denominator is exactly zero, the triangulation fails with
//!    [`TriangulationError::GeometricDegeneracy`](core::algorithms::bowyer_watson::TriangulationError::GeometricDegeneracy)
//!    unless [`DegeneracyPolicy::Skip`](core::algorithms::bowyer_watson::DegeneracyPolicy::Skip)
//!    is configured. Duplicate sample points are the usual cause.
//!
//! 2. **Finite halo** - the super points sit a fixed margin outside the bounding
//!    box. Hull points that are nearly collinear with their neighbours can end up
//!    connected only to the halo and are then dropped with it; a larger margin
//!    avoids this for point sets spread over large extents.
//!
//! 3. **Shared edges** - a query exactly on an edge shared by two triangles is
//!    answered by the first of them in build order. Rounding can also place a
//!    query on the hull boundary just outside every triangle.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (debug summaries of
//! every triangulation and cache build, warnings for skipped degeneracies and
//! unavailable data sets) and never installs a subscriber.

// Allow multiple crate versions due to transitive dependencies
#![allow(clippy::multiple_crate_versions)]
// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the triangulation and the lookup built on top of it.
///
/// It includes the `Triangle` and `EdgeKey` primitives, the Bowyer-Watson
/// builder, the immutable `Triangulation` result and `PointMapping`.
pub mod core {
    /// Triangulation algorithms
    pub mod algorithms {
        /// Bowyer-Watson insertion with a bounding halo
        pub mod bowyer_watson;
        pub use bowyer_watson::*;
    }
    /// High-performance collection types
    pub mod collections;
    pub mod edge;
    /// Grid-line projection through a coordinate mapping
    pub mod grid_lines;
    pub mod point_mapping;
    pub mod triangle;
    pub mod triangulation;
    // Re-export the `core` modules.
    pub use algorithms::*;
    pub use edge::*;
    pub use grid_lines::*;
    pub use point_mapping::*;
    pub use triangle::*;
    pub use triangulation::*;
    // Note: collections module not re-exported here to avoid namespace pollution
    // Import specific types via prelude or use crate::core::collections::
}

/// Contains geometric types including the `Point` struct and geometry predicates.
pub mod geometry {
    pub mod point;
    pub mod predicates;
    /// Geometric utility functions: circumcircles, bounding boxes, point generation
    pub mod util;
    /// Traits module containing the coordinate scalar abstraction.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use point::*;
    pub use predicates::*;
    pub use traits::*;
    pub use util::*;
}

/// Named mapping cache and the data sources feeding it.
pub mod cache {
    pub mod data_source;
    pub mod mapping_cache;
    pub use data_source::*;
    pub use mapping_cache::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::bowyer_watson::*, edge::*, grid_lines::*, point_mapping::*, triangle::*,
        triangulation::*,
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{point::*, predicates::*, traits::coordinate::*, util::*};

    // Re-export from cache
    pub use crate::cache::{data_source::*, mapping_cache::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
