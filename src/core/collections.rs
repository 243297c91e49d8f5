//! Collection aliases used by the triangulation and the mapping cache.
//!
//! All keys hashed here are internal (point indices, edge keys, data-set
//! names supplied by the embedding application), so a fast non-cryptographic
//! hasher is used throughout.

use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Optimized `HashMap` type for performance-critical operations.
/// Uses `rustc_hash::FxHasher` for faster hashing in non-cryptographic contexts.
///
/// # Security Warning
///
/// Not DoS-resistant: do not use with attacker-controlled keys.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Optimized `HashSet` type for membership tests.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<usize> = FastHashSet::default();
/// set.insert(7);
/// assert!(set.contains(&7));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec that uses stack allocation for small collections.
///
/// # Size Guidelines
///
/// - **N=3**: Triangle vertex and edge lists
/// - **N=16**: Per-insertion scratch (bad triangles, hole boundary)
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<usize, 16> = SmallBuffer::new();
/// buffer.extend(0..5);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Scratch capacity for the per-insertion buffers of the triangulation.
///
/// A Bowyer-Watson cavity in a well-spread 2-D point set rarely has more than a
/// dozen boundary edges.
pub const CAVITY_BUFFER_SIZE: usize = 16;

/// Creates a [`FastHashMap`] with the given capacity.
#[inline]
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, FxBuildHasher)
}
