//! Canonical edge identifiers.
//!
//! Edges are never stored by the triangulation; they are derived from the
//! triangles while repairing the hole left by removed triangles. [`EdgeKey`]
//! identifies an undirected edge purely by its two point indices:
//!
//! - endpoint order is canonicalized so `(a, b)` and `(b, a)` are the same edge
//! - it is `Copy`/`Hash`/`Ord` for fast use in sets and maps
//!
//! Two triangles sharing an edge traverse it in opposite winding, so the
//! canonical form is what lets the hole-boundary search recognize it as shared.

/// Canonical identifier for an (undirected) edge between two point indices.
///
/// # Examples
///
/// ```rust
/// use schematic_mapping::core::edge::EdgeKey;
///
/// let edge = EdgeKey::new(7, 2);
/// assert_eq!(edge.endpoints(), (2, 7));
/// assert_eq!(edge, EdgeKey::new(2, 7));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: usize,
    v1: usize,
}

impl EdgeKey {
    /// Creates a new canonical edge key.
    ///
    /// The endpoints are reordered so that `v0 <= v1`.
    #[inline]
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Returns the first (smaller) endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(self) -> usize {
        self.v0
    }

    /// Returns the second (larger) endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(self) -> usize {
        self.v1
    }

    /// Returns the two endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (usize, usize) {
        (self.v0, self.v1)
    }

    /// Returns `true` if `index` is one of the endpoints.
    #[inline]
    #[must_use]
    pub const fn has_endpoint(self, index: usize) -> bool {
        self.v0 == index || self.v1 == index
    }
}

impl From<(usize, usize)> for EdgeKey {
    #[inline]
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}
