//! Scalar bound shared by every coordinate in the crate.
//!
//! Both spaces a mapping connects (world and schematic map) are plain 2-D
//! floating-point planes, so the only abstraction needed is the scalar type.
//! [`CoordinateScalar`] is implemented for `f32` and `f64`.

use num_traits::{Float, NumCast};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};

/// Trait alias for the scalar type requirements of coordinates.
///
/// # Required Traits
///
/// - `Float`: Floating-point arithmetic operations
/// - `NumCast`: Conversion of configuration constants (which are `f64`)
/// - `Default`, `Debug`, `Display`: Construction and diagnostics
/// - `Send`, `Sync`, `'static`: Mappings are shared across threads by the cache
/// - `Serialize`, `DeserializeOwned`: Data sets are read from JSON documents
///
/// # Usage
///
/// ```rust
/// use schematic_mapping::geometry::traits::coordinate::CoordinateScalar;
///
/// fn midpoint<T: CoordinateScalar>(a: T, b: T) -> T {
///     (a + b) / T::from_f64_lossy(2.0)
/// }
///
/// assert_eq!(midpoint(1.0_f64, 3.0), 2.0);
/// assert_eq!(midpoint(1.0_f32, 2.0), 1.5);
/// ```
pub trait CoordinateScalar:
    Float
    + NumCast
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
    + Serialize
    + DeserializeOwned
{
    /// Converts an `f64` constant into this scalar type.
    ///
    /// Values outside the representable range saturate to infinity, which the
    /// callers treat as a non-finite input.
    fn from_f64_lossy(value: f64) -> Self;
}

impl CoordinateScalar for f32 {
    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    fn from_f64_lossy(value: f64) -> Self {
        value as Self
    }
}

impl CoordinateScalar for f64 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}
