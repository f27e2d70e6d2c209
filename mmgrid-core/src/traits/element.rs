//! Grid element type constraints
//!
//! Every grid carries exactly one element type. Elements are plain old data
//! so they can be stored verbatim in a memory-mapped file and read back with
//! a byte copy.

use core::fmt::Debug;

/// Trait for types that can be stored as grid elements
///
/// Requirements:
/// - `Pod`: any bit pattern is valid and the type has no padding, so cells
///   can live directly in a mapped file
/// - `Default`: the zero sentinel returned for cells that do not exist
///   (augmentation gaps, empty references, empty grids)
/// - `PartialEq`/`Debug`: comparisons and diagnostics
pub trait GridElement: bytemuck::Pod + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Size in bytes of one element, as recorded in file headers
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// The zero sentinel
    fn zero() -> Self {
        Self::default()
    }
}

macro_rules! impl_grid_element {
    ($($type:ty),* $(,)?) => {
        $(impl GridElement for $type {})*
    };
}

impl_grid_element!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(u8::size_bytes(), 1);
        assert_eq!(i16::size_bytes(), 2);
        assert_eq!(f32::size_bytes(), 4);
        assert_eq!(f64::size_bytes(), 8);
    }

    #[test]
    fn test_zero_sentinel() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(i32::zero(), 0);
    }
}
