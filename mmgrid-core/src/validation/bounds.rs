//! Index arithmetic for circular and clamped grid access

use crate::{Dims, GridError};

/// Reduce a signed index modulo `len` into `0..len`
///
/// Negative indices wrap from the end, so `wrap_index(-1, 5) == 4`.
/// Returns 0 when `len` is 0; callers must not read from an empty axis.
pub const fn wrap_index(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as isize) as usize
}

/// Clamp a signed index to the nearest valid position in `0..len`
pub const fn clamp_index(index: isize, len: usize) -> usize {
    if len == 0 || index < 0 {
        return 0;
    }
    let index = index as usize;
    if index >= len {
        len - 1
    } else {
        index
    }
}

/// Number of cells in `dims` as an in-memory element count
pub fn checked_cells(dims: Dims) -> Result<usize, GridError> {
    let cells = dims.cells().ok_or(GridError::DimensionOverflow)?;
    usize::try_from(cells).map_err(|_| GridError::DimensionOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(0, 5), 0);
        assert_eq!(wrap_index(4, 5), 4);
        assert_eq!(wrap_index(5, 5), 0);
        assert_eq!(wrap_index(-1, 5), 4);
        assert_eq!(wrap_index(-6, 5), 4);
        assert_eq!(wrap_index(17, 5), 2);
        assert_eq!(wrap_index(3, 0), 0);
    }

    #[test]
    fn test_wrap_index_period() {
        for k in -20isize..20 {
            for n in -3isize..3 {
                assert_eq!(wrap_index(k, 7), wrap_index(k + n * 7, 7));
            }
        }
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-3, 5), 0);
        assert_eq!(clamp_index(2, 5), 2);
        assert_eq!(clamp_index(9, 5), 4);
        assert_eq!(clamp_index(9, 0), 0);
    }

    #[test]
    fn test_checked_cells() {
        assert_eq!(checked_cells(Dims::new(3, 4)), Ok(12));
        assert_eq!(
            checked_cells(Dims::new_3d(u64::MAX, 2, 2)),
            Err(GridError::DimensionOverflow)
        );
    }
}
