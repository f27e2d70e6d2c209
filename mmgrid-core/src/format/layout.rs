//! Byte layout arithmetic for grid files

use super::constants::FOOTER_SIZE;
use super::header::GridHeader;
use crate::{GridError, Result};

/// Offset of the first element from the start of the file
pub const fn data_offset<H: GridHeader>() -> usize {
    H::SIZE
}

/// Size of a file holding zero elements
pub const fn min_file_size<H: GridHeader>() -> u64 {
    (H::SIZE + FOOTER_SIZE) as u64
}

/// Offset of the footer in a file of `file_size` bytes
///
/// The footer always occupies the last bytes of the file, even when the
/// declared dimensions use less than the full capacity.
pub const fn footer_offset(file_size: u64) -> u64 {
    file_size.saturating_sub(FOOTER_SIZE as u64)
}

/// Exact file size needed for `cells` elements of `element_size` bytes
pub fn required_file_size<H: GridHeader>(cells: u64, element_size: u64) -> Result<u64> {
    cells
        .checked_mul(element_size)
        .and_then(|data| data.checked_add(min_file_size::<H>()))
        .ok_or(GridError::DimensionOverflow)
}

/// Number of elements a file of `file_size` bytes can hold
pub const fn capacity<H: GridHeader>(file_size: u64, element_size: u64) -> u64 {
    if element_size == 0 {
        return 0;
    }
    file_size.saturating_sub(min_file_size::<H>()) / element_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Matrix3dHeader, MatrixHeader};

    #[test]
    fn test_required_file_size() {
        let min = min_file_size::<MatrixHeader>();
        assert_eq!(min, 168 + 16);
        assert_eq!(required_file_size::<MatrixHeader>(0, 8), Ok(min));
        assert_eq!(required_file_size::<MatrixHeader>(12, 8), Ok(min + 96));
        assert_eq!(
            required_file_size::<MatrixHeader>(u64::MAX, 8),
            Err(GridError::DimensionOverflow)
        );
    }

    #[test]
    fn test_capacity() {
        let min = min_file_size::<Matrix3dHeader>();
        assert_eq!(capacity::<Matrix3dHeader>(min, 4), 0);
        assert_eq!(capacity::<Matrix3dHeader>(min + 40, 4), 10);
        assert_eq!(capacity::<Matrix3dHeader>(min + 41, 4), 10);
        assert_eq!(capacity::<Matrix3dHeader>(10, 4), 0);
        assert_eq!(capacity::<Matrix3dHeader>(min + 40, 0), 0);
    }

    #[test]
    fn test_footer_offset() {
        assert_eq!(footer_offset(200), 184);
        assert_eq!(footer_offset(4), 0);
    }
}
