//! Load-time validation of grid files
//!
//! A file is accepted only if it is at least an empty header plus footer,
//! both magic tokens match, the element size matches the requested type, and
//! the declared dimensions fit inside the actual file size.

use crate::format::{
    footer_offset, min_file_size, parse_header, required_file_size, GridHeader, FOOTER_SIZE,
};
use crate::GridError;

/// Validate a mapped grid file
///
/// `bytes` must be the complete file contents (typically the mapping).
/// Returns the parsed header on success.
pub fn validate_file<H: GridHeader>(bytes: &[u8], element_size: u64) -> Result<H, GridError> {
    let file_len = bytes.len() as u64;
    if file_len < min_file_size::<H>() {
        return Err(GridError::FileTooSmall);
    }

    let header: H = parse_header(bytes)?;

    let footer_start = footer_offset(file_len) as usize;
    if bytes[footer_start..footer_start + FOOTER_SIZE] != H::FOOTER_MAGIC {
        return Err(GridError::InvalidMagic);
    }

    if header.element_size() != element_size {
        return Err(GridError::ElementSizeMismatch);
    }

    let cells = header.dims().cells().ok_or(GridError::DimensionOverflow)?;
    let required = required_file_size::<H>(cells, element_size)?;
    if required > file_len {
        return Err(GridError::SizeMismatch);
    }

    Ok(header)
}
