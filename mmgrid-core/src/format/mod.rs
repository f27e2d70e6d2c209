//! Binary format definitions for persistent grid files
//!
//! A grid file is `header + rows*columns*element_size bytes + footer`
//! (3-D files add a pages dimension). Elements are row-major. The header
//! embeds a region reserved for a process-shared mutex, so files are only
//! portable between processes on the same architecture.

pub mod constants;
pub mod header;
pub mod layout;

pub use constants::{FOOTER_SIZE, LOCK_REGION_SIZE, MAGIC_LEN};
pub use header::{parse_header, Dims, GridHeader, Matrix3dHeader, MatrixHeader};
pub use layout::{capacity, data_offset, footer_offset, min_file_size, required_file_size};
