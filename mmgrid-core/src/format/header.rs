//! Grid file header definitions
//!
//! Both headers are `#[repr(C)]` plain old data so they can be written with a
//! byte copy and read in place from a mapping. The trailing `lock` region is
//! opaque to this crate; the implementation crate places a process-shared
//! mutex there.

use bytemuck::{Pod, Zeroable};

use super::constants::{matrix, matrix3d, LOCK_REGION_SIZE, MAGIC_LEN};
use crate::{GridError, Result};

/// Grid dimensions. 2-D grids always report a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dims {
    pub pages: u64,
    pub rows: u64,
    pub columns: u64,
}

impl Dims {
    /// 2-D dimensions
    pub const fn new(rows: u64, columns: u64) -> Self {
        Self {
            pages: 1,
            rows,
            columns,
        }
    }

    /// 3-D dimensions
    pub const fn new_3d(pages: u64, rows: u64, columns: u64) -> Self {
        Self {
            pages,
            rows,
            columns,
        }
    }

    /// Number of cells, or `None` on overflow
    pub const fn cells(&self) -> Option<u64> {
        match self.pages.checked_mul(self.rows) {
            Some(plane) => plane.checked_mul(self.columns),
            None => None,
        }
    }
}

impl Default for Dims {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Common interface of the 2-D and 3-D headers
pub trait GridHeader: Pod {
    /// Leading magic token
    const MAGIC: [u8; MAGIC_LEN];
    /// Trailing magic token (last bytes of the file)
    const FOOTER_MAGIC: [u8; MAGIC_LEN];
    /// Size of the header in bytes
    const SIZE: usize = core::mem::size_of::<Self>();
    /// Offset of the embedded lock region from the start of the header
    const LOCK_OFFSET: usize;

    /// Build a header with the magic token filled in and a zeroed lock region
    fn new(element_size: u64, dims: Dims) -> Self;

    fn magic(&self) -> [u8; MAGIC_LEN];

    fn element_size(&self) -> u64;

    fn dims(&self) -> Dims;

    fn set_dims(&mut self, dims: Dims);

    /// Validate the magic token
    fn is_valid(&self) -> bool {
        self.magic() == Self::MAGIC
    }
}

/// Header of a 2-D grid file
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct MatrixHeader {
    /// Magic token: `"::---begin---::\n"`
    pub magic: [u8; MAGIC_LEN],
    /// Size in bytes of one element
    pub size_of_data_type: u64,
    /// Number of rows
    pub rows: u64,
    /// Number of columns
    pub columns: u64,
    /// Embedded mutex storage
    pub lock: [u8; LOCK_REGION_SIZE],
}

impl GridHeader for MatrixHeader {
    const MAGIC: [u8; MAGIC_LEN] = matrix::HEADER_MAGIC;
    const FOOTER_MAGIC: [u8; MAGIC_LEN] = matrix::FOOTER_MAGIC;
    const LOCK_OFFSET: usize = core::mem::offset_of!(MatrixHeader, lock);

    fn new(element_size: u64, dims: Dims) -> Self {
        Self {
            magic: Self::MAGIC,
            size_of_data_type: element_size,
            rows: dims.rows,
            columns: dims.columns,
            lock: [0; LOCK_REGION_SIZE],
        }
    }

    fn magic(&self) -> [u8; MAGIC_LEN] {
        self.magic
    }

    fn element_size(&self) -> u64 {
        self.size_of_data_type
    }

    fn dims(&self) -> Dims {
        Dims::new(self.rows, self.columns)
    }

    fn set_dims(&mut self, dims: Dims) {
        self.rows = dims.rows;
        self.columns = dims.columns;
    }
}

/// Header of a 3-D grid file
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Matrix3dHeader {
    /// Magic token: `"---begin_3d_---\n"`
    pub magic: [u8; MAGIC_LEN],
    /// Size in bytes of one element
    pub size_of_data_type: u64,
    /// Number of pages
    pub pages: u64,
    /// Number of rows per page
    pub rows: u64,
    /// Number of columns per row
    pub columns: u64,
    /// Embedded mutex storage
    pub lock: [u8; LOCK_REGION_SIZE],
}

impl GridHeader for Matrix3dHeader {
    const MAGIC: [u8; MAGIC_LEN] = matrix3d::HEADER_MAGIC;
    const FOOTER_MAGIC: [u8; MAGIC_LEN] = matrix3d::FOOTER_MAGIC;
    const LOCK_OFFSET: usize = core::mem::offset_of!(Matrix3dHeader, lock);

    fn new(element_size: u64, dims: Dims) -> Self {
        Self {
            magic: Self::MAGIC,
            size_of_data_type: element_size,
            pages: dims.pages,
            rows: dims.rows,
            columns: dims.columns,
            lock: [0; LOCK_REGION_SIZE],
        }
    }

    fn magic(&self) -> [u8; MAGIC_LEN] {
        self.magic
    }

    fn element_size(&self) -> u64 {
        self.size_of_data_type
    }

    fn dims(&self) -> Dims {
        Dims::new_3d(self.pages, self.rows, self.columns)
    }

    fn set_dims(&mut self, dims: Dims) {
        self.pages = dims.pages;
        self.rows = dims.rows;
        self.columns = dims.columns;
    }
}

/// Parse a header from the start of `bytes`, validating length and magic
pub fn parse_header<H: GridHeader>(bytes: &[u8]) -> Result<H> {
    if bytes.len() < H::SIZE {
        return Err(GridError::InsufficientBuffer);
    }

    let header: H = bytemuck::pod_read_unaligned(&bytes[..H::SIZE]);
    if !header.is_valid() {
        return Err(GridError::InvalidMagic);
    }

    Ok(header)
}
