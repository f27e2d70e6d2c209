//! Mapped grid files
//!
//! [`MappedGrid`] owns one writable mapping of a grid file and knows the
//! byte layout (header, cells, footer) for a header type `H`. It is generic
//! over the header so the 2-D and 3-D grids share one engine.

use std::fs::{File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bytemuck::{bytes_of, pod_read_unaligned};
use memmap2::{MmapMut, MmapOptions};
use mmgrid_core::{
    capacity, checked_cells, data_offset, footer_offset, required_file_size, validate_file, Dims,
    GridElement, GridError, GridHeader, FOOTER_SIZE,
};
use rayon::prelude::*;

use crate::config::StorageConfig;
use crate::sync::SharedMutex;
use crate::{Error, Result};

/// A writable mapping of a grid file
pub(crate) struct MappedGrid<H: GridHeader> {
    mmap: MmapMut,
    /// Start of the mapping, taken once from `mmap` so shared and exclusive
    /// accesses all derive from the same pointer
    base: *mut u8,
    path: PathBuf,
    element_size: u64,
    _header: PhantomData<H>,
}

// SAFETY: `base` points into `mmap`, which is owned by this value and moves
// with it. The mapping itself is `Send`.
unsafe impl<H: GridHeader> Send for MappedGrid<H> {}

impl<H: GridHeader> MappedGrid<H> {
    /// Create a fresh uniquely named file sized exactly for `dims`, write
    /// header and footer, and initialise the embedded mutex
    ///
    /// Cells are left zeroed; the caller fills them.
    pub(crate) fn create(config: &StorageConfig, element_size: u64, dims: Dims) -> Result<Self> {
        let cells = dims.cells().ok_or(GridError::DimensionOverflow)?;
        let size = required_file_size::<H>(cells, element_size)?;

        let file = tempfile::Builder::new()
            .prefix(&config.file_prefix)
            .suffix(&config.file_suffix)
            .tempfile_in(&config.scratch_dir)
            .map_err(Error::io("failed to create grid file"))?;

        // Deleted on drop until `keep`
        file.as_file()
            .set_len(size)
            .map_err(Error::io("failed to size grid file"))?;

        let mut grid = Self::map(file.as_file(), file.path().to_path_buf(), element_size)?;
        let header = H::new(element_size, dims);
        grid.bytes_mut()[..H::SIZE].copy_from_slice(bytes_of(&header));
        grid.write_footer();
        grid.mutex().ensure_init()?;

        file.keep()
            .map_err(|e| Error::io("failed to persist grid file")(e.error))?;

        log::debug!(
            "created grid file {} ({} bytes, {} cells)",
            grid.path.display(),
            size,
            cells
        );
        Ok(grid)
    }

    /// Map an existing file and validate it against `element_size`
    pub(crate) fn open(path: &Path, element_size: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(Error::io("failed to open grid file"))?;

        let len = file
            .metadata()
            .map_err(Error::io("failed to stat grid file"))?
            .len();
        if len < mmgrid_core::min_file_size::<H>() {
            log::warn!("rejected {}: {} bytes is below the minimum", path.display(), len);
            return Err(GridError::FileTooSmall.into());
        }

        let grid = Self::map(&file, path.to_path_buf(), element_size)?;
        if let Err(e) = validate_file::<H>(grid.bytes(), element_size) {
            log::warn!("rejected {}: {}", path.display(), e);
            return Err(e.into());
        }

        log::debug!("opened grid file {} ({} bytes)", path.display(), len);
        Ok(grid)
    }

    fn map(file: &File, path: PathBuf, element_size: u64) -> Result<Self> {
        // SAFETY: the file is opened read/write and we keep the mapping for
        // the lifetime of this value. Other processes may write concurrently;
        // cells are only ever read and written by value.
        let mut mmap = unsafe {
            MmapOptions::new()
                .map_mut(file)
                .map_err(Error::io("failed to map grid file"))?
        };
        let base = mmap.as_mut_ptr();
        Ok(Self {
            mmap,
            base,
            path,
            element_size,
            _header: PhantomData,
        })
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: base and len describe the live mapping
        unsafe { std::slice::from_raw_parts(self.base, self.mmap.len()) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: base and len describe the live mapping, &mut self is exclusive
        unsafe { std::slice::from_raw_parts_mut(self.base, self.mmap.len()) }
    }

    fn write_footer(&mut self) {
        let at = footer_offset(self.file_size()) as usize;
        self.bytes_mut()[at..at + FOOTER_SIZE].copy_from_slice(&H::FOOTER_MAGIC);
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn element_size(&self) -> u64 {
        self.element_size
    }

    pub(crate) fn file_size(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Cells the file can hold without growing
    pub(crate) fn capacity(&self) -> u64 {
        capacity::<H>(self.file_size(), self.element_size)
    }

    /// Current header, read unaligned from the mapping
    pub(crate) fn header(&self) -> H {
        pod_read_unaligned(&self.bytes()[..H::SIZE])
    }

    pub(crate) fn dims(&self) -> Dims {
        self.header().dims()
    }

    /// Rewrite the dimension fields, leaving magic and lock region alone
    pub(crate) fn set_dims(&mut self, dims: Dims) {
        let mut header = self.header();
        header.set_dims(dims);
        let lock_start = H::LOCK_OFFSET;
        let lock_end = lock_start + mmgrid_core::LOCK_REGION_SIZE;
        let src = bytes_of(&header);
        let dst = self.bytes_mut();
        dst[..lock_start].copy_from_slice(&src[..lock_start]);
        dst[lock_end..H::SIZE].copy_from_slice(&src[lock_end..]);
    }

    /// Handle to the embedded mutex
    pub(crate) fn mutex(&self) -> SharedMutex {
        // SAFETY: the lock region lies inside the header of a mapping that
        // lives as long as `self`. LOCK_OFFSET is a multiple of 8 and the
        // mapping is page aligned.
        unsafe { SharedMutex::from_region(self.base.add(H::LOCK_OFFSET)) }
    }

    /// Byte range of cell `cell` inside the data region
    ///
    /// Panics when the cell lies past the file's capacity, so a bad index
    /// never reaches the footer or beyond the mapping.
    #[inline]
    fn cell_range(&self, cell: usize) -> std::ops::Range<usize> {
        let capacity = self.capacity();
        assert!(
            (cell as u64) < capacity,
            "cell {} out of range for capacity {}",
            cell,
            capacity
        );
        let size = self.element_size as usize;
        let start = data_offset::<H>() + cell * size;
        start..start + size
    }

    /// Read cell `cell` as `T`
    #[inline]
    pub(crate) fn read<T: GridElement>(&self, cell: usize) -> T {
        let range = self.cell_range(cell);
        pod_read_unaligned(&self.bytes()[range])
    }

    #[inline]
    pub(crate) fn write<T: GridElement>(&mut self, cell: usize, value: T) {
        let range = self.cell_range(cell);
        self.bytes_mut()[range].copy_from_slice(bytes_of(&value));
    }

    /// Set cells `start..end` to `fill`, in parallel on the rayon pool when
    /// the range is large enough
    pub(crate) fn fill<T: GridElement>(
        &mut self,
        start: usize,
        end: usize,
        fill: T,
        config: &StorageConfig,
    ) {
        if start >= end {
            return;
        }
        let size = T::size_bytes();
        let offset = data_offset::<H>();
        let region = &mut self.bytes_mut()[offset + start * size..offset + end * size];
        let pattern = bytes_of(&fill);

        if config.parallel_for(end - start) {
            region
                .par_chunks_mut(size)
                .for_each(|cell| cell.copy_from_slice(pattern));
        } else {
            region
                .chunks_mut(size)
                .for_each(|cell| cell.copy_from_slice(pattern));
        }
    }

    /// Raw cell bytes `0..cells`
    pub(crate) fn cell_bytes(&self, cells: usize) -> &[u8] {
        let offset = data_offset::<H>();
        &self.bytes()[offset..offset + cells * self.element_size as usize]
    }

    pub(crate) fn cell_bytes_mut(&mut self, cells: usize) -> &mut [u8] {
        let offset = data_offset::<H>();
        let len = cells * self.element_size as usize;
        &mut self.bytes_mut()[offset..offset + len]
    }

    pub(crate) fn flush(&self) -> Result<()> {
        self.mmap
            .flush()
            .map_err(Error::io("failed to flush grid file"))
    }
}

/// Backing store shared by [`Matrix`](crate::Matrix) and
/// [`Matrix3d`](crate::Matrix3d): an optional mapping plus cached dims
///
/// Without a mapping the store is invalid and reports zero dimensions.
pub(crate) struct GridStore<H: GridHeader> {
    grid: Option<MappedGrid<H>>,
    dims: Dims,
    cells: usize,
    config: StorageConfig,
}

const EMPTY: Dims = Dims::new_3d(0, 0, 0);

/// Bytes per rayon task when copying cells
const COPY_CHUNK: usize = 1 << 20;

impl<H: GridHeader> GridStore<H> {
    pub(crate) fn unmapped(config: StorageConfig) -> Self {
        Self {
            grid: None,
            dims: EMPTY,
            cells: 0,
            config,
        }
    }

    fn invalidate(&mut self) {
        self.grid = None;
        self.dims = EMPTY;
        self.cells = 0;
    }

    pub(crate) fn config(&self) -> &StorageConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn dims(&self) -> Dims {
        self.dims
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.grid.is_some()
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.grid.as_ref().map(MappedGrid::path)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.grid.as_ref().map_or(0, |g| g.capacity() as usize)
    }

    pub(crate) fn file_size(&self) -> u64 {
        self.grid.as_ref().map_or(0, MappedGrid::file_size)
    }

    /// Replace the current mapping with `path`. On failure the store is left
    /// unmapped.
    pub(crate) fn load(&mut self, path: &Path, element_size: u64) -> Result<()> {
        self.invalidate();
        let grid = MappedGrid::<H>::open(path, element_size)?;
        let dims = grid.dims();
        self.cells = checked_cells(dims)?;
        self.dims = dims;
        self.grid = Some(grid);
        Ok(())
    }

    /// Reshape to `dims`
    ///
    /// Reuses the current file when its capacity suffices, filling only the
    /// cells past the previous element count. Otherwise creates a new file
    /// and fills every cell. Any failure leaves the store unmapped.
    pub(crate) fn resize_with<T: GridElement>(&mut self, dims: Dims, fill: T) -> Result<()> {
        let cells = match checked_cells(dims) {
            Ok(cells) => cells,
            Err(e) => {
                self.invalidate();
                return Err(e.into());
            }
        };

        if let Some(grid) = self.grid.as_mut() {
            if grid.capacity() >= cells as u64 {
                grid.set_dims(dims);
                grid.fill(self.cells, cells, fill, &self.config);
                log::trace!(
                    "resized {} in place to {:?}",
                    grid.path().display(),
                    dims
                );
                self.dims = dims;
                self.cells = cells;
                return Ok(());
            }
        }

        self.invalidate();
        let mut grid = MappedGrid::<H>::create(&self.config, T::size_bytes() as u64, dims)?;
        grid.fill(0, cells, fill, &self.config);
        self.grid = Some(grid);
        self.dims = dims;
        self.cells = cells;
        Ok(())
    }

    /// Another mapping of the same file
    pub(crate) fn try_clone(&self) -> Result<Self> {
        let mut clone = Self::unmapped(self.config.clone());
        if let Some(grid) = &self.grid {
            clone.load(grid.path(), grid.element_size())?;
        }
        Ok(clone)
    }

    /// A new file holding a copy of every cell
    pub(crate) fn deep_copy(&self) -> Result<Self> {
        let mut copy = Self::unmapped(self.config.clone());
        let Some(grid) = &self.grid else {
            return Ok(copy);
        };

        let mut target = MappedGrid::<H>::create(&self.config, grid.element_size(), self.dims)?;
        let source = grid.cell_bytes(self.cells);
        let destination = target.cell_bytes_mut(self.cells);
        if self.config.parallel_for(self.cells) {
            destination
                .par_chunks_mut(COPY_CHUNK)
                .zip(source.par_chunks(COPY_CHUNK))
                .for_each(|(d, s)| d.copy_from_slice(s));
        } else {
            destination.copy_from_slice(source);
        }

        copy.grid = Some(target);
        copy.dims = self.dims;
        copy.cells = self.cells;
        Ok(copy)
    }

    pub(crate) fn flush(&self) -> Result<()> {
        match &self.grid {
            Some(grid) => grid.flush(),
            None => Err(Error::Unmapped),
        }
    }

    /// Unmap and delete the backing file
    pub(crate) fn remove(mut self) -> Result<()> {
        let Some(grid) = self.grid.take() else {
            return Ok(());
        };
        let path = grid.path().to_path_buf();
        drop(grid);
        std::fs::remove_file(&path).map_err(Error::io("failed to remove grid file"))?;
        log::debug!("removed grid file {}", path.display());
        Ok(())
    }

    pub(crate) fn mutex(&self) -> Result<SharedMutex> {
        self.grid
            .as_ref()
            .map(MappedGrid::mutex)
            .ok_or(Error::Unmapped)
    }

    /// Read a cell of the current grid; unmapped stores read as default
    ///
    /// Panics when `cell` is not below the current element count.
    #[inline]
    pub(crate) fn read<T: GridElement>(&self, cell: usize) -> T {
        match &self.grid {
            Some(grid) => {
                self.check_cell(cell);
                grid.read(cell)
            }
            None => T::default(),
        }
    }

    #[inline]
    pub(crate) fn write<T: GridElement>(&mut self, cell: usize, value: T) {
        let cells = self.cells;
        if let Some(grid) = self.grid.as_mut() {
            assert!(cell < cells, "cell {} out of range for {} cells", cell, cells);
            grid.write(cell, value);
        }
    }

    #[inline]
    fn check_cell(&self, cell: usize) {
        assert!(
            cell < self.cells,
            "cell {} out of range for {} cells",
            cell,
            self.cells
        );
    }
}
