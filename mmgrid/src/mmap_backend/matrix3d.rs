//! Persistent 3-D grid

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use mmgrid_core::{Dims, GridElement, Matrix3dHeader};

use super::mmap_core::GridStore;
use crate::config::StorageConfig;
use crate::expression::{Expression3d, Expression3dMut};
use crate::labels::{Labeled, NameTable};
use crate::sync::{LockGuard, LockStatus};
use crate::Result;

/// Persistent 3-D grid backed by a memory-mapped file
///
/// Cells are stored at `page*rows*columns + row*columns + column`. Apart from
/// the extra axis it behaves exactly like [`Matrix`](crate::Matrix).
pub struct Matrix3d<T: GridElement> {
    store: GridStore<Matrix3dHeader>,
    labels: NameTable,
    _element: PhantomData<T>,
}

impl<T: GridElement> Matrix3d<T> {
    pub fn new(pages: usize, rows: usize, columns: usize, fill: T) -> Result<Self> {
        Self::with_config(pages, rows, columns, fill, StorageConfig::from_env())
    }

    pub fn with_config(
        pages: usize,
        rows: usize,
        columns: usize,
        fill: T,
        config: StorageConfig,
    ) -> Result<Self> {
        let mut grid = Self::unmapped_with_config(config);
        grid.resize_with(pages, rows, columns, fill)?;
        Ok(grid)
    }

    pub fn unmapped() -> Self {
        Self::unmapped_with_config(StorageConfig::from_env())
    }

    pub fn unmapped_with_config(config: StorageConfig) -> Self {
        Self {
            store: GridStore::unmapped(config),
            labels: NameTable::new(),
            _element: PhantomData,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, StorageConfig::from_env())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: StorageConfig) -> Result<Self> {
        let mut grid = Self::unmapped_with_config(config);
        grid.load(path)?;
        Ok(grid)
    }

    /// Replace the current mapping; failure leaves the grid invalid
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.store.load(path.as_ref(), T::size_bytes() as u64)
    }

    pub fn resize_with(&mut self, pages: usize, rows: usize, columns: usize, fill: T) -> Result<()> {
        let dims = Dims::new_3d(pages as u64, rows as u64, columns as u64);
        self.store.resize_with(dims, fill)
    }

    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.try_clone()?,
            labels: NameTable::new(),
            _element: PhantomData,
        })
    }

    pub fn deep_copy(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.deep_copy()?,
            labels: self.labels.clone(),
            _element: PhantomData,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.store.is_valid()
    }

    pub fn path(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn file_size(&self) -> u64 {
        self.store.file_size()
    }

    pub fn config(&self) -> &StorageConfig {
        self.store.config()
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    pub fn remove(self) -> Result<()> {
        self.store.remove()
    }

    pub fn lock(&self) -> Result<LockStatus> {
        self.store.mutex()?.lock()
    }

    pub fn unlock(&self) -> Result<()> {
        self.store.mutex()?.unlock()
    }

    pub fn mark_consistent(&self) -> Result<()> {
        self.store.mutex()?.mark_consistent()
    }

    pub fn lock_guard(&self) -> Result<LockGuard<'_>> {
        LockGuard::acquire(self.store.mutex()?)
    }

    #[inline]
    fn offset(&self, page: usize, row: usize, column: usize) -> usize {
        let dims = self.store.dims();
        (page * dims.rows as usize + row) * dims.columns as usize + column
    }
}

impl<T: GridElement> Expression3d for Matrix3d<T> {
    type Elem = T;

    fn pages(&self) -> usize {
        self.store.dims().pages as usize
    }

    fn rows(&self) -> usize {
        self.store.dims().rows as usize
    }

    fn columns(&self) -> usize {
        self.store.dims().columns as usize
    }

    #[inline]
    fn at(&self, page: usize, row: usize, column: usize) -> T {
        self.store.read(self.offset(page, row, column))
    }

    #[inline]
    fn at_index(&self, index: usize) -> T {
        self.store.read(index)
    }
}

impl<T: GridElement> Expression3dMut for Matrix3d<T> {
    #[inline]
    fn set(&mut self, page: usize, row: usize, column: usize, value: T) {
        let cell = self.offset(page, row, column);
        self.store.write(cell, value);
    }

    fn set_index(&mut self, index: usize, value: T) {
        self.store.write(index, value);
    }

    fn resize(&mut self, pages: usize, rows: usize, columns: usize) -> Result<()> {
        self.resize_with(pages, rows, columns, T::default())
    }
}

impl<T: GridElement> Labeled for Matrix3d<T> {
    fn labels(&self) -> &NameTable {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut NameTable {
        &mut self.labels
    }
}

impl<T: GridElement> fmt::Debug for Matrix3d<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix3d")
            .field("path", &self.path())
            .field("pages", &self.pages())
            .field("rows", &Expression3d::rows(self))
            .field("columns", &Expression3d::columns(self))
            .finish()
    }
}
