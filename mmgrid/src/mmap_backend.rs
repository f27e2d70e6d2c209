//! Persistent memory-mapped grids
//!
//! A [`Matrix`] (2-D) or [`Matrix3d`] (3-D) lives in a named file laid out as
//! header, row-major cells, footer. The header embeds a process-shared robust
//! mutex so independent processes mapping the same file can coordinate.
//!
//! Files are created under the configured scratch directory with a unique
//! generated name and are never deleted implicitly: dropping a grid only
//! unmaps it. Use [`Matrix::remove`] to delete the file.
//!
//! No element access takes the mutex. Callers that share a file across
//! threads or processes bracket their accesses with `lock`/`unlock` (or a
//! [`LockGuard`]).

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use mmgrid_core::{Dims, GridElement, MatrixHeader};

use crate::config::StorageConfig;
use crate::expression::{Expression, ExpressionMut};
use crate::labels::{Labeled, NameTable};
use crate::sync::{LockGuard, LockStatus};
use crate::Result;

mod file_io;
mod matrix3d;
mod mmap_core;

pub use file_io::{GridFile, GridKind};
pub use matrix3d::Matrix3d;

use mmap_core::GridStore;

/// Persistent 2-D grid backed by a memory-mapped file
///
/// ```no_run
/// use mmgrid::{Expression, ExpressionMut, Matrix};
///
/// let mut m = Matrix::new(2, 3, 0.0f64)?;
/// m.set(1, 2, 4.5);
/// let path = m.path().unwrap().to_path_buf();
/// drop(m);
///
/// let reopened = Matrix::<f64>::open(&path)?;
/// assert_eq!(reopened.at(1, 2), 4.5);
/// # Ok::<(), mmgrid::Error>(())
/// ```
pub struct Matrix<T: GridElement> {
    store: GridStore<MatrixHeader>,
    labels: NameTable,
    _element: PhantomData<T>,
}

impl<T: GridElement> Matrix<T> {
    /// Create a `rows x columns` grid filled with `fill` in a new file,
    /// using [`StorageConfig::from_env`]
    pub fn new(rows: usize, columns: usize, fill: T) -> Result<Self> {
        Self::with_config(rows, columns, fill, StorageConfig::from_env())
    }

    /// Create a `rows x columns` grid filled with `fill` in a new file
    pub fn with_config(rows: usize, columns: usize, fill: T, config: StorageConfig) -> Result<Self> {
        let mut matrix = Self::unmapped_with_config(config);
        matrix.resize_with(rows, columns, fill)?;
        Ok(matrix)
    }

    /// A grid with no backing file: invalid, `0 x 0`
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

    /// Map an existing grid file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, StorageConfig::from_env())
    }

    /// Map an existing grid file; `config` governs files created by later
    /// growth or deep copies
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: StorageConfig) -> Result<Self> {
        let mut matrix = Self::unmapped_with_config(config);
        matrix.load(path)?;
        Ok(matrix)
    }

    /// Replace the current mapping with the file at `path`
    ///
    /// The file must carry the 2-D magic, the footer token, this grid's
    /// element size, and be large enough for its declared dimensions. On
    /// failure the grid is left invalid with zero dimensions.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.store.load(path.as_ref(), T::size_bytes() as u64)
    }

    /// Reshape to `rows x columns`
    ///
    /// Within capacity the file is reused and only cells past the previous
    /// element count are set to `fill`. Beyond capacity a new file is
    /// created and every cell is set to `fill`; the old file is left on disk.
    pub fn resize_with(&mut self, rows: usize, columns: usize, fill: T) -> Result<()> {
        self.store
            .resize_with(Dims::new(rows as u64, columns as u64), fill)
    }

    /// Another handle on the same file. Writes through either handle are
    /// visible to both. Labels are not shared.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.try_clone()?,
            labels: NameTable::new(),
            _element: PhantomData,
        })
    }

    /// An independent copy in a new file, labels included
    pub fn deep_copy(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.deep_copy()?,
            labels: self.labels.clone(),
            _element: PhantomData,
        })
    }

    /// Whether a file is mapped
    pub fn is_valid(&self) -> bool {
        self.store.is_valid()
    }

    /// Backing file, if mapped
    pub fn path(&self) -> Option<&Path> {
        self.store.path()
    }

    /// Cells the backing file holds without growing
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn file_size(&self) -> u64 {
        self.store.file_size()
    }

    pub fn config(&self) -> &StorageConfig {
        self.store.config()
    }

    /// Flush dirty pages to the file
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Unmap and delete the backing file
    pub fn remove(self) -> Result<()> {
        self.store.remove()
    }

    /// Block until the file's mutex is held
    ///
    /// Returns [`LockStatus::OwnerDied`] when the previous holder died while
    /// holding it; the caller then owns the mutex and should call
    /// [`mark_consistent`](Self::mark_consistent) before unlocking.
    pub fn lock(&self) -> Result<LockStatus> {
        self.store.mutex()?.lock()
    }

    pub fn unlock(&self) -> Result<()> {
        self.store.mutex()?.unlock()
    }

    /// Acknowledge recovery after [`LockStatus::OwnerDied`]
    pub fn mark_consistent(&self) -> Result<()> {
        self.store.mutex()?.mark_consistent()
    }

    /// Lock and return a guard that unlocks on drop
    pub fn lock_guard(&self) -> Result<LockGuard<'_>> {
        LockGuard::acquire(self.store.mutex()?)
    }
}

impl<T: GridElement> Expression for Matrix<T> {
    type Elem = T;

    #[inline]
    fn rows(&self) -> usize {
        self.store.dims().rows as usize
    }

    #[inline]
    fn columns(&self) -> usize {
        self.store.dims().columns as usize
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> T {
        self.store.read(row * self.columns() + column)
    }

    #[inline]
    fn at_index(&self, index: usize) -> T {
        self.store.read(index)
    }
}

impl<T: GridElement> ExpressionMut for Matrix<T> {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: T) {
        let cell = row * self.columns() + column;
        self.store.write(cell, value);
    }

    #[inline]
    fn set_index(&mut self, index: usize, value: T) {
        self.store.write(index, value);
    }

    fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        self.resize_with(rows, columns, T::default())
    }
}

impl<T: GridElement> Labeled for Matrix<T> {
    fn labels(&self) -> &NameTable {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut NameTable {
        &mut self.labels
    }
}

impl<T: GridElement> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("path", &self.path())
            .field("rows", &self.rows())
            .field("columns", &self.columns())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::to_vec;
    use crate::Error;
    use mmgrid_core::GridError;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> StorageConfig {
        StorageConfig::with_scratch_dir(dir.path())
    }

    #[test]
    fn test_fresh_matrix_is_filled() {
        let dir = TempDir::new().unwrap();
        for (rows, columns) in [(1, 1), (3, 7), (16, 2), (0, 4)] {
            let m = Matrix::with_config(rows, columns, -2.5f64, config(&dir)).unwrap();
            assert_eq!(m.shape(), (rows, columns));
            assert!(to_vec(&m).iter().all(|&v| v == -2.5));
        }
    }

    #[test]
    fn test_parallel_fill_matches_serial() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir).with_parallel_fill_threshold(8);
        let m = Matrix::with_config(20, 20, 9u32, config).unwrap();
        assert!(to_vec(&m).iter().all(|&v| v == 9));
    }

    #[test]
    fn test_resize_capacity_rules() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(4, 4, 0u8, config(&dir)).unwrap();
        let first = m.path().unwrap().to_path_buf();

        m.resize_with(2, 8, 1).unwrap();
        assert_eq!(m.path().unwrap(), first);
        m.resize_with(1, 3, 1).unwrap();
        assert_eq!(m.path().unwrap(), first);
        assert_eq!(m.capacity(), 16);

        m.resize_with(5, 5, 7).unwrap();
        assert_ne!(m.path().unwrap(), first);
        assert_eq!(m.capacity(), 25);
        assert!(to_vec(&m).iter().all(|&v| v == 7));
    }

    #[test]
    fn test_shallow_and_deep_copies() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(2, 2, 0i64, config(&dir)).unwrap();
        m.set_row_header(0, "first");

        let mut shallow = m.try_clone().unwrap();
        let deep = m.deep_copy().unwrap();
        shallow.set(1, 1, 11);

        assert_eq!(m.at(1, 1), 11);
        assert_eq!(deep.at(1, 1), 0);
        assert_eq!(shallow.path(), m.path());
        assert_ne!(deep.path(), m.path());
        assert_eq!(deep.row_header(0), "first");
        assert_eq!(shallow.row_header(0), "row: 0");
    }

    #[test]
    fn test_unmapped_matrix() {
        let m: Matrix<f32> = Matrix::unmapped();
        assert!(!m.is_valid());
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m.circ_at(1, 1), 0.0);
        assert!(matches!(m.lock(), Err(Error::Unmapped)));
        assert!(m.path().is_none());
    }

    #[test]
    fn test_failed_load_invalidates() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(2, 2, 1u32, config(&dir)).unwrap();
        let bogus = dir.path().join("tiny.grid");
        std::fs::write(&bogus, [0u8; 10]).unwrap();

        let err = m.load(&bogus).unwrap_err();
        assert!(matches!(err, Error::Format(GridError::FileTooSmall)));
        assert!(!m.is_valid());
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = TempDir::new().unwrap();
        let m = Matrix::with_config(2, 2, 1u8, config(&dir)).unwrap();
        let path = m.path().unwrap().to_path_buf();
        assert!(path.exists());
        m.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_lock_guard_cycle() {
        let dir = TempDir::new().unwrap();
        let m = Matrix::with_config(1, 1, 0u8, config(&dir)).unwrap();
        {
            let guard = m.lock_guard().unwrap();
            assert_eq!(guard.status(), LockStatus::Acquired);
        }
        assert_eq!(m.lock().unwrap(), LockStatus::Acquired);
        m.unlock().unwrap();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_read_past_last_row_panics() {
        let dir = TempDir::new().unwrap();
        let m = Matrix::with_config(2, 2, 0u8, config(&dir)).unwrap();
        let _ = m.at(3, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_write_past_last_row_panics() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(2, 2, 0u8, config(&dir)).unwrap();
        m.set(2, 0, 0xAA);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_write_past_shrunk_shape_panics() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(4, 4, 0u8, config(&dir)).unwrap();
        m.resize(2, 2).unwrap();
        assert!(m.capacity() > 4);
        m.set_index(5, 1);
    }

    #[test]
    fn test_rejected_write_leaves_file_loadable() {
        let dir = TempDir::new().unwrap();
        let mut m = Matrix::with_config(2, 2, 3u8, config(&dir)).unwrap();
        let path = m.path().unwrap().to_path_buf();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.set(2, 0, 0xAA);
        }));
        assert!(result.is_err());
        m.set(1, 1, 9);
        m.flush().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[bytes.len() - 16..], b"::----end----::\n");
        let reopened = Matrix::<u8>::open(&path).unwrap();
        assert_eq!(to_vec(&reopened), vec![3, 3, 3, 9]);
    }
}
