//! In-memory leaf storage
//!
//! [`Array`] and [`Array3d`] own a flat row-major `Vec`. They are the
//! in-process counterparts of the memory-mapped [`Matrix`](crate::Matrix)
//! and [`Matrix3d`](crate::Matrix3d). Resizing keeps the flat buffer and
//! initialises only cells past the previous element count, like an in-place
//! resize of a persistent grid.

use mmgrid_core::{GridElement, GridError};

use crate::expression::{Expression, Expression3d, Expression3dMut, ExpressionMut};
use crate::labels::{Labeled, NameTable};
use crate::Result;

/// Dense 2-D grid held in memory. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T: GridElement> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
    labels: NameTable,
}

impl<T: GridElement> Array<T> {
    /// Create a `rows x columns` grid with every cell set to `fill`
    pub fn new(rows: usize, columns: usize, fill: T) -> Self {
        Self {
            rows,
            columns,
            data: vec![fill; rows * columns],
            labels: NameTable::new(),
        }
    }

    /// Wrap row-major `data`; its length must be `rows * columns`
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        if rows.checked_mul(columns) != Some(data.len()) {
            return Err(GridError::ShapeMismatch.into());
        }
        Ok(Self {
            rows,
            columns,
            data,
            labels: NameTable::new(),
        })
    }

    /// Create a grid whose cell `(r, c)` is `f(r, c)`
    pub fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                data.push(f(row, column));
            }
        }
        Self {
            rows,
            columns,
            data,
            labels: NameTable::new(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Reshape to `rows x columns`; cells past the old element count get `fill`
    pub fn resize_with(&mut self, rows: usize, columns: usize, fill: T) {
        self.data.resize(rows * columns, fill);
        self.rows = rows;
        self.columns = columns;
    }
}

impl<T: GridElement> Default for Array<T> {
    fn default() -> Self {
        Self::new(0, 0, T::default())
    }
}

impl<T: GridElement> Expression for Array<T> {
    type Elem = T;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> T {
        self.data[row * self.columns + column]
    }

    #[inline]
    fn at_index(&self, index: usize) -> T {
        self.data[index]
    }
}

impl<T: GridElement> ExpressionMut for Array<T> {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: T) {
        self.data[row * self.columns + column] = value;
    }

    #[inline]
    fn set_index(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        self.resize_with(rows, columns, T::default());
        Ok(())
    }
}

impl<T: GridElement> Labeled for Array<T> {
    fn labels(&self) -> &NameTable {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut NameTable {
        &mut self.labels
    }
}

/// Dense 3-D grid held in memory, indexed `page*rows*columns + row*columns + column`
#[derive(Debug, Clone, PartialEq)]
pub struct Array3d<T: GridElement> {
    pages: usize,
    rows: usize,
    columns: usize,
    data: Vec<T>,
    labels: NameTable,
}

impl<T: GridElement> Array3d<T> {
    pub fn new(pages: usize, rows: usize, columns: usize, fill: T) -> Self {
        Self {
            pages,
            rows,
            columns,
            data: vec![fill; pages * rows * columns],
            labels: NameTable::new(),
        }
    }

    pub fn from_vec(pages: usize, rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        let cells = pages.checked_mul(rows).and_then(|p| p.checked_mul(columns));
        if cells != Some(data.len()) {
            return Err(GridError::ShapeMismatch.into());
        }
        Ok(Self {
            pages,
            rows,
            columns,
            data,
            labels: NameTable::new(),
        })
    }

    pub fn from_fn<F>(pages: usize, rows: usize, columns: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(pages * rows * columns);
        for page in 0..pages {
            for row in 0..rows {
                for column in 0..columns {
                    data.push(f(page, row, column));
                }
            }
        }
        Self {
            pages,
            rows,
            columns,
            data,
            labels: NameTable::new(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn resize_with(&mut self, pages: usize, rows: usize, columns: usize, fill: T) {
        self.data.resize(pages * rows * columns, fill);
        self.pages = pages;
        self.rows = rows;
        self.columns = columns;
    }

    #[inline]
    fn offset(&self, page: usize, row: usize, column: usize) -> usize {
        (page * self.rows + row) * self.columns + column
    }
}

impl<T: GridElement> Expression3d for Array3d<T> {
    type Elem = T;

    fn pages(&self) -> usize {
        self.pages
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn at(&self, page: usize, row: usize, column: usize) -> T {
        self.data[self.offset(page, row, column)]
    }

    #[inline]
    fn at_index(&self, index: usize) -> T {
        self.data[index]
    }
}

impl<T: GridElement> Expression3dMut for Array3d<T> {
    #[inline]
    fn set(&mut self, page: usize, row: usize, column: usize, value: T) {
        let offset = self.offset(page, row, column);
        self.data[offset] = value;
    }

    fn resize(&mut self, pages: usize, rows: usize, columns: usize) -> Result<()> {
        self.resize_with(pages, rows, columns, T::default());
        Ok(())
    }
}

impl<T: GridElement> Labeled for Array3d<T> {
    fn labels(&self) -> &NameTable {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut NameTable {
        &mut self.labels
    }
}
