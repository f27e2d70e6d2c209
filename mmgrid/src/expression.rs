//! The grid access contract
//!
//! Every grid-like object, whether it owns storage (a leaf) or computes its
//! cells from other grids (a view), implements [`Expression`] (2-D) or
//! [`Expression3d`] (3-D). Writable grids additionally implement
//! [`ExpressionMut`] / [`Expression3dMut`]. Mutability is therefore decided by
//! the concrete type at compile time: a view over a read-only source never
//! gains a write method.
//!
//! `at` requires in-range coordinates. `circ_at` accepts any signed
//! coordinate and reduces it modulo the current shape, so it is always in
//! range; on an empty grid it returns the zero sentinel.

use mmgrid_core::{wrap_index, GridElement};

use crate::{Error, Result};

/// Read access to a 2-D grid
pub trait Expression {
    /// Element type
    type Elem: GridElement;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// Number of cells
    fn size(&self) -> usize {
        self.rows() * self.columns()
    }

    /// `(rows, columns)`
    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at `(row, column)`; the caller guarantees bounds
    fn at(&self, row: usize, column: usize) -> Self::Elem;

    /// Element at a row-major linear index; the caller guarantees bounds
    fn at_index(&self, index: usize) -> Self::Elem {
        let columns = self.columns();
        self.at(index / columns, index % columns)
    }

    /// Element at `(row, column)` wrapped modulo the shape
    fn circ_at(&self, row: isize, column: isize) -> Self::Elem {
        let (rows, columns) = self.shape();
        if rows == 0 || columns == 0 {
            return Self::Elem::default();
        }
        self.at(wrap_index(row, rows), wrap_index(column, columns))
    }

    /// Element at a linear index wrapped modulo the size
    fn circ_at_index(&self, index: isize) -> Self::Elem {
        let size = self.size();
        if size == 0 {
            return Self::Elem::default();
        }
        self.at_index(wrap_index(index, size))
    }
}

/// Write access to a 2-D grid
pub trait ExpressionMut: Expression {
    /// Store `value` at `(row, column)`; the caller guarantees bounds
    fn set(&mut self, row: usize, column: usize, value: Self::Elem);

    fn set_index(&mut self, index: usize, value: Self::Elem) {
        let columns = self.columns();
        self.set(index / columns, index % columns, value);
    }

    /// Store `value` at `(row, column)` wrapped modulo the shape.
    /// Does nothing on an empty grid.
    fn circ_set(&mut self, row: isize, column: isize, value: Self::Elem) {
        let (rows, columns) = self.shape();
        if rows == 0 || columns == 0 {
            return;
        }
        self.set(wrap_index(row, rows), wrap_index(column, columns), value);
    }

    fn circ_set_index(&mut self, index: isize, value: Self::Elem) {
        let size = self.size();
        if size == 0 {
            return;
        }
        self.set_index(wrap_index(index, size), value);
    }

    /// Change the shape. Grids with fixed geometry accept only their current
    /// shape and report `NotSupported` otherwise.
    fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        if self.shape() == (rows, columns) {
            Ok(())
        } else {
            Err(Error::NotSupported("grid geometry is fixed"))
        }
    }
}

/// Read access to a 3-D grid
pub trait Expression3d {
    /// Element type
    type Elem: GridElement;

    fn pages(&self) -> usize;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    fn size(&self) -> usize {
        self.pages() * self.rows() * self.columns()
    }

    /// `(pages, rows, columns)`
    fn shape(&self) -> (usize, usize, usize) {
        (self.pages(), self.rows(), self.columns())
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at `(page, row, column)`; the caller guarantees bounds
    fn at(&self, page: usize, row: usize, column: usize) -> Self::Elem;

    /// Element at linear index `page*rows*columns + row*columns + column`
    fn at_index(&self, index: usize) -> Self::Elem {
        let (_, rows, columns) = self.shape();
        let plane = rows * columns;
        let within = index % plane;
        self.at(index / plane, within / columns, within % columns)
    }

    fn circ_at(&self, page: isize, row: isize, column: isize) -> Self::Elem {
        let (pages, rows, columns) = self.shape();
        if pages == 0 || rows == 0 || columns == 0 {
            return Self::Elem::default();
        }
        self.at(
            wrap_index(page, pages),
            wrap_index(row, rows),
            wrap_index(column, columns),
        )
    }

    fn circ_at_index(&self, index: isize) -> Self::Elem {
        let size = self.size();
        if size == 0 {
            return Self::Elem::default();
        }
        self.at_index(wrap_index(index, size))
    }
}

/// Write access to a 3-D grid
pub trait Expression3dMut: Expression3d {
    fn set(&mut self, page: usize, row: usize, column: usize, value: Self::Elem);

    fn set_index(&mut self, index: usize, value: Self::Elem) {
        let (_, rows, columns) = self.shape();
        let plane = rows * columns;
        let within = index % plane;
        self.set(index / plane, within / columns, within % columns, value);
    }

    fn circ_set(&mut self, page: isize, row: isize, column: isize, value: Self::Elem) {
        let (pages, rows, columns) = self.shape();
        if pages == 0 || rows == 0 || columns == 0 {
            return;
        }
        self.set(
            wrap_index(page, pages),
            wrap_index(row, rows),
            wrap_index(column, columns),
            value,
        );
    }

    fn resize(&mut self, pages: usize, rows: usize, columns: usize) -> Result<()> {
        if self.shape() == (pages, rows, columns) {
            Ok(())
        } else {
            Err(Error::NotSupported("grid geometry is fixed"))
        }
    }
}

macro_rules! impl_by_reference {
    ($($reference:ty),*) => {$(
        impl<E: Expression + ?Sized> Expression for $reference {
            type Elem = E::Elem;

            fn rows(&self) -> usize {
                (**self).rows()
            }

            fn columns(&self) -> usize {
                (**self).columns()
            }

            #[inline]
            fn at(&self, row: usize, column: usize) -> E::Elem {
                (**self).at(row, column)
            }

            #[inline]
            fn at_index(&self, index: usize) -> E::Elem {
                (**self).at_index(index)
            }
        }

        impl<E: Expression3d + ?Sized> Expression3d for $reference {
            type Elem = E::Elem;

            fn pages(&self) -> usize {
                (**self).pages()
            }

            fn rows(&self) -> usize {
                Expression3d::rows(&**self)
            }

            fn columns(&self) -> usize {
                Expression3d::columns(&**self)
            }

            #[inline]
            fn at(&self, page: usize, row: usize, column: usize) -> E::Elem {
                Expression3d::at(&**self, page, row, column)
            }

            #[inline]
            fn at_index(&self, index: usize) -> E::Elem {
                Expression3d::at_index(&**self, index)
            }
        }
    )*};
}

impl_by_reference!(&E, &mut E);

impl<E: ExpressionMut + ?Sized> ExpressionMut for &mut E {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: E::Elem) {
        (**self).set(row, column, value);
    }

    #[inline]
    fn set_index(&mut self, index: usize, value: E::Elem) {
        (**self).set_index(index, value);
    }

    fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        (**self).resize(rows, columns)
    }
}

impl<E: Expression3dMut + ?Sized> Expression3dMut for &mut E {
    #[inline]
    fn set(&mut self, page: usize, row: usize, column: usize, value: E::Elem) {
        Expression3dMut::set(&mut **self, page, row, column, value);
    }

    #[inline]
    fn set_index(&mut self, index: usize, value: E::Elem) {
        Expression3dMut::set_index(&mut **self, index, value);
    }

    fn resize(&mut self, pages: usize, rows: usize, columns: usize) -> Result<()> {
        Expression3dMut::resize(&mut **self, pages, rows, columns)
    }
}

/// Resize `destination` to the shape of `source` and copy every cell
///
/// Capability is checked by the compiler: a read-only destination does not
/// implement [`ExpressionMut`].
///
/// ```compile_fail
/// use mmgrid::{evaluate, Array, Shared, SharedConst};
///
/// let source = Array::new(2, 2, 1.0f64);
/// let mut target: SharedConst<Array<f64>> = Shared::new(Array::new(0, 0, 0.0)).into();
/// evaluate(&source, &mut target).unwrap();
/// ```
///
/// A fixed-geometry destination of a different shape fails with
/// [`Error::NotSupported`] before any cell is written.
pub fn evaluate<S, D>(source: &S, destination: &mut D) -> Result<()>
where
    S: Expression,
    D: ExpressionMut<Elem = S::Elem>,
{
    let (rows, columns) = source.shape();
    destination.resize(rows, columns)?;
    for row in 0..rows {
        for column in 0..columns {
            destination.set(row, column, source.at(row, column));
        }
    }
    Ok(())
}

/// 3-D counterpart of [`evaluate`]
pub fn evaluate3d<S, D>(source: &S, destination: &mut D) -> Result<()>
where
    S: Expression3d,
    D: Expression3dMut<Elem = S::Elem>,
{
    let (pages, rows, columns) = source.shape();
    destination.resize(pages, rows, columns)?;
    for page in 0..pages {
        for row in 0..rows {
            for column in 0..columns {
                destination.set(page, row, column, source.at(page, row, column));
            }
        }
    }
    Ok(())
}

/// Materialise any expression row-major
pub fn to_vec<S: Expression>(source: &S) -> Vec<S::Elem> {
    let (rows, columns) = source.shape();
    let mut values = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        for column in 0..columns {
            values.push(source.at(row, column));
        }
    }
    values
}
