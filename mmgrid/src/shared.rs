//! Shared references to grids
//!
//! A [`Shared`] handle lets several owners (views, other handles, the caller)
//! reach the same underlying grid. Cloning a handle is O(1) and never copies
//! cells. [`SharedConst`] is the read-only flavour: it implements the read
//! traits only, so writing through it does not compile.
//!
//! Both handles may be empty. An empty handle reports a `0 x 0` shape and
//! reads yield the zero sentinel.
//!
//! Handles are single-threaded (`Rc`). Writes take a momentary `RefCell`
//! borrow per cell, so evaluating a view of a grid into a handle of that same
//! grid does not panic; element-wise aliasing semantics apply.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::expression::{Expression, Expression3d, Expression3dMut, ExpressionMut};
use crate::Result;

/// Mutable shared reference to a grid
pub struct Shared<E> {
    inner: Option<Rc<RefCell<E>>>,
}

/// Read-only shared reference to a grid
pub struct SharedConst<E> {
    inner: Option<Rc<RefCell<E>>>,
}

impl<E> Shared<E> {
    /// Take ownership of `grid` and share it
    pub fn new(grid: E) -> Self {
        Self {
            inner: Some(Rc::new(RefCell::new(grid))),
        }
    }

    /// A handle that references nothing
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of handles (of either flavour) referencing the same grid
    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    /// Whether both handles reference the same grid
    pub fn ptr_eq(&self, other: &Self) -> bool {
        same(&self.inner, &other.inner)
    }

    /// Borrow the grid; `None` on an empty handle
    pub fn borrow(&self) -> Option<Ref<'_, E>> {
        self.inner.as_ref().map(|cell| cell.borrow())
    }

    /// Borrow the grid mutably; `None` on an empty handle
    ///
    /// # Panics
    ///
    /// Panics if the grid is already borrowed.
    pub fn borrow_mut(&self) -> Option<RefMut<'_, E>> {
        self.inner.as_ref().map(|cell| cell.borrow_mut())
    }

    /// Read-only handle to the same grid
    pub fn to_const(&self) -> SharedConst<E> {
        SharedConst {
            inner: self.inner.clone(),
        }
    }
}

impl<E> SharedConst<E> {
    pub fn new(grid: E) -> Self {
        Shared::new(grid).into()
    }

    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        same(&self.inner, &other.inner)
    }

    pub fn borrow(&self) -> Option<Ref<'_, E>> {
        self.inner.as_ref().map(|cell| cell.borrow())
    }
}

impl<E: ExpressionMut> SharedConst<E> {
    /// Recover a mutable handle. Only available when the referenced grid
    /// type is itself writable.
    pub fn assume_mutable(self) -> Shared<E> {
        Shared { inner: self.inner }
    }
}

impl<E> From<Shared<E>> for SharedConst<E> {
    fn from(shared: Shared<E>) -> Self {
        Self {
            inner: shared.inner,
        }
    }
}

fn same<E>(a: &Option<Rc<RefCell<E>>>, b: &Option<Rc<RefCell<E>>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

macro_rules! impl_handle_common {
    ($handle:ident) => {
        impl<E> Clone for $handle<E> {
            fn clone(&self) -> Self {
                Self {
                    inner: self.inner.clone(),
                }
            }
        }

        impl<E> Default for $handle<E> {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl<E: fmt::Debug> fmt::Debug for $handle<E> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.inner {
                    Some(cell) => f.debug_tuple(stringify!($handle)).field(&*cell.borrow()).finish(),
                    None => f.write_str(concat!(stringify!($handle), "(empty)")),
                }
            }
        }

        impl<E: Expression> Expression for $handle<E> {
            type Elem = E::Elem;

            fn rows(&self) -> usize {
                self.inner.as_ref().map_or(0, |cell| cell.borrow().rows())
            }

            fn columns(&self) -> usize {
                self.inner.as_ref().map_or(0, |cell| cell.borrow().columns())
            }

            fn at(&self, row: usize, column: usize) -> E::Elem {
                match &self.inner {
                    Some(cell) => cell.borrow().at(row, column),
                    None => E::Elem::default(),
                }
            }

            fn at_index(&self, index: usize) -> E::Elem {
                match &self.inner {
                    Some(cell) => cell.borrow().at_index(index),
                    None => E::Elem::default(),
                }
            }
        }

        impl<E: Expression3d> Expression3d for $handle<E> {
            type Elem = E::Elem;

            fn pages(&self) -> usize {
                self.inner.as_ref().map_or(0, |cell| cell.borrow().pages())
            }

            fn rows(&self) -> usize {
                self.inner
                    .as_ref()
                    .map_or(0, |cell| Expression3d::rows(&*cell.borrow()))
            }

            fn columns(&self) -> usize {
                self.inner
                    .as_ref()
                    .map_or(0, |cell| Expression3d::columns(&*cell.borrow()))
            }

            fn at(&self, page: usize, row: usize, column: usize) -> E::Elem {
                match &self.inner {
                    Some(cell) => Expression3d::at(&*cell.borrow(), page, row, column),
                    None => E::Elem::default(),
                }
            }

            fn at_index(&self, index: usize) -> E::Elem {
                match &self.inner {
                    Some(cell) => Expression3d::at_index(&*cell.borrow(), index),
                    None => E::Elem::default(),
                }
            }
        }
    };
}

impl_handle_common!(Shared);
impl_handle_common!(SharedConst);

impl<E: ExpressionMut> ExpressionMut for Shared<E> {
    fn set(&mut self, row: usize, column: usize, value: E::Elem) {
        if let Some(cell) = &self.inner {
            cell.borrow_mut().set(row, column, value);
        }
    }

    fn set_index(&mut self, index: usize, value: E::Elem) {
        if let Some(cell) = &self.inner {
            cell.borrow_mut().set_index(index, value);
        }
    }

    /// Resizes the referenced grid; a no-op success on an empty handle
    /// asked for `0 x 0`.
    fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        match &self.inner {
            Some(cell) => cell.borrow_mut().resize(rows, columns),
            None if rows == 0 || columns == 0 => Ok(()),
            None => Err(crate::Error::NotSupported("empty handle cannot be resized")),
        }
    }
}

impl<E: Expression3dMut> Expression3dMut for Shared<E> {
    fn set(&mut self, page: usize, row: usize, column: usize, value: E::Elem) {
        if let Some(cell) = &self.inner {
            Expression3dMut::set(&mut *cell.borrow_mut(), page, row, column, value);
        }
    }

    fn resize(&mut self, pages: usize, rows: usize, columns: usize) -> Result<()> {
        match &self.inner {
            Some(cell) => Expression3dMut::resize(&mut *cell.borrow_mut(), pages, rows, columns),
            None if pages == 0 || rows == 0 || columns == 0 => Ok(()),
            None => Err(crate::Error::NotSupported("empty handle cannot be resized")),
        }
    }
}
