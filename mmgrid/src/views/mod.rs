//! Zero-copy derived grids
//!
//! Every view wraps its source(s) by value and recomputes its geometry from
//! them on each query, so a view over a [`Shared`](crate::Shared) handle sees
//! resizes of the underlying grid immediately. To view a grid without giving
//! it up, wrap a reference (`transpose(&array)`) or a shared handle.
//!
//! A view is writable exactly when its source is: `Transpose<&Array<T>>` is
//! read-only, `Transpose<&mut Array<T>>` forwards writes.
//!
//! ```
//! use mmgrid::views::{BorderMode, ViewExt};
//! use mmgrid::{Array, Expression};
//!
//! let grid = Array::from_fn(5, 5, |r, c| (r * 5 + c) as i32);
//! let view = (&grid)
//!     .roi(1, 1, 3, 3)
//!     .transpose()
//!     .border(1, 1, 1, 1, BorderMode::Constant(-1));
//!
//! assert_eq!(view.shape(), (5, 5));
//! assert_eq!(view.at(0, 0), -1);
//! assert_eq!(view.at(1, 2), grid.at(2, 1));
//! ```

use std::rc::Rc;

use crate::expression::{Expression, Expression3d};

mod augment;
mod border;
mod page;
mod permute;
mod roi;
mod select;
mod transpose;

pub use augment::{AugmentColumns, AugmentRows};
pub use border::{Border, BorderMode};
pub use page::Page;
pub use permute::{Permute, SortOrder};
pub use roi::Roi;
pub use select::Select;
pub use transpose::Transpose;

/// Region between two inclusive corners, read circularly
pub fn roi<S: Expression>(source: S, row1: isize, column1: isize, row2: isize, column2: isize) -> Roi<S> {
    Roi::new(source, row1, column1, row2, column2)
}

pub fn transpose<S: Expression>(source: S) -> Transpose<S> {
    Transpose::new(source)
}

/// Rows and columns picked by index lists
pub fn select<S, R, C>(source: S, rows: R, columns: C) -> Select<S>
where
    S: Expression,
    R: Into<Rc<[isize]>>,
    C: Into<Rc<[isize]>>,
{
    Select::new(source, Some(rows.into()), Some(columns.into()))
}

pub fn select_rows<S: Expression, R: Into<Rc<[isize]>>>(source: S, rows: R) -> Select<S> {
    Select::new(source, Some(rows.into()), None)
}

pub fn select_columns<S: Expression, C: Into<Rc<[isize]>>>(source: S, columns: C) -> Select<S> {
    Select::new(source, None, Some(columns.into()))
}

/// A single row as a `1 x columns` grid
pub fn select_row<S: Expression>(source: S, row: isize) -> Select<S> {
    select_rows(source, [row])
}

/// A single column as a `rows x 1` grid
pub fn select_column<S: Expression>(source: S, column: isize) -> Select<S> {
    select_columns(source, [column])
}

pub fn border<S: Expression>(
    source: S,
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
    mode: BorderMode<S::Elem>,
) -> Border<S> {
    Border::new(source, top, left, bottom, right, mode)
}

/// Constant-value padding on every side
pub fn pad<S: Expression>(source: S, width: usize, value: S::Elem) -> Border<S> {
    Border::new(source, width, width, width, width, BorderMode::Constant(value))
}

pub fn augment_columns<A, B>(left: A, right: B) -> AugmentColumns<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    AugmentColumns::new(left, right)
}

pub fn augment_rows<A, B>(top: A, bottom: B) -> AugmentRows<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    AugmentRows::new(top, bottom)
}

pub fn reverse_rows<S: Expression>(source: S) -> Permute<S> {
    Permute::reverse_rows(source)
}

pub fn reverse_columns<S: Expression>(source: S) -> Permute<S> {
    Permute::reverse_columns(source)
}

pub fn shuffle_rows<S: Expression>(source: S, seed: u64) -> Permute<S> {
    Permute::shuffle_rows(source, seed)
}

pub fn shuffle_columns<S: Expression>(source: S, seed: u64) -> Permute<S> {
    Permute::shuffle_columns(source, seed)
}

pub fn sort_columns_by_row<S>(source: S, row: usize, order: SortOrder) -> Permute<S>
where
    S: Expression,
    S::Elem: PartialOrd,
{
    Permute::sort_columns_by_row(source, row, order)
}

pub fn sort_rows_by_column<S>(source: S, column: usize, order: SortOrder) -> Permute<S>
where
    S: Expression,
    S::Elem: PartialOrd,
{
    Permute::sort_rows_by_column(source, column, order)
}

/// One page of a 3-D grid, wrapped modulo the page count
pub fn page<S: Expression3d>(source: S, page: isize) -> Page<S> {
    Page::new(source, page)
}

/// Every view as a chainable combinator
pub trait ViewExt: Expression + Sized {
    fn roi(self, row1: isize, column1: isize, row2: isize, column2: isize) -> Roi<Self> {
        roi(self, row1, column1, row2, column2)
    }

    fn transpose(self) -> Transpose<Self> {
        transpose(self)
    }

    fn select<R: Into<Rc<[isize]>>, C: Into<Rc<[isize]>>>(self, rows: R, columns: C) -> Select<Self> {
        select(self, rows, columns)
    }

    fn select_rows<R: Into<Rc<[isize]>>>(self, rows: R) -> Select<Self> {
        select_rows(self, rows)
    }

    fn select_columns<C: Into<Rc<[isize]>>>(self, columns: C) -> Select<Self> {
        select_columns(self, columns)
    }

    fn select_row(self, row: isize) -> Select<Self> {
        select_row(self, row)
    }

    fn select_column(self, column: isize) -> Select<Self> {
        select_column(self, column)
    }

    fn border(
        self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        mode: BorderMode<Self::Elem>,
    ) -> Border<Self> {
        border(self, top, left, bottom, right, mode)
    }

    fn pad(self, width: usize, value: Self::Elem) -> Border<Self> {
        pad(self, width, value)
    }

    fn augment_columns<B: Expression<Elem = Self::Elem>>(self, right: B) -> AugmentColumns<Self, B> {
        augment_columns(self, right)
    }

    fn augment_rows<B: Expression<Elem = Self::Elem>>(self, bottom: B) -> AugmentRows<Self, B> {
        augment_rows(self, bottom)
    }

    fn reverse_rows(self) -> Permute<Self> {
        reverse_rows(self)
    }

    fn reverse_columns(self) -> Permute<Self> {
        reverse_columns(self)
    }

    fn shuffle_rows(self, seed: u64) -> Permute<Self> {
        shuffle_rows(self, seed)
    }

    fn shuffle_columns(self, seed: u64) -> Permute<Self> {
        shuffle_columns(self, seed)
    }

    fn sort_columns_by_row(self, row: usize, order: SortOrder) -> Permute<Self>
    where
        Self::Elem: PartialOrd,
    {
        sort_columns_by_row(self, row, order)
    }

    fn sort_rows_by_column(self, column: usize, order: SortOrder) -> Permute<Self>
    where
        Self::Elem: PartialOrd,
    {
        sort_rows_by_column(self, column, order)
    }
}

impl<E: Expression> ViewExt for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;
    use crate::shared::Shared;
    use crate::ExpressionMut;

    #[test]
    fn test_chained_views_over_shared() {
        let grid = Shared::new(Array::from_fn(4, 4, |r, c| (r * 4 + c) as i32));
        let mut view = grid.clone().transpose().reverse_rows().select_row(0);

        // row 0 of the reversed transpose is the last source column
        assert_eq!(crate::to_vec(&view), vec![3, 7, 11, 15]);

        view.set(0, 1, -7);
        assert_eq!(grid.at(1, 3), -7);
    }

    #[test]
    fn test_views_follow_source_resize() {
        let grid = Shared::new(Array::new(2, 2, 1u8));
        let view = grid.clone().augment_columns(grid.clone());
        assert_eq!(view.shape(), (2, 4));

        grid.borrow_mut().unwrap().resize_with(3, 2, 2);
        assert_eq!(view.shape(), (3, 4));
        assert_eq!(view.at(2, 3), 2);
    }

    #[test]
    fn test_pad() {
        let grid = Array::new(1, 1, 5u16);
        let padded = (&grid).pad(2, 0);
        assert_eq!(padded.shape(), (5, 5));
        assert_eq!(padded.at(2, 2), 5);
        assert_eq!(crate::to_vec(&padded).iter().filter(|&&v| v == 0).count(), 24);
    }
}
