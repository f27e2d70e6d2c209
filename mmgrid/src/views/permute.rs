use std::cmp::Ordering;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::expression::{Expression, ExpressionMut};

/// Direction of a sorted view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Reorders source rows and/or columns through fixed permutations
///
/// Permutations are computed once, at construction. Shape always follows
/// the source; indices past the end of a permutation map to themselves and
/// every lookup reads the source circularly.
#[derive(Debug, Clone)]
pub struct Permute<S> {
    source: S,
    rows: Option<Rc<[usize]>>,
    columns: Option<Rc<[usize]>>,
}

impl<S: Expression> Permute<S> {
    pub fn new(source: S, rows: Option<Rc<[usize]>>, columns: Option<Rc<[usize]>>) -> Self {
        Self {
            source,
            rows,
            columns,
        }
    }

    /// Rows in reverse order
    pub fn reverse_rows(source: S) -> Self {
        let order = (0..source.rows()).rev().collect();
        Self::new(source, Some(order), None)
    }

    /// Columns in reverse order
    pub fn reverse_columns(source: S) -> Self {
        let order = (0..source.columns()).rev().collect();
        Self::new(source, None, Some(order))
    }

    /// Rows in a random order that depends only on `seed`
    pub fn shuffle_rows(source: S, seed: u64) -> Self {
        let order = shuffled(source.rows(), seed);
        Self::new(source, Some(order), None)
    }

    /// Columns in a random order that depends only on `seed`
    pub fn shuffle_columns(source: S, seed: u64) -> Self {
        let order = shuffled(source.columns(), seed);
        Self::new(source, None, Some(order))
    }

    /// Columns reordered by a stable sort of the values in `row`
    pub fn sort_columns_by_row(source: S, row: usize, order: SortOrder) -> Self
    where
        S::Elem: PartialOrd,
    {
        let keys: Vec<S::Elem> = (0..source.columns())
            .map(|column| source.circ_at(row as isize, column as isize))
            .collect();
        let permutation = sorted(&keys, order);
        Self::new(source, None, Some(permutation))
    }

    /// Rows reordered by a stable sort of the values in `column`
    pub fn sort_rows_by_column(source: S, column: usize, order: SortOrder) -> Self
    where
        S::Elem: PartialOrd,
    {
        let keys: Vec<S::Elem> = (0..source.rows())
            .map(|row| source.circ_at(row as isize, column as isize))
            .collect();
        let permutation = sorted(&keys, order);
        Self::new(source, Some(permutation), None)
    }

    pub fn row_order(&self) -> Option<&[usize]> {
        self.rows.as_deref()
    }

    pub fn column_order(&self) -> Option<&[usize]> {
        self.columns.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    #[inline]
    fn map(&self, row: usize, column: usize) -> (isize, isize) {
        (
            lookup(self.rows.as_deref(), row),
            lookup(self.columns.as_deref(), column),
        )
    }
}

#[inline]
fn lookup(order: Option<&[usize]>, index: usize) -> isize {
    order
        .and_then(|order| order.get(index))
        .copied()
        .unwrap_or(index) as isize
}

fn shuffled(len: usize, seed: u64) -> Rc<[usize]> {
    let mut order: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order.into()
}

/// Stable sort permutation of `keys`. Values that are not comparable with
/// themselves (NaN) sort after all others in either order.
fn sorted<T: PartialOrd>(keys: &[T], order: SortOrder) -> Rc<[usize]> {
    let mut permutation: Vec<usize> = (0..keys.len()).collect();
    permutation.sort_by(|&a, &b| {
        let (a, b) = (&keys[a], &keys[b]);
        match (a.partial_cmp(a).is_some(), b.partial_cmp(b).is_some()) {
            (true, true) => {
                let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    });
    permutation.into()
}

impl<S: Expression> Expression for Permute<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        self.source.rows()
    }

    fn columns(&self) -> usize {
        self.source.columns()
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> S::Elem {
        let (r, c) = self.map(row, column);
        self.source.circ_at(r, c)
    }
}

impl<S: ExpressionMut> ExpressionMut for Permute<S> {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: S::Elem) {
        let (r, c) = self.map(row, column);
        self.source.circ_set(r, c, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;
    use crate::views::{
        reverse_columns, reverse_rows, shuffle_rows, sort_columns_by_row, sort_rows_by_column,
    };

    #[test]
    fn test_reverse() {
        let src = Array::from_fn(3, 2, |r, c| (r * 2 + c) as u8);
        assert_eq!(crate::to_vec(&reverse_rows(&src)), vec![4, 5, 2, 3, 0, 1]);
        assert_eq!(crate::to_vec(&reverse_columns(&src)), vec![1, 0, 3, 2, 5, 4]);
    }

    #[test]
    fn test_shuffle_is_stable_and_seeded() {
        let src = Array::from_fn(32, 1, |r, _| r as u32);
        let a = shuffle_rows(&src, 7);
        let b = shuffle_rows(&src, 7);

        let first = crate::to_vec(&a);
        assert_eq!(first, crate::to_vec(&a));
        assert_eq!(first, crate::to_vec(&b));

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, src.as_slice());
    }

    #[test]
    fn test_sort_columns_stable() {
        // row 0 drives the order; ties keep source order
        let src = Array::from_vec(2, 4, vec![3.0, 1.0, 3.0, 2.0, 10.0, 11.0, 12.0, 13.0]).unwrap();
        let view = sort_columns_by_row(&src, 0, SortOrder::Ascending);
        assert_eq!(view.column_order(), Some(&[1, 3, 0, 2][..]));
        assert_eq!(crate::to_vec(&view), vec![1.0, 2.0, 3.0, 3.0, 11.0, 13.0, 10.0, 12.0]);

        let view = sort_columns_by_row(&src, 0, SortOrder::Descending);
        assert_eq!(view.column_order(), Some(&[0, 2, 3, 1][..]));
    }

    #[test]
    fn test_sort_rows_with_nan() {
        let src = Array::from_vec(3, 1, vec![2.0f64, f64::NAN, 1.0]).unwrap();
        let view = sort_rows_by_column(&src, 0, SortOrder::Ascending);
        assert_eq!(view.row_order(), Some(&[2, 0, 1][..]));

        let view = sort_rows_by_column(&src, 0, SortOrder::Descending);
        assert_eq!(view.row_order(), Some(&[0, 2, 1][..]));
    }

    #[test]
    fn test_permutation_past_end_is_identity() {
        let src = crate::Shared::new(Array::from_fn(2, 2, |r, c| (r * 2 + c) as i32));
        let view = reverse_rows(src.clone());
        src.borrow_mut().unwrap().resize_with(3, 2, 9);
        assert_eq!(view.rows(), 3);
        assert_eq!(view.at(0, 0), 2);
        assert_eq!(view.at(2, 0), 9);
    }
}
