use std::rc::Rc;

use crate::expression::{Expression, ExpressionMut};

/// Selection of source rows and/or columns by index list
///
/// An axis without a list passes through unchanged. A listed axis has the
/// list's length, or zero when the source axis is empty. Listed indices are
/// resolved circularly, so negative and out-of-range entries wrap.
#[derive(Debug, Clone)]
pub struct Select<S> {
    source: S,
    rows: Option<Rc<[isize]>>,
    columns: Option<Rc<[isize]>>,
}

impl<S: Expression> Select<S> {
    pub fn new(source: S, rows: Option<Rc<[isize]>>, columns: Option<Rc<[isize]>>) -> Self {
        Self {
            source,
            rows,
            columns,
        }
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
            self.rows.as_ref().map_or(row as isize, |list| list[row]),
            self.columns
                .as_ref()
                .map_or(column as isize, |list| list[column]),
        )
    }
}

fn axis_len(list: Option<&Rc<[isize]>>, source_len: usize) -> usize {
    match list {
        _ if source_len == 0 => 0,
        Some(list) => list.len(),
        None => source_len,
    }
}

impl<S: Expression> Expression for Select<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        axis_len(self.rows.as_ref(), self.source.rows())
    }

    fn columns(&self) -> usize {
        axis_len(self.columns.as_ref(), self.source.columns())
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> S::Elem {
        let (r, c) = self.map(row, column);
        self.source.circ_at(r, c)
    }
}

impl<S: ExpressionMut> ExpressionMut for Select<S> {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: S::Elem) {
        let (r, c) = self.map(row, column);
        self.source.circ_set(r, c, value);
    }
}
