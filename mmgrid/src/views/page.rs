use mmgrid_core::wrap_index;

use crate::expression::{Expression, Expression3d, Expression3dMut, ExpressionMut};

/// One page of a 3-D source as a 2-D grid
///
/// The page index is signed and wraps modulo the source's page count.
#[derive(Debug, Clone)]
pub struct Page<S> {
    source: S,
    page: isize,
}

impl<S: Expression3d> Page<S> {
    pub fn new(source: S, page: isize) -> Self {
        Self { source, page }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn resolved(&self) -> Option<usize> {
        match self.source.pages() {
            0 => None,
            pages => Some(wrap_index(self.page, pages)),
        }
    }
}

impl<S: Expression3d> Expression for Page<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        match self.source.pages() {
            0 => 0,
            _ => Expression3d::rows(&self.source),
        }
    }

    fn columns(&self) -> usize {
        match self.source.pages() {
            0 => 0,
            _ => Expression3d::columns(&self.source),
        }
    }

    fn at(&self, row: usize, column: usize) -> S::Elem {
        match self.resolved() {
            Some(page) => Expression3d::at(&self.source, page, row, column),
            None => S::Elem::default(),
        }
    }
}

impl<S: Expression3dMut> ExpressionMut for Page<S> {
    fn set(&mut self, row: usize, column: usize, value: S::Elem) {
        if let Some(page) = self.resolved() {
            Expression3dMut::set(&mut self.source, page, row, column, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array3d;
    use crate::views::page;

    #[test]
    fn test_page_wraps() {
        let cube = Array3d::from_fn(3, 2, 2, |p, r, c| (p * 100 + r * 10 + c) as i32);
        let last = page(&cube, -1);
        assert_eq!(last.shape(), (2, 2));
        assert_eq!(last.at(1, 1), 211);
        assert_eq!(page(&cube, 4).at(0, 1), 101);
    }

    #[test]
    fn test_page_write() {
        let mut cube = Array3d::new(2, 2, 2, 0u8);
        page(&mut cube, 1).set(0, 1, 3);
        assert_eq!(Expression3d::at(&cube, 1, 0, 1), 3);
    }
}
