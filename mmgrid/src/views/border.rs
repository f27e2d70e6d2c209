use mmgrid_core::clamp_index;

use crate::expression::{Expression, ExpressionMut};

/// What a [`Border`] view reports outside its source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    /// Clamp to the nearest edge cell
    Repeat,
    /// A fixed value
    Constant(T),
}

/// Pads a source with `top`, `left`, `bottom` and `right` border cells
///
/// View cell `(top, left)` is source cell `(0, 0)`. Cells outside the source
/// resolve through the [`BorderMode`]. Writes to such cells are discarded
/// in either mode.
#[derive(Debug, Clone)]
pub struct Border<S: Expression> {
    source: S,
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
    mode: BorderMode<S::Elem>,
}

impl<S: Expression> Border<S> {
    pub fn new(
        source: S,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        mode: BorderMode<S::Elem>,
    ) -> Self {
        Self {
            source,
            top,
            left,
            bottom,
            right,
            mode,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn mode(&self) -> BorderMode<S::Elem> {
        self.mode
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read any signed view coordinate, including cells beyond the padding
    pub fn at_signed(&self, row: isize, column: isize) -> S::Elem {
        let row = row - self.top as isize;
        let column = column - self.left as isize;
        let (rows, columns) = self.source.shape();

        if inside(row, rows) && inside(column, columns) {
            return self.source.at(row as usize, column as usize);
        }
        match self.mode {
            BorderMode::Constant(value) => value,
            BorderMode::Repeat if rows == 0 || columns == 0 => S::Elem::default(),
            BorderMode::Repeat => self
                .source
                .at(clamp_index(row, rows), clamp_index(column, columns)),
        }
    }
}

#[inline]
fn inside(index: isize, len: usize) -> bool {
    index >= 0 && (index as usize) < len
}

impl<S: Expression> Expression for Border<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        self.source.rows() + self.top + self.bottom
    }

    fn columns(&self) -> usize {
        self.source.columns() + self.left + self.right
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> S::Elem {
        self.at_signed(row as isize, column as isize)
    }
}

impl<S: ExpressionMut> ExpressionMut for Border<S> {
    fn set(&mut self, row: usize, column: usize, value: S::Elem) {
        let row = row as isize - self.top as isize;
        let column = column as isize - self.left as isize;
        let (rows, columns) = self.source.shape();
        if inside(row, rows) && inside(column, columns) {
            self.source.set(row as usize, column as usize, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;
    use crate::views::border;

    fn small() -> Array<i32> {
        Array::from_fn(2, 3, |r, c| (r * 3 + c + 1) as i32)
    }

    #[test]
    fn test_constant_border() {
        let src = small();
        let view = border(&src, 1, 2, 1, 0, BorderMode::Constant(-1));
        assert_eq!(view.shape(), (4, 5));
        assert_eq!(view.at(0, 0), -1);
        assert_eq!(view.at(1, 2), 1);
        assert_eq!(view.at(2, 4), 6);
        assert_eq!(view.at(3, 3), -1);
    }

    #[test]
    fn test_repeat_border_clamps() {
        let src = small();
        let view = border(&src, 2, 2, 2, 2, BorderMode::Repeat);
        assert_eq!(view.at(0, 0), src.at(0, 0));
        assert_eq!(view.at(5, 6), src.at(1, 2));
        assert_eq!(view.at(0, 3), src.at(0, 1));
        assert_eq!(view.at_signed(-10, 100), src.at(0, 2));
    }

    #[test]
    fn test_border_black_hole() {
        let mut src = small();
        {
            let mut view = border(&mut src, 1, 1, 1, 1, BorderMode::Constant(0));
            view.set(0, 0, 99);
            view.set(1, 1, 42);
            assert_eq!(view.at(0, 0), 0);
        }
        assert_eq!(src.at(0, 0), 42);
        assert_eq!(src.as_slice().iter().filter(|&&v| v == 99).count(), 0);
    }

    #[test]
    fn test_repeat_on_empty_source() {
        let src: Array<u8> = Array::new(0, 0, 0);
        let view = border(&src, 1, 1, 1, 1, BorderMode::Repeat);
        assert_eq!(view.shape(), (2, 2));
        assert_eq!(view.at(1, 1), 0);
    }
}
