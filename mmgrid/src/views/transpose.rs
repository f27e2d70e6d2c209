use crate::expression::{Expression, ExpressionMut};

/// Swaps rows and columns of a source
#[derive(Debug, Clone)]
pub struct Transpose<S> {
    source: S,
}

impl<S: Expression> Transpose<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Expression> Expression for Transpose<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        self.source.columns()
    }

    fn columns(&self) -> usize {
        self.source.rows()
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> S::Elem {
        self.source.at(column, row)
    }
}

impl<S: ExpressionMut> ExpressionMut for Transpose<S> {
    #[inline]
    fn set(&mut self, row: usize, column: usize, value: S::Elem) {
        self.source.set(column, row, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;
    use crate::views::transpose;

    #[test]
    fn test_transpose_swaps() {
        let src = Array::from_fn(3, 5, |r, c| (r * 10 + c) as u16);
        let t = transpose(&src);
        assert_eq!(t.shape(), (5, 3));
        for i in 0..5 {
            for j in 0..3 {
                assert_eq!(t.at(i, j), src.at(j, i));
            }
        }
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let src = Array::from_fn(2, 4, |r, c| (r + c) as f32);
        let tt = transpose(transpose(&src));
        assert_eq!(crate::to_vec(&tt), src.as_slice());
    }

    #[test]
    fn test_transpose_write() {
        let mut src = Array::new(2, 3, 0i8);
        transpose(&mut src).set(2, 1, 4);
        assert_eq!(src.at(1, 2), 4);
    }
}
