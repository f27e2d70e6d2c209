use crate::expression::{Expression, ExpressionMut};

/// Rectangular region between two corners of a source
///
/// Corners are inclusive, may be given in either order and may lie outside
/// the source: the shape is `|corner2 - corner1| + 1` per axis and cells are
/// read circularly, so a region can wrap around the source. View coordinate
/// `0` maps to `corner1`, and increasing view coordinates walk towards
/// `corner2`.
#[derive(Debug, Clone)]
pub struct Roi<S> {
    source: S,
    row1: isize,
    column1: isize,
    row2: isize,
    column2: isize,
}

impl<S: Expression> Roi<S> {
    pub fn new(source: S, row1: isize, column1: isize, row2: isize, column2: isize) -> Self {
        Self {
            source,
            row1,
            column1,
            row2,
            column2,
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
            step(self.row1, self.row2, row),
            step(self.column1, self.column2, column),
        )
    }
}

#[inline]
fn step(from: isize, to: isize, offset: usize) -> isize {
    if to >= from {
        from + offset as isize
    } else {
        from - offset as isize
    }
}

impl<S: Expression> Expression for Roi<S> {
    type Elem = S::Elem;

    fn rows(&self) -> usize {
        self.row1.abs_diff(self.row2) + 1
    }

    fn columns(&self) -> usize {
        self.column1.abs_diff(self.column2) + 1
    }

    #[inline]
    fn at(&self, row: usize, column: usize) -> S::Elem {
        let (r, c) = self.map(row, column);
        self.source.circ_at(r, c)
    }
}

impl<S: ExpressionMut> ExpressionMut for Roi<S> {
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
    use crate::views::roi;

    fn counting() -> Array<i32> {
        Array::from_fn(5, 5, |r, c| (r * 5 + c) as i32)
    }

    #[test]
    fn test_roi_shape_and_origin() {
        let src = counting();
        let view = roi(&src, 1, 1, 3, 3);
        assert_eq!(view.shape(), (3, 3));
        assert_eq!(view.at(0, 0), src.at(1, 1));
        assert_eq!(view.at(2, 2), src.at(3, 3));
    }

    #[test]
    fn test_reversed_corners_mirror() {
        let src = counting();
        let view = roi(&src, 3, 3, 1, 1);
        assert_eq!(view.shape(), (3, 3));
        assert_eq!(view.at(0, 0), src.at(3, 3));
        assert_eq!(view.at(2, 2), src.at(1, 1));
    }

    #[test]
    fn test_roi_wraps_source() {
        let src = counting();
        let view = roi(&src, -1, 4, 0, 6);
        assert_eq!(view.shape(), (2, 3));
        assert_eq!(view.at(0, 0), src.at(4, 4));
        assert_eq!(view.at(1, 2), src.at(0, 1));
    }

    #[test]
    fn test_roi_writes_forward() {
        let mut src = counting();
        {
            let mut view = roi(&mut src, 2, 2, 4, 4);
            view.set(0, 0, -1);
        }
        assert_eq!(src.at(2, 2), -1);
    }

    #[test]
    fn test_roi_tracks_source_shape() {
        let src = crate::Shared::new(counting());
        let view = roi(src.clone(), 0, 0, 1, 1);
        src.borrow_mut().unwrap().resize_with(1, 1, 9);
        assert_eq!(view.at(1, 1), src.at(0, 0));
    }
}
