use crate::expression::{Expression, ExpressionMut};

/// Two sources side by side: `left` then `right`
///
/// Shape is `(max(rows), left.columns + right.columns)`. Cells below the
/// shorter source read as zero and ignore writes.
#[derive(Debug, Clone)]
pub struct AugmentColumns<A, B> {
    left: A,
    right: B,
}

/// Two sources stacked: `top` then `bottom`
///
/// Shape is `(top.rows + bottom.rows, max(columns))`. Cells right of the
/// narrower source read as zero and ignore writes.
#[derive(Debug, Clone)]
pub struct AugmentRows<A, B> {
    top: A,
    bottom: B,
}

/// Which source a view cell resolves to
enum Side {
    First(usize, usize),
    Second(usize, usize),
    Gap,
}

impl<A, B> AugmentColumns<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.left, self.right)
    }

    #[inline]
    fn resolve(&self, row: usize, column: usize) -> Side {
        let split = self.left.columns();
        if column < split {
            if row < self.left.rows() {
                return Side::First(row, column);
            }
        } else if row < self.right.rows() {
            return Side::Second(row, column - split);
        }
        Side::Gap
    }
}

impl<A, B> Expression for AugmentColumns<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    type Elem = A::Elem;

    fn rows(&self) -> usize {
        self.left.rows().max(self.right.rows())
    }

    fn columns(&self) -> usize {
        self.left.columns() + self.right.columns()
    }

    fn at(&self, row: usize, column: usize) -> A::Elem {
        match self.resolve(row, column) {
            Side::First(r, c) => self.left.at(r, c),
            Side::Second(r, c) => self.right.at(r, c),
            Side::Gap => A::Elem::default(),
        }
    }
}

impl<A, B> ExpressionMut for AugmentColumns<A, B>
where
    A: ExpressionMut,
    B: ExpressionMut<Elem = A::Elem>,
{
    fn set(&mut self, row: usize, column: usize, value: A::Elem) {
        match self.resolve(row, column) {
            Side::First(r, c) => self.left.set(r, c, value),
            Side::Second(r, c) => self.right.set(r, c, value),
            Side::Gap => {}
        }
    }
}

impl<A, B> AugmentRows<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    pub fn new(top: A, bottom: B) -> Self {
        Self { top, bottom }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.top, self.bottom)
    }

    #[inline]
    fn resolve(&self, row: usize, column: usize) -> Side {
        let split = self.top.rows();
        if row < split {
            if column < self.top.columns() {
                return Side::First(row, column);
            }
        } else if column < self.bottom.columns() {
            return Side::Second(row - split, column);
        }
        Side::Gap
    }
}

impl<A, B> Expression for AugmentRows<A, B>
where
    A: Expression,
    B: Expression<Elem = A::Elem>,
{
    type Elem = A::Elem;

    fn rows(&self) -> usize {
        self.top.rows() + self.bottom.rows()
    }

    fn columns(&self) -> usize {
        self.top.columns().max(self.bottom.columns())
    }

    fn at(&self, row: usize, column: usize) -> A::Elem {
        match self.resolve(row, column) {
            Side::First(r, c) => self.top.at(r, c),
            Side::Second(r, c) => self.bottom.at(r, c),
            Side::Gap => A::Elem::default(),
        }
    }
}

impl<A, B> ExpressionMut for AugmentRows<A, B>
where
    A: ExpressionMut,
    B: ExpressionMut<Elem = A::Elem>,
{
    fn set(&mut self, row: usize, column: usize, value: A::Elem) {
        match self.resolve(row, column) {
            Side::First(r, c) => self.top.set(r, c, value),
            Side::Second(r, c) => self.bottom.set(r, c, value),
            Side::Gap => {}
        }
    }
}
