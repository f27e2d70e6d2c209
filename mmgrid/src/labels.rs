//! Row, column and page name tables
//!
//! Labels are sparse: only indices that were explicitly named are stored,
//! every other index reports a generated default such as `"row: 3"`.

use hashbrown::HashMap;

/// Sparse index to label maps for each axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    rows: HashMap<usize, String>,
    columns: HashMap<usize, String>,
    pages: HashMap<usize, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, index: usize) -> String {
        lookup(&self.rows, index, "row")
    }

    pub fn column(&self, index: usize) -> String {
        lookup(&self.columns, index, "col")
    }

    pub fn page(&self, index: usize) -> String {
        lookup(&self.pages, index, "page")
    }

    /// Name a row; an empty label clears it
    pub fn set_row(&mut self, index: usize, label: String) {
        assign(&mut self.rows, index, label);
    }

    pub fn set_column(&mut self, index: usize, label: String) {
        assign(&mut self.columns, index, label);
    }

    pub fn set_page(&mut self, index: usize, label: String) {
        assign(&mut self.pages, index, label);
    }

    /// Number of explicitly named indices across all axes
    pub fn len(&self) -> usize {
        self.rows.len() + self.columns.len() + self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
        self.pages.clear();
    }
}

fn lookup(table: &HashMap<usize, String>, index: usize, axis: &str) -> String {
    match table.get(&index) {
        Some(label) => label.clone(),
        None => format!("{axis}: {index}"),
    }
}

fn assign(table: &mut HashMap<usize, String>, index: usize, label: String) {
    if label.is_empty() {
        table.remove(&index);
    } else {
        table.insert(index, label);
    }
}

/// Grids that carry a [`NameTable`]
pub trait Labeled {
    fn labels(&self) -> &NameTable;

    fn labels_mut(&mut self) -> &mut NameTable;

    /// Label of row `index`, `"row: index"` unless named
    fn row_header(&self, index: usize) -> String {
        self.labels().row(index)
    }

    /// Name row `index`; an empty label restores the default
    fn set_row_header<S: Into<String>>(&mut self, index: usize, label: S) {
        self.labels_mut().set_row(index, label.into());
    }

    /// Label of column `index`, `"col: index"` unless named
    fn column_header(&self, index: usize) -> String {
        self.labels().column(index)
    }

    fn set_column_header<S: Into<String>>(&mut self, index: usize, label: S) {
        self.labels_mut().set_column(index, label.into());
    }

    /// Label of page `index`, `"page: index"` unless named
    fn page_header(&self, index: usize) -> String {
        self.labels().page(index)
    }

    fn set_page_header<S: Into<String>>(&mut self, index: usize, label: S) {
        self.labels_mut().set_page(index, label.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let table = NameTable::new();
        assert_eq!(table.row(3), "row: 3");
        assert_eq!(table.column(0), "col: 0");
        assert_eq!(table.page(7), "page: 7");
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_and_clear() {
        let mut table = NameTable::new();
        table.set_row(2, "alpha".to_string());
        table.set_column(5, "price".to_string());
        assert_eq!(table.row(2), "alpha");
        assert_eq!(table.column(5), "price");
        assert_eq!(table.len(), 2);

        table.set_row(2, String::new());
        assert_eq!(table.row(2), "row: 2");
        assert_eq!(table.len(), 1);
    }
}
