//! Row-oriented sheet access used by the expander and the filler
//!
//! Coordinates are zero-based. Implementations keep formatting attached to
//! cells and rows: `write_text` replaces content only, `copy_row` copies
//! content and formatting, and the row shifts move both.

use crate::grid::{CellValue, Grid};

pub trait Sheet {
    fn sheet_name(&self) -> &str;

    /// Rows from the top of the sheet to the last populated one
    fn row_count(&self) -> usize;

    /// Columns to scan in `row`; may be larger than its populated width
    fn row_width(&self, row: usize) -> usize;

    fn value_at(&self, row: usize, col: usize) -> Option<CellValue>;

    /// Replace the content of a cell with text, keeping its style
    fn write_text(&mut self, row: usize, col: usize, text: String);

    /// Insert `count` blank rows at `index`; rows at and below it move down
    fn insert_rows(&mut self, index: usize, count: usize);

    /// Remove the row at `index`; rows below it move up
    fn remove_row(&mut self, index: usize);

    /// Overwrite row `to` with the cells and formatting of row `from`
    fn copy_row(&mut self, from: usize, to: usize);
}

impl Sheet for Grid {
    fn sheet_name(&self) -> &str {
        self.name()
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_width(&self, row: usize) -> usize {
        self.row(row).map_or(0, |r| r.len())
    }

    fn value_at(&self, row: usize, col: usize) -> Option<CellValue> {
        self.cell(row, col).cloned()
    }

    fn write_text(&mut self, row: usize, col: usize, text: String) {
        self.set_cell(row, col, CellValue::Text(text));
    }

    fn insert_rows(&mut self, index: usize, count: usize) {
        self.insert_rows_at(index, count);
    }

    fn remove_row(&mut self, index: usize) {
        self.delete_row_at(index);
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        let row = self.row(from).cloned().unwrap_or_default();
        self.set_row(to, row);
    }
}
