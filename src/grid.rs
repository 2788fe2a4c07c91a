//! In-memory sheet model
//!
//! A [`Grid`] is a dense list of rows, each a list of cells. Row shifting is
//! explicit: [`Grid::insert_rows_at`] moves everything at and below an index
//! down, [`Grid::delete_row_at`] closes the gap a row leaves. Nothing else
//! changes row positions.

use std::fmt;

/// Content of a single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Formula text without the leading '='
    Formula(String),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text of a text cell, `None` for every other kind
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::Error(s) => f.write_str(s),
            CellValue::Number(n) | CellValue::DateTime(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Formula(formula) => write!(f, "={}", formula),
        }
    }
}

/// One sheet row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: Vec<CellValue>) -> Self {
        let mut row = Self { cells };
        row.trim();
        row
    }

    pub fn get(&self, col: usize) -> Option<&CellValue> {
        self.cells.get(col)
    }

    /// Set a cell, growing the row with empty cells as needed
    pub fn set(&mut self, col: usize, value: CellValue) {
        if col >= self.cells.len() {
            if value.is_empty() {
                return;
            }
            self.cells.resize(col + 1, CellValue::Empty);
        }
        self.cells[col] = value;
        self.trim();
    }

    /// Number of cells up to and including the last non-empty one
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CellValue> {
        self.cells.iter_mut()
    }

    fn trim(&mut self) {
        while matches!(self.cells.last(), Some(CellValue::Empty)) {
            self.cells.pop();
        }
    }
}

impl<T: Into<CellValue>> FromIterator<T> for Row {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Row::from_cells(iter.into_iter().map(Into::into).collect())
    }
}

/// A named sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    name: String,
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows, including empty rows between populated ones
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    /// Replace the row at `index`, padding the grid with empty rows if needed
    pub fn set_row(&mut self, index: usize, row: Row) {
        if index >= self.rows.len() {
            self.rows.resize_with(index + 1, Row::new);
        }
        self.rows[index] = row;
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            if value.is_empty() {
                return;
            }
            self.rows.resize_with(row + 1, Row::new);
        }
        self.rows[row].set(col, value);
    }

    /// Insert `count` empty rows at `index`; rows at and below it move down.
    /// An index past the end pads the grid first.
    pub fn insert_rows_at(&mut self, index: usize, count: usize) {
        if index >= self.rows.len() {
            self.rows.resize_with(index + count, Row::new);
            return;
        }
        self.rows
            .splice(index..index, std::iter::repeat_with(Row::new).take(count));
    }

    /// Remove the row at `index`; rows below it move up. Returns the removed row.
    pub fn delete_row_at(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }
}

/// The sheets of a template, in workbook order. Sheet 0 is the one filled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Grid>,
}

impl Workbook {
    pub fn new(sheets: Vec<Grid>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[Grid] {
        &self.sheets
    }

    pub fn first_sheet(&self) -> Option<&Grid> {
        self.sheets.first()
    }

    pub fn first_sheet_mut(&mut self) -> Option<&mut Grid> {
        self.sheets.first_mut()
    }

    pub fn sheet(&self, name: &str) -> Option<&Grid> {
        self.sheets.iter().find(|grid| grid.name() == name)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Column letters for a zero-based column index (0 → A, 26 → AA)
pub fn column_letter(col: usize) -> String {
    let mut letters = String::new();
    let mut idx = col;
    loop {
        letters.insert(0, (b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters
}

/// A1-style address for zero-based coordinates
pub fn cell_address(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(grid: &Grid) -> Vec<Vec<String>> {
        grid.rows()
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            "Sheet1",
            rows.iter().map(|r| r.iter().copied().collect()).collect(),
        )
    }

    #[test]
    fn test_row_set_grows_and_trims() {
        let mut row = Row::new();
        row.set(2, "c".into());
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(0), Some(&CellValue::Empty));
        row.set(2, CellValue::Empty);
        assert!(row.is_empty());
        row.set(5, CellValue::Empty);
        assert!(row.is_empty());
    }

    #[test]
    fn test_insert_rows_shifts_down() {
        let mut g = grid(&[&["a"], &["b"], &["c"]]);
        g.insert_rows_at(1, 2);
        assert_eq!(
            texts(&g),
            vec![vec!["a"], vec![], vec![], vec!["b"], vec!["c"]]
        );
    }

    #[test]
    fn test_insert_rows_past_end_pads() {
        let mut g = grid(&[&["a"]]);
        g.insert_rows_at(3, 1);
        assert_eq!(g.len(), 4);
        assert_eq!(g.cell(0, 0), Some(&CellValue::from("a")));
    }

    #[test]
    fn test_delete_row_shifts_up() {
        let mut g = grid(&[&["a"], &["b"], &["c"]]);
        let removed = g.delete_row_at(1).unwrap();
        assert_eq!(removed.get(0), Some(&CellValue::from("b")));
        assert_eq!(texts(&g), vec![vec!["a"], vec!["c"]]);
        assert!(g.delete_row_at(7).is_none());
    }

    #[test]
    fn test_set_cell_pads_rows() {
        let mut g = Grid::new("Sheet1");
        g.set_cell(2, 1, CellValue::Number(3.0));
        assert_eq!(g.len(), 3);
        assert_eq!(g.cell(2, 1), Some(&CellValue::Number(3.0)));
        assert_eq!(g.cell(0, 0), None);
        g.set_cell(9, 0, CellValue::Empty);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn test_cell_address() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(cell_address(2, 1), "B3");
    }

    #[test]
    fn test_display_values() {
        assert_eq!(CellValue::Formula("SUM(A1:A3)".into()).to_string(), "=SUM(A1:A3)");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Number(18.0).to_string(), "18");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
