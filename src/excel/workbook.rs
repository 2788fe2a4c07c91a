//! Template workbook edited in place
//!
//! The template is loaded with umya-spreadsheet and written back as the same
//! workbook, so fonts, fills, borders, number formats, column widths, merged
//! ranges and untouched sheets survive the fill unchanged.

use crate::error::{ExcelifyError, ExcelifyResult};
use crate::grid::CellValue;
use crate::sheet::Sheet;
use std::fmt;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;
use umya_spreadsheet::{reader, writer, CellRawValue, Spreadsheet, Worksheet};

pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// Load a template held in memory, deserializing every sheet
    pub fn from_bytes(bytes: &[u8]) -> ExcelifyResult<Self> {
        if bytes.is_empty() {
            return Err(ExcelifyError::Template("template is empty".to_string()));
        }

        let book = reader::xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|e| ExcelifyError::Template(format!("Failed to open template: {}", e)))?;
        if book.get_sheet_count() == 0 {
            return Err(ExcelifyError::Template(
                "template has no worksheets".to_string(),
            ));
        }

        debug!(sheets = book.get_sheet_count(), "loaded template workbook");
        Ok(Self { book })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ExcelifyResult<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        (0..self.book.get_sheet_count())
            .filter_map(|index| self.book.get_sheet(&index))
            .map(|worksheet| worksheet.get_name().to_string())
            .collect()
    }

    /// The sheet that gets expanded and filled
    pub fn first_sheet_mut(&mut self) -> Option<XlsxSheet<'_>> {
        self.book.get_sheet_mut(&0).map(XlsxSheet::new)
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    /// Serialize to xlsx bytes
    pub fn to_bytes(&self) -> ExcelifyResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        writer::xlsx::write_writer(&self.book, &mut buffer)
            .map_err(|e| ExcelifyError::Export(format!("Failed to serialize workbook: {}", e)))?;
        Ok(buffer.into_inner())
    }

    /// Serialize and write everything to `sink`
    pub fn write_to<W: Write>(&self, sink: &mut W) -> ExcelifyResult<()> {
        let bytes = self.to_bytes()?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ExcelifyResult<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

impl fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheet_names())
            .finish()
    }
}

/// One worksheet of an [`XlsxWorkbook`], addressed with zero-based indices
pub struct XlsxSheet<'a> {
    worksheet: &'a mut Worksheet,
}

impl<'a> XlsxSheet<'a> {
    pub fn new(worksheet: &'a mut Worksheet) -> Self {
        Self { worksheet }
    }
}

/// umya coordinates are one-based (column, row)
fn coordinate(row: usize, col: usize) -> (u32, u32) {
    (col as u32 + 1, row as u32 + 1)
}

impl Sheet for XlsxSheet<'_> {
    fn sheet_name(&self) -> &str {
        self.worksheet.get_name()
    }

    fn row_count(&self) -> usize {
        self.worksheet.get_highest_row() as usize
    }

    fn row_width(&self, _row: usize) -> usize {
        self.worksheet.get_highest_column() as usize
    }

    fn value_at(&self, row: usize, col: usize) -> Option<CellValue> {
        let value = self.worksheet.get_cell(coordinate(row, col))?.get_cell_value();
        if value.is_formula() {
            let formula = value.get_formula();
            return Some(CellValue::Formula(
                formula.strip_prefix('=').unwrap_or(formula).to_string(),
            ));
        }
        let cell = match value.get_raw_value() {
            CellRawValue::Empty => return None,
            CellRawValue::String(s) => CellValue::Text(s.to_string()),
            CellRawValue::RichText(rt) => CellValue::Text(rt.get_text().to_string()),
            CellRawValue::Lazy(s) => CellValue::Text(s.to_string()),
            CellRawValue::Numeric(n) => CellValue::Number(*n),
            CellRawValue::Bool(b) => CellValue::Bool(*b),
            CellRawValue::Error(_) => CellValue::Error(value.get_value().into_owned()),
        };
        Some(cell)
    }

    fn write_text(&mut self, row: usize, col: usize, text: String) {
        self.worksheet
            .get_cell_mut(coordinate(row, col))
            .set_value_string(text);
    }

    fn insert_rows(&mut self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.worksheet
            .insert_new_row(&(index as u32 + 1), &(count as u32));
    }

    fn remove_row(&mut self, index: usize) {
        self.worksheet.remove_row(&(index as u32 + 1), &1);
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        for col in 0..self.row_width(from) {
            let Some(source) = self.worksheet.get_cell(coordinate(from, col)) else {
                continue;
            };
            let value = source.get_cell_value().clone();
            let style = source.get_style().clone();
            let target = self.worksheet.get_cell_mut(coordinate(to, col));
            target.set_cell_value(value);
            target.set_style(style);
        }

        let height = self
            .worksheet
            .get_row_dimension(&(from as u32 + 1))
            .map(|dimension| dimension.get_height().to_owned());
        if let Some(height) = height {
            self.worksheet
                .get_row_dimension_mut(&(to as u32 + 1))
                .set_height(height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWriterBook;

    fn template() -> Vec<u8> {
        let mut workbook = XlsxWriterBook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Report").unwrap();
        sheet.write_string(0, 0, "≮name≯").unwrap();
        sheet.write_number(1, 1, 4.5).unwrap();
        sheet.write_boolean(2, 0, true).unwrap();
        workbook.add_worksheet().set_name("Notes").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_loads_every_sheet_in_order() {
        let workbook = XlsxWorkbook::from_bytes(&template()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Report", "Notes"]);
    }

    #[test]
    fn test_sheet_values() {
        let mut workbook = XlsxWorkbook::from_bytes(&template()).unwrap();
        let sheet = workbook.first_sheet_mut().unwrap();
        assert_eq!(sheet.sheet_name(), "Report");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.value_at(0, 0), Some(CellValue::from("≮name≯")));
        assert_eq!(sheet.value_at(1, 1), Some(CellValue::Number(4.5)));
        assert_eq!(sheet.value_at(2, 0), Some(CellValue::Bool(true)));
        assert_eq!(sheet.value_at(5, 5), None);
    }

    #[test]
    fn test_row_shifts() {
        let mut workbook = XlsxWorkbook::from_bytes(&template()).unwrap();
        let mut sheet = workbook.first_sheet_mut().unwrap();
        sheet.insert_rows(1, 2);
        assert_eq!(sheet.value_at(3, 1), Some(CellValue::Number(4.5)));
        sheet.copy_row(0, 1);
        sheet.write_text(1, 0, "copy".to_string());
        assert_eq!(sheet.value_at(0, 0), Some(CellValue::from("≮name≯")));
        assert_eq!(sheet.value_at(1, 0), Some(CellValue::from("copy")));
        sheet.remove_row(0);
        assert_eq!(sheet.value_at(0, 0), Some(CellValue::from("copy")));
        assert_eq!(sheet.value_at(2, 1), Some(CellValue::Number(4.5)));
    }

    #[test]
    fn test_text_stays_text() {
        let mut workbook = XlsxWorkbook::from_bytes(&template()).unwrap();
        let mut sheet = workbook.first_sheet_mut().unwrap();
        sheet.write_text(0, 0, "18".to_string());
        assert_eq!(sheet.value_at(0, 0), Some(CellValue::from("18")));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            XlsxWorkbook::from_bytes(b"definitely not a zip"),
            Err(ExcelifyError::Template(_))
        ));
        assert!(matches!(
            XlsxWorkbook::from_bytes(&[]),
            Err(ExcelifyError::Template(_))
        ));
    }

    #[test]
    fn test_round_trip_bytes() {
        let workbook = XlsxWorkbook::from_bytes(&template()).unwrap();
        let mut sink = Vec::new();
        workbook.write_to(&mut sink).unwrap();
        // xlsx is a zip archive
        assert_eq!(&sink[..2], b"PK");
        let back = XlsxWorkbook::from_bytes(&sink).unwrap();
        assert_eq!(back.sheet_names(), vec!["Report", "Notes"]);
    }
}
