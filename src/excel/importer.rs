//! Template importer - Excel (.xlsx) bytes → grids

use crate::error::{ExcelifyError, ExcelifyResult};
use crate::grid::{CellValue, Grid, Workbook};
use calamine::{Data, Range, Reader, Xlsx};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads every worksheet of a template into a [`Workbook`]
pub struct TemplateImporter;

impl TemplateImporter {
    /// Import a template held in memory
    pub fn from_bytes(bytes: &[u8]) -> ExcelifyResult<Workbook> {
        if bytes.is_empty() {
            return Err(ExcelifyError::Template("template is empty".to_string()));
        }

        let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| ExcelifyError::Template(format!("Failed to open template: {}", e)))?;

        let sheet_names = xlsx.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ExcelifyError::Template(
                "template has no worksheets".to_string(),
            ));
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = xlsx.worksheet_range(&sheet_name).map_err(|e| {
                ExcelifyError::Template(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            // Formula ranges may be absent; cached values stand in for them
            let formulas = xlsx.worksheet_formula(&sheet_name).ok();

            let grid = Self::build_grid(&sheet_name, &range, formulas.as_ref());
            debug!(sheet = %sheet_name, rows = grid.len(), "imported sheet");
            sheets.push(grid);
        }

        Ok(Workbook::new(sheets))
    }

    /// Import a template file
    pub fn from_path<P: AsRef<Path>>(path: P) -> ExcelifyResult<Workbook> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    fn build_grid(name: &str, range: &Range<Data>, formulas: Option<&Range<String>>) -> Grid {
        let mut grid = Grid::new(name);

        // Range coordinates are relative to its first used cell
        if let Some((row_offset, col_offset)) = range.start() {
            for (row, col, data) in range.cells() {
                grid.set_cell(
                    row_offset as usize + row,
                    col_offset as usize + col,
                    Self::convert(data),
                );
            }
        }

        if let Some(formulas) = formulas {
            if let Some((row_offset, col_offset)) = formulas.start() {
                for (row, col, formula) in formulas.cells() {
                    if formula.trim().is_empty() {
                        continue;
                    }
                    let formula = formula.strip_prefix('=').unwrap_or(formula);
                    grid.set_cell(
                        row_offset as usize + row,
                        col_offset as usize + col,
                        CellValue::Formula(formula.to_string()),
                    );
                }
            }
        }

        grid
    }

    fn convert(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Formula, Workbook as XlsxWorkbook};

    fn template() -> Vec<u8> {
        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Report").unwrap();
        sheet.write_string(1, 1, "≮name≯").unwrap();
        sheet.write_number(2, 2, 42.0).unwrap();
        sheet.write_boolean(3, 0, true).unwrap();
        sheet.write_formula(4, 0, Formula::new("=1+1")).unwrap();
        let other = workbook.add_worksheet();
        other.set_name("Notes").unwrap();
        other.write_string(0, 0, "keep me").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_import_positions_are_absolute() {
        let workbook = TemplateImporter::from_bytes(&template()).unwrap();
        let grid = workbook.first_sheet().unwrap();
        assert_eq!(grid.name(), "Report");
        assert_eq!(grid.cell(0, 0), None);
        assert_eq!(grid.cell(1, 1), Some(&CellValue::from("≮name≯")));
        assert_eq!(grid.cell(2, 2), Some(&CellValue::Number(42.0)));
        assert_eq!(grid.cell(3, 0), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_import_formulas() {
        let workbook = TemplateImporter::from_bytes(&template()).unwrap();
        let grid = workbook.first_sheet().unwrap();
        assert_eq!(grid.cell(4, 0), Some(&CellValue::Formula("1+1".to_string())));
    }

    #[test]
    fn test_import_all_sheets_in_order() {
        let workbook = TemplateImporter::from_bytes(&template()).unwrap();
        assert_eq!(workbook.len(), 2);
        let notes = workbook.sheet("Notes").unwrap();
        assert_eq!(notes.cell(0, 0), Some(&CellValue::from("keep me")));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            TemplateImporter::from_bytes(b"definitely not a zip"),
            Err(ExcelifyError::Template(_))
        ));
        assert!(matches!(
            TemplateImporter::from_bytes(&[]),
            Err(ExcelifyError::Template(_))
        ));
    }
}
