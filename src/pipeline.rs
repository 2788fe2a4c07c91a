//! Template filling pipeline
//!
//! template bytes → workbook → expand arrays (sheet 0) → fill placeholders
//! (sheet 0) → xlsx bytes → sink. The workbook is edited in place, so
//! formatting and other sheets pass through unchanged.

use crate::config::Options;
use crate::document::Document;
use crate::error::{ExcelifyError, ExcelifyResult};
use crate::excel::XlsxWorkbook;
use crate::expander::{ArrayExpander, ExpansionStats};
use crate::filler::{FillStats, PlaceholderFiller};
use crate::sheet::Sheet;
use std::io::Write;
use tracing::info;

/// What one run did to the processed sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub expansion: ExpansionStats,
    pub fill: FillStats,
}

/// A filled workbook, before serialization
#[derive(Debug)]
pub struct Rendered {
    pub workbook: XlsxWorkbook,
    pub report: Report,
}

/// A JSON document paired with an xlsx template
#[derive(Debug)]
pub struct Excelify {
    document: Document,
    template: Vec<u8>,
    options: Options,
}

impl Excelify {
    pub fn new(json: impl Into<String>, template: impl Into<Vec<u8>>) -> Self {
        Self::with_options(json, template, Options::default())
    }

    pub fn with_options(
        json: impl Into<String>,
        template: impl Into<Vec<u8>>,
        options: Options,
    ) -> Self {
        Self {
            document: Document::new(json),
            template: template.into(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Fill the template and write the resulting workbook to `sink`.
    ///
    /// Nothing is written unless the whole pipeline succeeds.
    pub fn write<W: Write>(&self, mut sink: W) -> ExcelifyResult<Report> {
        let Rendered { workbook, report } = self.render()?;
        workbook.write_to(&mut sink)?;
        info!(
            rows_created = report.expansion.rows_created,
            cells_filled = report.fill.filled,
            cells_failed = report.fill.failed,
            "workbook written"
        );
        Ok(report)
    }

    /// Run the pipeline without serializing
    pub fn render(&self) -> ExcelifyResult<Rendered> {
        self.options.validate()?;
        let mut workbook = XlsxWorkbook::from_bytes(&self.template)?;
        let mut sheet = workbook
            .first_sheet_mut()
            .ok_or_else(|| ExcelifyError::Template("template has no worksheets".to_string()))?;
        let report = self.process_sheet(&mut sheet)?;
        Ok(Rendered { workbook, report })
    }

    /// Expand every array row of `sheet`, then fill its scalar placeholders
    pub fn process_sheet<S: Sheet>(&self, sheet: &mut S) -> ExcelifyResult<Report> {
        let expansion = ArrayExpander::new(&self.document, &self.options).expand(sheet)?;
        let fill = PlaceholderFiller::new(&self.document, &self.options).fill(sheet)?;
        Ok(Report { expansion, fill })
    }

    /// Look up a single placeholder such as `≮list[0].name≯`.
    ///
    /// Text without delimiters is taken as the raw path. Failures come back
    /// as their diagnostic message.
    pub fn read_value(&self, placeholder: &str) -> String {
        let path = self
            .options
            .delimiters
            .strip(placeholder)
            .unwrap_or(placeholder);
        self.read_string(path)
    }

    /// Look up a raw path such as `list[0].name`
    pub fn read_string(&self, path: &str) -> String {
        self.document.read_string(path)
    }
}
