//! Excel integration
//!
//! [`XlsxWorkbook`] edits a template in place for filling. [`TemplateImporter`]
//! reads cell values into [`crate::grid::Grid`]s for inspection.

mod importer;
mod workbook;

pub use importer::TemplateImporter;
pub use workbook::{XlsxSheet, XlsxWorkbook};
