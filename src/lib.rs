//! Excelify - fill xlsx templates from JSON documents
//!
//! Template cells hold placeholders: a JSON path between two sentinel
//! characters, `≮name≯` by default. A placeholder whose path contains `[]`
//! (`≮list[].name≯`) turns its row into a template that is repeated once per
//! array element; every other placeholder is replaced by the value it names.
//!
//! # Features
//!
//! - Row expansion for arrays, including nested arrays (`≮a[].b[].c≯`)
//! - Definite JSON paths with `.length()`, quoted keys and negative indices
//! - Lenient (diagnostic text in the cell) or strict resolution
//! - Options loadable from YAML
//! - Template formatting kept: the workbook is edited in place
//!
//! # Example
//!
//! ```no_run
//! use excelify::Excelify;
//! use std::fs::File;
//!
//! let template = std::fs::read("report.xlsx")?;
//! let data = r#"{"name":"X","list":[{"name":"A"},{"name":"B"}]}"#;
//!
//! let excelify = Excelify::new(data, template);
//! let report = excelify.write(File::create("out.xlsx")?)?;
//! println!("{} rows created", report.expansion.rows_created);
//! assert_eq!(excelify.read_value("≮list[1].name≯"), "B");
//! # Ok::<(), excelify::ExcelifyError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod excel;
pub mod expander;
pub mod filler;
pub mod grid;
pub mod json_path;
pub mod pipeline;
pub mod placeholder;
pub mod sheet;

// Re-export commonly used types
pub use config::{MissingArrayPolicy, Options, ResolveMode};
pub use error::{ExcelifyError, ExcelifyResult};
pub use grid::{CellValue, Grid, Row, Workbook};
pub use pipeline::{Excelify, Rendered, Report};
pub use placeholder::Delimiters;
pub use sheet::Sheet;
