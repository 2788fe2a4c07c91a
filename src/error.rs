use crate::json_path::QueryError;
use thiserror::Error;

pub type ExcelifyResult<T> = Result<T, ExcelifyError>;

#[derive(Error, Debug)]
pub enum ExcelifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot determine array length for '{path}' on row {row}: {source}")]
    ArrayLength {
        row: usize,
        path: String,
        #[source]
        source: QueryError,
    },

    #[error("Cannot resolve placeholder at {cell}: {source}")]
    Resolve {
        cell: String,
        #[source]
        source: QueryError,
    },

    #[error("Array expansion did not settle after {passes} passes (circular or too deeply nested template?)")]
    ExpansionLimit { passes: usize },
}
