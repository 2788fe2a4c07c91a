//! The JSON data document
//!
//! The source text is parsed on first use and the result, success or
//! failure, is kept for the lifetime of the document. The cache is not
//! `Sync`: one document serves one thread.

use crate::display::to_display_string;
use crate::json_path::{JsonPath, QueryError};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug)]
pub struct Document {
    source: String,
    parsed: OnceCell<Result<Value, QueryError>>,
}

impl Document {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            parsed: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed value, parsing on first call
    pub fn value(&self) -> Result<&Value, QueryError> {
        self.parsed
            .get_or_init(|| {
                if self.source.trim().is_empty() {
                    return Err(QueryError::Document("document is empty".to_string()));
                }
                serde_json::from_str(&self.source).map_err(|e| QueryError::Document(e.to_string()))
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Evaluate a raw path (no delimiters) such as `list[0].name`
    pub fn query(&self, path: &str) -> Result<Cow<'_, Value>, QueryError> {
        let path = JsonPath::parse(path.trim())?;
        path.query(self.value()?)
    }

    /// Display string of the value at `path`, or the failure's message.
    pub fn read_string(&self, path: &str) -> String {
        self.try_read_string(path).unwrap_or_else(|e| e.to_string())
    }

    pub fn try_read_string(&self, path: &str) -> Result<String, QueryError> {
        self.query(path).map(|value| to_display_string(&value))
    }

    /// Length of the array at `path`; non-array values are an error
    pub fn array_length(&self, path: &str) -> Result<usize, QueryError> {
        let path = JsonPath::parse(path.trim())?;
        path.array_length(self.value()?)
    }
}
