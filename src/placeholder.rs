//! Placeholder recognition
//!
//! A placeholder is a text cell whose whole value is `OPEN path CLOSE`
//! (`≮list[].name≯` with the default delimiters). Paths containing an empty
//! index `[]` are array placeholders and drive row expansion.

use crate::grid::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Empty index marker; whitespace between the brackets is tolerated
static ARRAY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\]").expect("array marker pattern is valid"));

/// Sentinel characters wrapping a placeholder path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '\u{226E}',
            close: '\u{226F}',
        }
    }
}

impl Delimiters {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// The path inside `text`, if the whole text is delimited
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.strip_prefix(self.open)?.strip_suffix(self.close)
    }

    pub fn wrap(&self, path: &str) -> String {
        format!("{}{}{}", self.open, path, self.close)
    }

    /// Parse a cell as a placeholder. Only text cells qualify.
    pub fn placeholder<'a>(&self, cell: &'a CellValue) -> Option<Placeholder<'a>> {
        let path = self.strip(cell.as_text()?)?;
        Some(Placeholder { path })
    }

    pub fn is_placeholder(&self, cell: &CellValue) -> bool {
        self.placeholder(cell).is_some()
    }

    pub fn is_array_placeholder(&self, cell: &CellValue) -> bool {
        self.placeholder(cell).is_some_and(|p| p.is_array())
    }
}

/// A recognized placeholder borrowed from its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    path: &'a str,
}

impl<'a> Placeholder<'a> {
    /// The raw path between the delimiters
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn is_array(&self) -> bool {
        ARRAY_MARKER.is_match(self.path)
    }

    /// Path of the array the first `[]` iterates over (`list[].name` → `list`,
    /// `[].id` → `$`)
    pub fn array_path(&self) -> Option<&'a str> {
        ARRAY_MARKER.find(self.path).map(|m| match self.path[..m.start()].trim() {
            "" => "$",
            prefix => prefix,
        })
    }

    /// Path with its first `[]` bound to `index` (`a[].b[]` → `a[2].b[]`)
    pub fn bind_index(&self, index: usize) -> String {
        ARRAY_MARKER
            .replace(self.path, format!("[{}]", index).as_str())
            .into_owned()
    }
}
