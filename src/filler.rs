//! Scalar placeholder substitution
//!
//! Every text cell of the form `≮path≯` is replaced by the display string of
//! the value at `$.path`. Lookup failures either become the cell text
//! (lenient) or abort the fill (strict).

use crate::config::{Options, ResolveMode};
use crate::document::Document;
use crate::error::{ExcelifyError, ExcelifyResult};
use crate::grid::cell_address;
use crate::sheet::Sheet;
use tracing::debug;

/// Counters reported by [`PlaceholderFiller::fill`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    pub filled: usize,
    /// Cells that received a diagnostic instead of a value
    pub failed: usize,
}

pub struct PlaceholderFiller<'a> {
    document: &'a Document,
    options: &'a Options,
}

impl<'a> PlaceholderFiller<'a> {
    pub fn new(document: &'a Document, options: &'a Options) -> Self {
        Self { document, options }
    }

    pub fn fill<S: Sheet>(&self, sheet: &mut S) -> ExcelifyResult<FillStats> {
        let delimiters = self.options.delimiters;
        let mut stats = FillStats::default();

        for row_idx in 0..sheet.row_count() {
            for col_idx in 0..sheet.row_width(row_idx) {
                let Some(value) = sheet.value_at(row_idx, col_idx) else {
                    continue;
                };
                let Some(placeholder) = delimiters.placeholder(&value) else {
                    continue;
                };
                let text = match self.document.try_read_string(placeholder.path()) {
                    Ok(text) => text,
                    Err(source) => match self.options.resolve_mode {
                        ResolveMode::Lenient => {
                            debug!(
                                cell = %cell_address(row_idx, col_idx),
                                error = %source,
                                "placeholder left unresolved"
                            );
                            stats.failed += 1;
                            source.to_string()
                        }
                        ResolveMode::Strict => {
                            return Err(ExcelifyError::Resolve {
                                cell: cell_address(row_idx, col_idx),
                                source,
                            });
                        }
                    },
                };
                sheet.write_text(row_idx, col_idx, text);
                stats.filled += 1;
            }
        }

        Ok(stats)
    }
}
