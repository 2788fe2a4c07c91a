//! Array row expansion
//!
//! A row holding an array placeholder (`≮list[].name≯`) is a template: it is
//! replaced by one sibling row per element of the array, with the first `[]`
//! of every array placeholder bound to the element index (`≮list[0].name≯`,
//! `≮list[1].name≯`, ...). Passes repeat until no array placeholder is left,
//! so nested arrays unfold one level per pass.
//!
//! The length comes from the leftmost array placeholder of the row. Other
//! array placeholders in the same row reuse that index range; a shorter array
//! shows up later as an out-of-bounds lookup, never as silent truncation.

use crate::config::{MissingArrayPolicy, Options};
use crate::document::Document;
use crate::error::{ExcelifyError, ExcelifyResult};
use crate::grid::CellValue;
use crate::sheet::Sheet;
use tracing::{debug, warn};

/// Counters reported by [`ArrayExpander::expand`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionStats {
    pub passes: usize,
    /// Template rows replaced by their siblings
    pub templates_expanded: usize,
    pub rows_created: usize,
    /// Template rows removed without siblings (empty or unresolved arrays)
    pub rows_removed: usize,
}

pub struct ArrayExpander<'a> {
    document: &'a Document,
    options: &'a Options,
}

impl<'a> ArrayExpander<'a> {
    pub fn new(document: &'a Document, options: &'a Options) -> Self {
        Self { document, options }
    }

    /// Whether any row still holds an array placeholder
    pub fn needs_expansion<S: Sheet>(&self, sheet: &S) -> bool {
        (0..sheet.row_count()).any(|row| !self.array_cells(sheet, row).is_empty())
    }

    /// Expand every array placeholder row until none remain
    pub fn expand<S: Sheet>(&self, sheet: &mut S) -> ExcelifyResult<ExpansionStats> {
        let mut stats = ExpansionStats::default();

        while self.needs_expansion(sheet) {
            if stats.passes >= self.options.max_expansion_passes {
                return Err(ExcelifyError::ExpansionLimit {
                    passes: stats.passes,
                });
            }
            stats.passes += 1;
            self.expand_pass(sheet, &mut stats)?;
            debug!(
                sheet = sheet.sheet_name(),
                pass = stats.passes,
                rows = sheet.row_count(),
                "expansion pass complete"
            );
        }

        Ok(stats)
    }

    /// One top-to-bottom walk; rows created in this pass are not revisited
    fn expand_pass<S: Sheet>(&self, sheet: &mut S, stats: &mut ExpansionStats) -> ExcelifyResult<()> {
        let mut index = 0;

        while index < sheet.row_count() {
            let arrays = self.array_cells(sheet, index);
            if arrays.is_empty() {
                index += 1;
                continue;
            }

            let created = self.expand_row(sheet, index, &arrays)?;
            if created == 0 {
                stats.rows_removed += 1;
            } else {
                stats.templates_expanded += 1;
                stats.rows_created += created;
            }
            index += created;
        }

        Ok(())
    }

    /// Array placeholder cells of `row`, left to right
    fn array_cells<S: Sheet>(&self, sheet: &S, row: usize) -> Vec<(usize, CellValue)> {
        let delimiters = &self.options.delimiters;
        (0..sheet.row_width(row))
            .filter_map(|col| sheet.value_at(row, col).map(|value| (col, value)))
            .filter(|(_, value)| delimiters.is_array_placeholder(value))
            .collect()
    }

    /// Replace the template row at `index` with its siblings; returns how many.
    ///
    /// Each sibling is a full copy of the template row, formatting included,
    /// with the first `[]` of every array placeholder bound to its offset.
    fn expand_row<S: Sheet>(
        &self,
        sheet: &mut S,
        index: usize,
        arrays: &[(usize, CellValue)],
    ) -> ExcelifyResult<usize> {
        let delimiters = &self.options.delimiters;
        // The leftmost array placeholder decides the length
        let Some(first) = arrays.first().and_then(|(_, value)| delimiters.placeholder(value))
        else {
            return Ok(0);
        };
        let len = self.array_length(first.array_path().unwrap_or("$"), index)?;

        sheet.insert_rows(index + 1, len);
        for offset in 0..len {
            let target = index + 1 + offset;
            sheet.copy_row(index, target);
            for (col, value) in arrays {
                if let Some(placeholder) = delimiters.placeholder(value) {
                    sheet.write_text(target, *col, delimiters.wrap(&placeholder.bind_index(offset)));
                }
            }
        }
        sheet.remove_row(index);

        debug!(row = index + 1, siblings = len, "expanded array row");
        Ok(len)
    }

    /// Length of the array at `path`, subject to the missing-array policy
    fn array_length(&self, path: &str, index: usize) -> ExcelifyResult<usize> {
        match self.document.array_length(path) {
            Ok(len) => Ok(len),
            Err(source) => match self.options.missing_array {
                MissingArrayPolicy::Skip => {
                    warn!(
                        row = index + 1,
                        path,
                        error = %source,
                        "array length unavailable, dropping template row"
                    );
                    Ok(0)
                }
                MissingArrayPolicy::Fail => Err(ExcelifyError::ArrayLength {
                    row: index + 1,
                    path: path.to_string(),
                    source,
                }),
            },
        }
    }
}
