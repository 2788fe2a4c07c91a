//! Pipeline options
//!
//! Options have sensible defaults, builder-style setters and can be loaded
//! from a YAML file:
//!
//! ```yaml
//! delimiters:
//!   open: "{"
//!   close: "}"
//! resolve_mode: strict
//! missing_array: fail
//! max_expansion_passes: 16
//! ```

use crate::error::{ExcelifyError, ExcelifyResult};
use crate::placeholder::Delimiters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the filler does when a placeholder path cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// Write the failure's message into the cell
    #[default]
    Lenient,
    /// Abort the export
    Strict,
}

/// What the expander does when an array length cannot be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArrayPolicy {
    /// Treat the array as empty: the template row disappears
    #[default]
    Skip,
    /// Abort the export
    Fail,
}

pub const DEFAULT_MAX_EXPANSION_PASSES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub delimiters: Delimiters,
    pub resolve_mode: ResolveMode,
    pub missing_array: MissingArrayPolicy,
    /// Upper bound on expansion passes (one per array nesting level)
    pub max_expansion_passes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            resolve_mode: ResolveMode::default(),
            missing_array: MissingArrayPolicy::default(),
            max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(mut self, open: char, close: char) -> Self {
        self.delimiters = Delimiters::new(open, close);
        self
    }

    pub fn with_resolve_mode(mut self, mode: ResolveMode) -> Self {
        self.resolve_mode = mode;
        self
    }

    pub fn with_missing_array(mut self, policy: MissingArrayPolicy) -> Self {
        self.missing_array = policy;
        self
    }

    pub fn with_max_expansion_passes(mut self, passes: usize) -> Self {
        self.max_expansion_passes = passes;
        self
    }

    pub fn strict(self) -> Self {
        self.with_resolve_mode(ResolveMode::Strict)
            .with_missing_array(MissingArrayPolicy::Fail)
    }

    pub fn validate(&self) -> ExcelifyResult<()> {
        let Delimiters { open, close } = self.delimiters;
        if open == close {
            return Err(ExcelifyError::Config(format!(
                "opening and closing delimiters must differ (both are '{}')",
                open
            )));
        }
        if ['[', ']', '.'].contains(&open) || ['[', ']', '.'].contains(&close) {
            return Err(ExcelifyError::Config(
                "delimiters cannot be path characters ('[', ']' or '.')".to_string(),
            ));
        }
        if self.max_expansion_passes == 0 {
            return Err(ExcelifyError::Config(
                "max_expansion_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> ExcelifyResult<Self> {
        let options: Options = serde_yaml::from_str(yaml)
            .map_err(|e| ExcelifyError::Config(format!("invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_file(path: &Path) -> ExcelifyResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ExcelifyError::Config(msg) => {
                ExcelifyError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.delimiters, Delimiters::new('≮', '≯'));
        assert_eq!(options.resolve_mode, ResolveMode::Lenient);
        assert_eq!(options.missing_array, MissingArrayPolicy::Skip);
        assert_eq!(options.max_expansion_passes, DEFAULT_MAX_EXPANSION_PASSES);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial() {
        let options = Options::from_yaml_str("resolve_mode: strict\n").unwrap();
        assert_eq!(options.resolve_mode, ResolveMode::Strict);
        assert_eq!(options.missing_array, MissingArrayPolicy::Skip);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
delimiters:
  open: "{"
  close: "}"
resolve_mode: lenient
missing_array: fail
max_expansion_passes: 8
"#;
        let options = Options::from_yaml_str(yaml).unwrap();
        assert_eq!(options.delimiters, Delimiters::new('{', '}'));
        assert_eq!(options.missing_array, MissingArrayPolicy::Fail);
        assert_eq!(options.max_expansion_passes, 8);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(matches!(
            Options::from_yaml_str("colour: red\n"),
            Err(ExcelifyError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_delimiters() {
        assert!(Options::new().with_delimiters('|', '|').validate().is_err());
        assert!(Options::new().with_delimiters('[', '}').validate().is_err());
        assert!(Options::new().with_max_expansion_passes(0).validate().is_err());
    }

    #[test]
    fn test_strict_builder() {
        let options = Options::new().strict();
        assert_eq!(options.resolve_mode, ResolveMode::Strict);
        assert_eq!(options.missing_array, MissingArrayPolicy::Fail);
    }
}
