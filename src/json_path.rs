//! Definite JSON paths
//!
//! Parses path expressions like `list[0].group.name`, `$['odd key'][-1]` or
//! `list.length()` and evaluates them against a `serde_json::Value`.
//! Wildcards, slices, filters and deep scans are rejected: every path names
//! at most one value.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// One step of a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member (`.name`, `['name']`)
    Key(String),
    /// Array element; negative indices count from the end
    Index(i64),
    /// Trailing `.length()` function
    Length,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "['{}']", key.replace('\'', "\\'")),
            Segment::Index(index) => write!(f, "[{}]", index),
            Segment::Length => f.write_str(".length()"),
        }
    }
}

/// Syntax error in a path expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not parse path '{path}' at position {position}: {message}")]
pub struct PathError {
    pub path: String,
    pub position: usize,
    pub message: String,
}

/// Failure to evaluate a path against a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Syntax(#[from] PathError),

    #[error("No results for path: {path}")]
    Missing { path: String },

    #[error("Index {index} is out of bounds for {path} (length {len})")]
    IndexOutOfBounds { path: String, index: i64, len: usize },

    #[error("Expected {expected} at {path} but found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Document is not valid JSON: {0}")]
    Document(String),
}

/// A parsed, definite JSON path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path expression. A leading `$` is optional.
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        PathParser::new(expr).parse()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the path ends in `.length()`
    pub fn is_length(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Length))
    }

    /// Evaluate against `doc`. A `.length()` path yields a number.
    pub fn query<'v>(&self, doc: &'v Value) -> Result<Cow<'v, Value>, QueryError> {
        let mut current = doc;
        let mut trail = String::from("$");

        for segment in &self.segments {
            match segment {
                Segment::Key(key) => {
                    let map = current.as_object().ok_or_else(|| QueryError::TypeMismatch {
                        path: trail.clone(),
                        expected: "an object",
                        found: kind_of(current),
                    })?;
                    trail.push_str(&segment.to_string());
                    current = map
                        .get(key)
                        .ok_or_else(|| QueryError::Missing { path: trail.clone() })?;
                }
                Segment::Index(index) => {
                    let items = current.as_array().ok_or_else(|| QueryError::TypeMismatch {
                        path: trail.clone(),
                        expected: "an array",
                        found: kind_of(current),
                    })?;
                    let resolved = resolve_index(*index, items.len()).ok_or_else(|| {
                        QueryError::IndexOutOfBounds {
                            path: trail.clone(),
                            index: *index,
                            len: items.len(),
                        }
                    })?;
                    trail.push_str(&segment.to_string());
                    current = &items[resolved];
                }
                Segment::Length => {
                    let len = length_of(current, &trail)?;
                    return Ok(Cow::Owned(Value::from(len)));
                }
            }
        }

        Ok(Cow::Borrowed(current))
    }

    /// Number of elements of the array the path names. Any other value,
    /// strings included, is a type mismatch.
    pub fn array_length(&self, doc: &Value) -> Result<usize, QueryError> {
        let value = self.query(doc)?;
        value
            .as_array()
            .map(Vec::len)
            .ok_or_else(|| QueryError::TypeMismatch {
                path: self.to_string(),
                expected: "an array",
                found: kind_of(&value),
            })
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        (len as i64).checked_add(index)?
    } else {
        index
    };
    usize::try_from(resolved).ok().filter(|i| *i < len)
}

fn length_of(value: &Value, path: &str) -> Result<usize, QueryError> {
    match value {
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        Value::String(s) => Ok(s.chars().count()),
        other => Err(QueryError::TypeMismatch {
            path: path.to_string(),
            expected: "an array, object or string",
            found: kind_of(other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Recursive-descent parser over the path characters
struct PathParser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    segments: Vec<Segment>,
}

impl<'a> PathParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            segments: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<JsonPath, PathError> {
        if self.peek().is_none() {
            return Err(self.error("path is empty"));
        }
        if self.peek() == Some('$') {
            self.advance();
        } else if matches!(self.peek(), Some(c) if is_name_char(c)) {
            // Bare leading member: "name" is shorthand for "$.name"
            let name = self.read_name();
            self.push_name(name)?;
        }

        while let Some(c) = self.peek() {
            if matches!(self.segments.last(), Some(Segment::Length)) {
                return Err(self.error("length() must be the last segment"));
            }
            match c {
                '.' => {
                    self.advance();
                    match self.peek() {
                        Some('.') => return Err(self.error("deep scan '..' is not supported")),
                        Some(c) if is_name_char(c) => {
                            let name = self.read_name();
                            self.push_name(name)?;
                        }
                        _ => return Err(self.error("expected a property name after '.'")),
                    }
                }
                '[' => {
                    self.advance();
                    let segment = self.read_bracket()?;
                    self.segments.push(segment);
                }
                other => return Err(self.error(format!("unexpected character '{}'", other))),
            }
        }

        Ok(JsonPath {
            segments: self.segments,
        })
    }

    /// Push a member name, turning `length` followed by `()` into a function
    fn push_name(&mut self, name: String) -> Result<(), PathError> {
        if name == "*" {
            return Err(self.error("wildcards are not supported"));
        }
        if self.peek() == Some('(') {
            self.advance();
            if self.peek() != Some(')') {
                return Err(self.error("functions take no arguments"));
            }
            self.advance();
            if name != "length" {
                return Err(self.error(format!("unsupported function '{}()'", name)));
            }
            self.segments.push(Segment::Length);
            return Ok(());
        }
        self.segments.push(Segment::Key(name));
        Ok(())
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            self.advance();
        }
        name
    }

    fn read_bracket(&mut self) -> Result<Segment, PathError> {
        self.skip_whitespace();
        let segment = match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.advance();
                Segment::Key(self.read_quoted(quote)?)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => Segment::Index(self.read_index()?),
            Some('*') => return Err(self.error("wildcards are not supported")),
            Some(']') => {
                return Err(self.error("empty index '[]' has no element to select"));
            }
            Some(':') => return Err(self.error("array slices are not supported")),
            Some('?') => return Err(self.error("filters are not supported")),
            Some(other) => return Err(self.error(format!("unexpected character '{}'", other))),
            None => return Err(self.error("unterminated '['")),
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.advance();
                Ok(segment)
            }
            Some(',') => Err(self.error("multiple selections are not supported")),
            Some(':') => Err(self.error("array slices are not supported")),
            _ => Err(self.error("expected ']'")),
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, PathError> {
        let mut key = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated quoted name")),
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(escaped) => {
                            key.push(escaped);
                            self.advance();
                        }
                        None => return Err(self.error("unterminated escape")),
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(key);
                }
                Some(c) => {
                    key.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_index(&mut self) -> Result<i64, PathError> {
        let start = self.position();
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.advance();
        }
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        digits.parse::<i64>().map_err(|e| PathError {
            path: self.source.to_string(),
            position: start,
            message: format!("invalid index '{}': {}", digits, e),
        })
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) {
        self.chars.next();
    }

    fn position(&mut self) -> usize {
        let source = self.source;
        self.chars
            .peek()
            .map(|(i, _)| source[..*i].chars().count())
            .unwrap_or_else(|| source.chars().count())
    }

    fn error(&mut self, message: impl Into<String>) -> PathError {
        PathError {
            path: self.source.to_string(),
            position: self.position(),
            message: message.into(),
        }
    }
}

fn is_name_char(c: char) -> bool {
    !matches!(c, '.' | '[' | ']' | '(' | ')' | '$') && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "name": "Ocean College",
            "list": [
                {"name": "Zhang", "age": 18, "group": {"name": "Class 1"}},
                {"name": "Li", "age": 19, "group": {"name": "Class 2"}}
            ],
            "odd key": {"it's": true},
            "nothing": null
        })
    }

    #[test]
    fn test_parse_dotted_and_indexed() {
        let path = JsonPath::parse("list[1].group.name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("list".to_string()),
                Segment::Index(1),
                Segment::Key("group".to_string()),
                Segment::Key("name".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "$['list'][1]['group']['name']");
    }

    #[test]
    fn test_parse_dollar_prefix_is_optional() {
        assert_eq!(
            JsonPath::parse("$.list[0]").unwrap(),
            JsonPath::parse("list[0]").unwrap()
        );
        assert!(JsonPath::parse("$").unwrap().segments().is_empty());
    }

    #[test]
    fn test_parse_quoted_keys() {
        let path = JsonPath::parse(r#"$['odd key']["it\'s"]"#).unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("odd key".to_string()),
                Segment::Key("it's".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_length_function() {
        let path = JsonPath::parse("list.length()").unwrap();
        assert!(path.is_length());
        assert_eq!(path.to_string(), "$['list'].length()");
    }

    #[test]
    fn test_parse_rejects_indefinite_paths() {
        for expr in ["list[*].name", "list[]", "$..name", "list[0:1]", "list[?(@.a)]", "list[0,1]"] {
            assert!(JsonPath::parse(expr).is_err(), "{} should be rejected", expr);
        }
    }

    #[test]
    fn test_parse_rejects_segment_after_length() {
        let err = JsonPath::parse("list.length().x").unwrap_err();
        assert!(err.message.contains("last segment"));
    }

    #[test]
    fn test_parse_rejects_unknown_function() {
        let err = JsonPath::parse("list.size()").unwrap_err();
        assert!(err.message.contains("size"));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = JsonPath::parse("list[0").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.to_string().contains("list[0"));
    }

    #[test]
    fn test_query_values() {
        let doc = doc();
        let q = |p: &str| JsonPath::parse(p).unwrap().query(&doc).unwrap().into_owned();
        assert_eq!(q("name"), json!("Ocean College"));
        assert_eq!(q("list[0].age"), json!(18));
        assert_eq!(q("list[-1].group.name"), json!("Class 2"));
        assert_eq!(q("$['odd key']['it\\'s']"), json!(true));
        assert_eq!(q("list.length()"), json!(2));
    }

    #[test]
    fn test_query_missing_member() {
        let err = JsonPath::parse("list[1].notExist")
            .unwrap()
            .query(&doc())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No results for path: $['list'][1]['notExist']"
        );
    }

    #[test]
    fn test_query_index_out_of_bounds() {
        let err = JsonPath::parse("list[5]").unwrap().query(&doc()).unwrap_err();
        assert_eq!(
            err,
            QueryError::IndexOutOfBounds {
                path: "$['list']".to_string(),
                index: 5,
                len: 2
            }
        );
        assert!(JsonPath::parse("list[-3]").unwrap().query(&doc()).is_err());
    }

    #[test]
    fn test_query_type_mismatch() {
        let err = JsonPath::parse("name[0]").unwrap().query(&doc()).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { found: "a string", .. }));

        let err = JsonPath::parse("nothing.inner").unwrap().query(&doc()).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { found: "null", .. }));
    }

    #[test]
    fn test_array_length_accepts_arrays_only() {
        let doc = doc();
        let len = |p: &str| JsonPath::parse(p).unwrap().array_length(&doc);
        assert_eq!(len("list"), Ok(2));
        assert_eq!(
            len("name"),
            Err(QueryError::TypeMismatch {
                path: "$['name']".to_string(),
                expected: "an array",
                found: "a string",
            })
        );
        assert!(len("list[0]").is_err());
        assert!(len("list.length()").is_err());
        assert!(len("nothing").is_err());
        assert!(len("missing").is_err());
    }

    #[test]
    fn test_length_function_on_strings_and_objects() {
        let doc = doc();
        let q = |p: &str| JsonPath::parse(p).unwrap().query(&doc).unwrap().into_owned();
        assert_eq!(q("name.length()"), json!(13));
        assert_eq!(q("list[0].length()"), json!(3));
    }

    #[test]
    fn test_parse_rejects_empty_path() {
        let err = JsonPath::parse("").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("empty"));
        assert!(JsonPath::parse("$").is_ok());
    }
}
