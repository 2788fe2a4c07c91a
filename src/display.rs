//! Canonical text form of JSON values written into cells

use serde_json::Value;

/// Render a JSON value as cell text.
///
/// Strings pass through unquoted, numbers keep their source form (`18`,
/// `1.5`, `2.0`), booleans become `true`/`false` and `null` becomes an empty
/// string. Arrays and objects are written as compact JSON.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(to_display_string(&json!("Zhang")), "Zhang");
        assert_eq!(to_display_string(&json!(18)), "18");
        assert_eq!(to_display_string(&json!(-3)), "-3");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!(true)), "true");
        assert_eq!(to_display_string(&json!(null)), "");
    }

    #[test]
    fn test_number_keeps_source_form() {
        let value: Value = serde_json::from_str("2.0").unwrap();
        assert_eq!(to_display_string(&value), "2.0");
    }

    #[test]
    fn test_containers_are_compact_json() {
        assert_eq!(to_display_string(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(to_display_string(&json!({"k": null})), r#"{"k":null}"#);
    }
}
