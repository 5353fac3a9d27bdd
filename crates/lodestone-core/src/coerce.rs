//! Tolerant field coercion for noisy catalog metadata.
//!
//! Catalog data routinely carries null-token strings ("nan", "none",
//! "null"), stray whitespace, and numbers encoded as text. These functions
//! coerce raw JSON values into typed optionals with defined
//! failure-to-absent semantics: a malformed value becomes `None`/empty,
//! never an error and never a zero stand-in.

use serde_json::Value;

/// True when a trimmed string is one of the null tokens that noisy
/// exports use for missing values.
pub fn is_null_token(s: &str) -> bool {
    s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null")
}

/// Coerce a scalar JSON value to a trimmed, non-empty string.
///
/// Null tokens collapse to `None`. Arrays and objects are not scalars and
/// yield `None`.
pub fn opt_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if s.is_empty() || is_null_token(&s) {
        return None;
    }
    Some(s)
}

/// Leniently parse a JSON value as a float.
///
/// Accepts numbers and numeric strings; null tokens, empty strings, and
/// unparsable text yield `None` -- never zero, never an error.
pub fn opt_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || is_null_token(s) {
                return None;
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Pass a JSON value through as a list of clean strings.
///
/// Only proper arrays qualify; each element goes through [`opt_string`]
/// and empties are dropped. Anything that is not an array yields `[]`.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(opt_string).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opt_string_trims_and_collapses_null_tokens() {
        assert_eq!(opt_string(&json!("  Oak desk  ")), Some("Oak desk".to_string()));
        assert_eq!(opt_string(&json!("NaN")), None);
        assert_eq!(opt_string(&json!("none")), None);
        assert_eq!(opt_string(&json!("NULL")), None);
        assert_eq!(opt_string(&json!("")), None);
        assert_eq!(opt_string(&json!("   ")), None);
        assert_eq!(opt_string(&Value::Null), None);
    }

    #[test]
    fn test_opt_string_coerces_scalars() {
        assert_eq!(opt_string(&json!(42)), Some("42".to_string()));
        assert_eq!(opt_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(opt_string(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_opt_string_rejects_compounds() {
        assert_eq!(opt_string(&json!(["a"])), None);
        assert_eq!(opt_string(&json!({"k": "v"})), None);
    }

    #[test]
    fn test_opt_f64_lenient_parse() {
        assert_eq!(opt_f64(&json!(12.5)), Some(12.5));
        assert_eq!(opt_f64(&json!("12.5")), Some(12.5));
        assert_eq!(opt_f64(&json!(" 99 ")), Some(99.0));
    }

    #[test]
    fn test_opt_f64_absent_never_zero() {
        assert_eq!(opt_f64(&Value::Null), None);
        assert_eq!(opt_f64(&json!("nan")), None);
        assert_eq!(opt_f64(&json!("")), None);
        assert_eq!(opt_f64(&json!("$12")), None);
        assert_eq!(opt_f64(&json!(["12"])), None);
    }

    #[test]
    fn test_string_list_passes_only_arrays() {
        assert_eq!(
            string_list(&json!(["a", " b ", "", "nan"])),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(string_list(&json!("a, b")).is_empty());
        assert!(string_list(&Value::Null).is_empty());
        assert!(string_list(&json!(7)).is_empty());
    }
}
