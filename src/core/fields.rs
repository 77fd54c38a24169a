//! `column=value` arguments from the command line.

use crate::db::{FieldMap, Value};
use crate::errors::{AppError, AppResult};

/// Infer a value from its command-line spelling.
///
/// `NULL` → null, `true`/`false` → bool, integers and decimals → numbers,
/// `'...'` or `"..."` → the quoted text, anything else → text.
pub fn parse_value(raw: &str) -> Value {
    let s = raw.trim();

    if s.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if s == "true" {
        return Value::Bool(true);
    }
    if s == "false" {
        return Value::Bool(false);
    }

    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return Value::Text(s[1..s.len() - 1].to_string());
        }
    }

    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if s.contains(['.', 'e', 'E'])
        && let Ok(f) = s.parse::<f64>()
        && f.is_finite()
    {
        return Value::Real(f);
    }

    Value::Text(s.to_string())
}

/// Split `name=value` at the first `=`.
pub fn parse_assignment(arg: &str) -> AppResult<(String, Value)> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| AppError::Validation(format!("expected column=value, got '{arg}'")))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("missing column name in '{arg}'")));
    }

    Ok((name.to_string(), parse_value(raw)))
}

pub fn parse_assignments(args: &[String]) -> AppResult<FieldMap> {
    let mut fields = FieldMap::new();
    for arg in args {
        let (name, value) = parse_assignment(arg)?;
        fields.insert(name, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_types() {
        assert_eq!(parse_value("30"), Value::Integer(30));
        assert_eq!(parse_value("-7"), Value::Integer(-7));
        assert_eq!(parse_value("2.5"), Value::Real(2.5));
        assert_eq!(parse_value("1e3"), Value::Real(1000.0));
        assert_eq!(parse_value("NULL"), Value::Null);
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("Alice"), Value::from("Alice"));
        assert_eq!(parse_value("'30'"), Value::from("30"));
        assert_eq!(parse_value("\"null\""), Value::from("null"));
        assert_eq!(parse_value("inf"), Value::from("inf"));
    }

    #[test]
    fn splits_on_first_equals() {
        let (name, value) = parse_assignment("note=a=b").unwrap();
        assert_eq!(name, "note");
        assert_eq!(value, Value::from("a=b"));
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(parse_assignment("age").unwrap_err().is_validation());
        assert!(parse_assignment("=5").unwrap_err().is_validation());
    }

    #[test]
    fn later_duplicates_replace_earlier() {
        let args = vec!["age=30".to_string(), "name=Bob".into(), "age=31".into()];
        let fields = parse_assignments(&args).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("age"), Some(&Value::Integer(31)));
    }
}
