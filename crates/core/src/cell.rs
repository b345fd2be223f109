//! Coercion of loosely-typed source cells.
//!
//! Upstream tables deliver cells as JSON values whose runtime type is not
//! guaranteed (numbers may arrive as strings, blanks as `null`). Every field the
//! pipeline reads goes through one of the two coercions below, so a bad cell
//! degrades to a default instead of failing the row.

use serde_json::{Number, Value};

/// Coerce a cell to a number.
///
/// - numbers pass through
/// - strings are trimmed and parsed (`""` is 0, `"Infinity"` is accepted)
/// - booleans become 1 / 0
/// - anything else, or anything that is not a number, becomes 0
pub fn number(cell: Option<&Value>) -> f64 {
    let n = match cell {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n.is_nan() { 0.0 } else { n }
}

/// Coerce a cell to display text. Missing and `null` cells become `""`.
///
/// Numbers are rendered canonically, so `101`, `101.0` and `1.01e2` all read
/// `"101"` and join as the same key.
pub fn text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => canonical_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // f64 Display drops a zero fraction and never uses exponent notation.
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn parse_numeric_text(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // `f64::from_str` also accepts "inf"/"nan" spellings; source data never means those.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(number(Some(&json!(12))), 12.0);
        assert_eq!(number(Some(&json!(-3.5))), -3.5);
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(number(Some(&json!("42"))), 42.0);
        assert_eq!(number(Some(&json!("  7.25 "))), 7.25);
        assert_eq!(number(Some(&json!("1e2"))), 100.0);
        assert_eq!(number(Some(&json!("-Infinity"))), f64::NEG_INFINITY);
    }

    #[test]
    fn junk_defaults_to_zero() {
        assert_eq!(number(None), 0.0);
        assert_eq!(number(Some(&Value::Null)), 0.0);
        assert_eq!(number(Some(&json!(""))), 0.0);
        assert_eq!(number(Some(&json!("n/a"))), 0.0);
        assert_eq!(number(Some(&json!("nan"))), 0.0);
        assert_eq!(number(Some(&json!("inf"))), 0.0);
        assert_eq!(number(Some(&json!([1, 2]))), 0.0);
        assert_eq!(number(Some(&json!({"a": 1}))), 0.0);
    }

    #[test]
    fn booleans_coerce_like_flags() {
        assert_eq!(number(Some(&json!(true))), 1.0);
        assert_eq!(number(Some(&json!(false))), 0.0);
    }

    #[test]
    fn text_renders_scalars() {
        assert_eq!(text(Some(&json!("Store 12"))), "Store 12");
        assert_eq!(text(Some(&json!(1042))), "1042");
        assert_eq!(text(Some(&json!(true))), "true");
        assert_eq!(text(Some(&Value::Null)), "");
        assert_eq!(text(None), "");
    }

    #[test]
    fn numerically_equal_keys_render_alike() {
        assert_eq!(text(Some(&json!(101))), "101");
        assert_eq!(text(Some(&json!(101.0))), "101");
        assert_eq!(text(Some(&serde_json::from_str::<Value>("1e2").unwrap())), "100");
        assert_eq!(text(Some(&json!(-0.0))), "0");
        assert_eq!(text(Some(&json!(2.5))), "2.5");
        assert_eq!(text(Some(&json!(u64::MAX))), u64::MAX.to_string());
    }
}
