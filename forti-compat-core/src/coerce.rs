//! Total conversions between device payload values and state values.
//!
//! The device encodes numbers as JSON numbers in some firmware builds and as
//! strings or single-element lists in others. Every function here accepts any
//! [`Value`] and falls back to a fixed default instead of failing.

use serde_json::{Number, Value};

/// The string payload, or `""` for any other shape.
pub fn string_value(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

/// The numeric payload truncated to an integer, or 0 for any other shape and
/// for integers that do not fit in an `i64`.
pub fn int_value(value: &Value) -> i64 {
    number_to_int(value).unwrap_or(0)
}

fn number_to_int(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    // Above i64::MAX.
    if let Some(u) = n.as_u64() {
        return i64::try_from(u).ok();
    }
    n.as_f64().map(|f| f as i64)
}

/// Collapse a list-encoded integer into a scalar.
///
/// - a non-empty list yields its first element;
/// - an empty list is returned unchanged;
/// - `""` yields 0 and a decimal string yields its integer;
/// - anything else is returned unchanged.
pub fn list_to_scalar(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        Value::String(s) if s.is_empty() => Value::from(0),
        Value::String(s) => match s.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

/// Join a list of numbers as space-separated integers.
///
/// Non-numeric elements are skipped and any non-list input yields `""`.
pub fn int_list_to_string(value: &Value) -> String {
    let Value::Array(items) = value else {
        return String::new();
    };
    items
        .iter()
        .filter_map(number_to_int)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a space-separated integer string back into a list of numbers.
///
/// Tokens that are not integers are skipped, mirroring
/// [`int_list_to_string`].
pub fn string_to_int_list(value: &str) -> Value {
    Value::Array(
        value
            .split_whitespace()
            .filter_map(|token| token.parse::<i64>().ok())
            .map(|n| Value::Number(Number::from(n)))
            .collect(),
    )
}

/// Whether a server-reported value has a shape the state layer can hold.
///
/// Strings, numbers and lists (even empty) count as present; `null`, booleans
/// and objects do not. Used to tell a benign representation difference from a
/// real read failure.
pub fn is_present(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{
        int_list_to_string, int_value, is_present, list_to_scalar, string_to_int_list,
        string_value,
    };

    #[test]
    fn list_to_scalar_cases() {
        assert_eq!(list_to_scalar(json!([])), json!([]));
        assert_eq!(list_to_scalar(json!(["x"])), json!("x"));
        assert_eq!(list_to_scalar(json!([7, 8])), json!(7));
        assert_eq!(list_to_scalar(json!("")), json!(0));
        assert_eq!(list_to_scalar(json!("42")), json!(42));
        assert_eq!(list_to_scalar(json!("-3")), json!(-3));
        assert_eq!(list_to_scalar(json!("port1")), json!("port1"));
        assert_eq!(list_to_scalar(json!(5)), json!(5));
        assert_eq!(list_to_scalar(Value::Null), Value::Null);
    }

    #[test]
    fn int_list_skips_non_numbers() {
        assert_eq!(int_list_to_string(&json!([1, 2.9, "x", 30])), "1 2 30");
        assert_eq!(int_list_to_string(&json!([])), "");
        assert_eq!(int_list_to_string(&json!("1 2")), "");
    }

    #[test]
    fn string_to_int_list_parses_tokens() {
        assert_eq!(string_to_int_list("1  2 x 30"), json!([1, 2, 30]));
        assert_eq!(string_to_int_list(""), json!([]));
    }

    #[test]
    fn loose_readers_default() {
        assert_eq!(string_value(&json!("a")), "a");
        assert_eq!(string_value(&json!(1)), "");
        assert_eq!(int_value(&json!(12.7)), 12);
        assert_eq!(int_value(&json!("12")), 0);
        assert_eq!(int_value(&Value::Null), 0);
        assert_eq!(int_value(&json!(u64::MAX)), 0);
        assert_eq!(int_value(&json!(i64::MAX as u64 + 1)), 0);
        assert_eq!(int_value(&json!(i64::MAX)), i64::MAX);
    }

    #[test]
    fn presence_by_shape() {
        assert!(is_present(&json!("")));
        assert!(is_present(&json!(0)));
        assert!(is_present(&json!([])));
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!(true)));
        assert!(!is_present(&json!({})));
    }
}
