use serde_json::{Map, Value};

/// Check if a serde_json::Map is empty (has no own properties).
pub fn is_empty_map(obj: &Map<String, Value>) -> bool {
    obj.is_empty()
}

/// Loose emptiness of a JSON value.
///
/// Falsy scalars (`null`, `false`, `0`, `""`) are empty, as are arrays of
/// length zero and objects with no keys. An object carrying a numeric
/// `length` field is treated as list-like and is empty only when that length
/// is zero.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sift_util::is_empty_value;
///
/// assert!(is_empty_value(&json!({})));
/// assert!(is_empty_value(&json!("")));
/// assert!(!is_empty_value(&json!({"length": 1})));
/// assert!(!is_empty_value(&json!([null])));
/// ```
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => match map.get("length") {
            Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f == 0.0),
            _ => is_empty_map(map),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&json!({})));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!(0)));

        assert!(!is_empty_value(&json!({"foo": "bar"})));
        assert!(!is_empty_value(&json!("foo")));
        assert!(!is_empty_value(&json!([1, 2, 3])));
        assert!(!is_empty_value(&json!({"length": 1})));
        assert!(is_empty_value(&json!({"length": 0})));
    }
}
