//! Recursive list flattening.
//!
//! Nested arrays are spliced into their parent in order; non-array values are
//! kept as they are. Flattening an already-flat list returns it unchanged.

use serde_json::Value;

/// Flattens `values` recursively into a new vector.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sift_util::flatten;
///
/// let flat = flatten(&[json!(1), json!([2, [3, [[4]]]])]);
/// assert_eq!(flat, vec![json!(1), json!(2), json!(3), json!(4)]);
/// ```
pub fn flatten(values: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        flatten_into(value, &mut out);
    }
    out
}

/// Pushes the leaves of `value` onto `out`, descending into arrays.
pub fn flatten_into(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        other => out.push(other.clone()),
    }
}
