//! Helpers for records (JSON objects): merging, value listing, and
//! conversion between positional lists and keyed records.

use serde_json::{Map, Value};

/// Copies every key of each `other` record into `target`, later records
/// overwriting earlier ones. Returns `target` for chaining.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Map};
/// use sift_util::extend;
///
/// let mut target = Map::new();
/// let extension = json!({"foo": "bar"});
/// extend(&mut target, [extension.as_object().unwrap()]);
/// assert_eq!(target.get("foo"), Some(&json!("bar")));
/// ```
pub fn extend<'a, I>(target: &mut Map<String, Value>, others: I) -> &mut Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    for other in others {
        for (key, value) in other {
            target.insert(key.clone(), value.clone());
        }
    }
    target
}

/// Returns the values of `record` in key order.
pub fn values(record: &Map<String, Value>) -> Vec<Value> {
    record.values().cloned().collect()
}

/// Builds a record pairing each key with the list item at the same position.
/// Keys past the end of `list` map to `null`.
pub fn delist<S: AsRef<str>>(list: &[Value], keys: &[S]) -> Map<String, Value> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let value = list.get(i).cloned().unwrap_or(Value::Null);
            (key.as_ref().to_string(), value)
        })
        .collect()
}

/// Reads `keys` out of `record` in order; missing keys yield `null`.
pub fn enlist<S: AsRef<str>>(record: &Map<String, Value>, keys: &[S]) -> Vec<Value> {
    keys.iter()
        .map(|key| record.get(key.as_ref()).cloned().unwrap_or(Value::Null))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture is not an object"),
        }
    }

    #[test]
    fn extend_overwrites_in_order() {
        let mut target = obj(json!({"a": 1}));
        let b = obj(json!({"a": 2, "b": 1}));
        let c = obj(json!({"b": 3}));
        extend(&mut target, [&b, &c]);
        assert_eq!(Value::Object(target), json!({"a": 2, "b": 3}));
    }

    #[test]
    fn delist_and_enlist_are_inverse() {
        let keys = ["a", "b"];
        let record = delist(&[json!(1), json!(2)], &keys);
        assert_eq!(Value::Object(record.clone()), json!({"a": 1, "b": 2}));
        assert_eq!(enlist(&record, &keys), vec![json!(1), json!(2)]);
    }

    #[test]
    fn enlist_missing_key_is_null() {
        let record = obj(json!({"a": 1}));
        assert_eq!(enlist(&record, &["a", "z"]), vec![json!(1), json!(null)]);
    }

    #[test]
    fn values_follow_insertion_order() {
        let record = obj(json!({"z": 1, "a": 2}));
        assert_eq!(values(&record), vec![json!(1), json!(2)]);
    }
}
