//! Partitioning records by key.

use crate::accessor::{property, Accessor, Specs};
use crate::error::QueryError;
use serde_json::{Map, Value};
use sift_expr::util::to_js_string;
use sift_expr::{ExprError, JsValue};
use std::collections::HashMap;

const EMPTY_GROUP_BY: &str = "groupBy expects at least one expression";

/// String form of a key value. `null` and `undefined` read as `""`, the
/// way array joins print them.
fn key_string(value: &JsValue) -> String {
    match value {
        JsValue::Undefined | JsValue::Json(Value::Null) => String::new(),
        v => to_js_string(v),
    }
}

/// One bucket produced by [`GroupBy::group`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    key: Vec<String>,
    fields: Map<String, Value>,
    members: Vec<usize>,
}

impl GroupEntry {
    /// The stringified key tuple.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Key values by accessor name, as first seen.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Positions of the member rows in the grouped slice, in input order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn into_record(self) -> Map<String, Value> {
        self.fields
    }
}

#[derive(Debug, Clone)]
pub struct GroupBy {
    keys: Vec<Accessor>,
}

/// Groups on one or more keys, each read with [`property`].
pub fn group_by(specs: impl Into<Specs>) -> Result<GroupBy, QueryError> {
    let keys: Vec<Accessor> = specs.into().into_iter().map(property).collect();
    if keys.is_empty() {
        return Err(QueryError::InvalidGroupBy(EMPTY_GROUP_BY.to_string()));
    }
    Ok(GroupBy { keys })
}

impl GroupBy {
    pub fn keys(&self) -> &[Accessor] {
        &self.keys
    }

    /// Buckets `rows` in first-seen key order.
    ///
    /// Key values compare by their string conversion, so `1` and `"1"` land
    /// in the same bucket, as do `null`, a missing key and `""`. The bucket
    /// keeps the first raw values it saw.
    pub fn group(&self, rows: &[JsValue]) -> Result<Vec<GroupEntry>, ExprError> {
        let mut lookup: HashMap<Vec<String>, usize> = HashMap::new();
        let mut entries: Vec<GroupEntry> = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let values = self
                .keys
                .iter()
                .map(|k| k.call(row))
                .collect::<Result<Vec<_>, _>>()?;
            let key: Vec<String> = values.iter().map(key_string).collect();
            if let Some(&at) = lookup.get(&key) {
                entries[at].members.push(i);
                continue;
            }
            let mut fields = Map::with_capacity(self.keys.len());
            for (k, v) in self.keys.iter().zip(values) {
                fields.insert(k.name().to_string(), v.into_json());
            }
            lookup.insert(key.clone(), entries.len());
            entries.push(GroupEntry {
                key,
                fields,
                members: vec![i],
            });
        }
        tracing::debug!(
            target: "sift_query::group",
            rows = rows.len(),
            groups = entries.len(),
            "grouped rows"
        );
        Ok(entries)
    }

    /// [`GroupBy::group`] over JSON rows.
    pub fn group_values(&self, rows: &[Value]) -> Result<Vec<GroupEntry>, ExprError> {
        let rows: Vec<JsValue> = rows.iter().cloned().map(JsValue::Json).collect();
        self.group(&rows)
    }
}

/// Nested grouping: one object level per key, arrays of rows at the leaves.
#[derive(Debug, Clone)]
pub struct Nest {
    keys: Vec<Accessor>,
}

/// Builds a [`Nest`]; the keys are read with [`property`].
pub fn nest(specs: impl Into<Specs>) -> Result<Nest, QueryError> {
    let keys: Vec<Accessor> = specs.into().into_iter().map(property).collect();
    if keys.is_empty() {
        return Err(QueryError::InvalidGroupBy(EMPTY_GROUP_BY.to_string()));
    }
    Ok(Nest { keys })
}

impl Nest {
    pub fn apply(&self, rows: &[Value]) -> Result<Value, ExprError> {
        self.level(rows.to_vec(), 0)
    }

    fn level(&self, rows: Vec<Value>, depth: usize) -> Result<Value, ExprError> {
        let Some(key_fn) = self.keys.get(depth) else {
            return Ok(Value::Array(rows));
        };
        let mut buckets: Map<String, Value> = Map::new();
        for row in rows {
            let key = key_string(&key_fn.call_json(&row)?);
            match buckets.get_mut(&key) {
                Some(Value::Array(members)) => members.push(row),
                _ => {
                    buckets.insert(key, Value::Array(vec![row]));
                }
            }
        }
        if depth + 1 == self.keys.len() {
            return Ok(Value::Object(buckets));
        }
        let mut out = Map::with_capacity(buckets.len());
        for (key, members) in buckets {
            let members = match members {
                Value::Array(items) => items,
                other => vec![other],
            };
            out.insert(key, self.level(members, depth + 1)?);
        }
        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_strings_share_a_bucket() {
        let g = group_by("k").unwrap();
        let groups = g.group_values(&[json!({"k": 1}), json!({"k": "1"})]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fields()["k"], json!(1));
        assert_eq!(groups[0].members(), &[0, 1]);
    }

    #[test]
    fn null_missing_and_empty_keys_share_a_bucket() {
        let g = group_by("foo").unwrap();
        let groups = g
            .group_values(&[json!({"foo": null}), json!({}), json!({"foo": ""})])
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key(), &[String::new()]);
        assert_eq!(groups[0].fields()["foo"], json!(null));
        assert_eq!(groups[0].members(), &[0, 1, 2]);

        let nested = nest("foo").unwrap().apply(&[json!({}), json!({"foo": null})]).unwrap();
        assert_eq!(nested, json!({"": [{}, {"foo": null}]}));
    }

    #[test]
    fn separator_in_values_does_not_collide() {
        let g = group_by(["a", "b"]).unwrap();
        let groups = g
            .group_values(&[json!({"a": "x/y", "b": "z"}), json!({"a": "x", "b": "y/z"})])
            .unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn nest_two_levels() {
        let rows = [
            json!({"a": 1, "b": "x"}),
            json!({"a": 1, "b": "y"}),
            json!({"a": 2, "b": "x"}),
        ];
        let nested = nest(["a", "b"]).unwrap().apply(&rows).unwrap();
        assert_eq!(
            nested,
            json!({
                "1": {"x": [rows[0]], "y": [rows[1]]},
                "2": {"x": [rows[2]]}
            })
        );
    }

    #[test]
    fn empty_key_list() {
        let specs: Vec<&str> = vec![];
        assert!(matches!(group_by(specs.clone()), Err(QueryError::InvalidGroupBy(_))));
        assert!(matches!(nest(specs), Err(QueryError::InvalidGroupBy(_))));
    }
}
