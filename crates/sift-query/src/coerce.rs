//! Value coercion and per-key record coercion.

use crate::error::QueryError;
use crate::is;
use serde_json::{Map, Value};
use sift_expr::util::{f64_to_json, to_js_string, to_number as js_to_number};
use sift_expr::JsValue;
use std::str::FromStr;

/// Host string conversion.
pub fn to_string(d: &JsValue) -> Value {
    Value::String(to_js_string(d))
}

/// Numeric conversion where NaN becomes `0`.
pub fn to_number(d: &JsValue) -> Value {
    let n = js_to_number(d);
    if n.is_nan() {
        Value::from(0)
    } else {
        f64_to_json(n)
    }
}

/// Largest `length` an array can have.
const MAX_LIST_LEN: f64 = 4_294_967_295.0;

/// Copies list-likes into an array and wraps anything else.
///
/// Objects with a numeric `length` count as list-likes: their index keys
/// `"0"` up to `length` become the elements. A `length` past the array
/// limit does not describe a list, so such objects are wrapped too.
pub fn to_list(d: &JsValue) -> Value {
    match d {
        JsValue::Json(Value::Array(items)) => Value::Array(items.clone()),
        JsValue::Json(Value::Object(obj)) if is::list(d) => {
            match obj.get("length").and_then(Value::as_f64) {
                Some(len) if len <= MAX_LIST_LEN => {
                    let len = if len > 0.0 { len as usize } else { 0 };
                    Value::Array(
                        (0..len)
                            .map(|i| obj.get(&i.to_string()).cloned().unwrap_or(Value::Null))
                            .collect(),
                    )
                }
                _ => Value::Array(vec![d.clone().into_json()]),
            }
        }
        other => Value::Array(vec![other.clone().into_json()]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceKind {
    String,
    Number,
    List,
}

impl CoerceKind {
    pub fn apply(self, d: &JsValue) -> Value {
        match self {
            CoerceKind::String => to_string(d),
            CoerceKind::Number => to_number(d),
            CoerceKind::List => to_list(d),
        }
    }
}

impl FromStr for CoerceKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(CoerceKind::String),
            "number" => Ok(CoerceKind::Number),
            "list" => Ok(CoerceKind::List),
            _ => Err(QueryError::InvalidCoercion(s.to_string())),
        }
    }
}

/// Rewrites one field of a record in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCoercion {
    key: String,
    kind: CoerceKind,
}

impl KeyCoercion {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> CoerceKind {
        self.kind
    }

    /// A missing field is coerced from `undefined`.
    pub fn apply(&self, record: &mut Map<String, Value>) {
        let current = record
            .get(&self.key)
            .map(|v| JsValue::Json(v.clone()))
            .unwrap_or(JsValue::Undefined);
        record.insert(self.key.clone(), self.kind.apply(&current));
    }
}

/// ```
/// use serde_json::json;
/// use sift_query::coerce::{coerce_key, CoerceKind};
///
/// let mut d = json!({"foo": "2"});
/// coerce_key("foo", CoerceKind::Number).apply(d.as_object_mut().unwrap());
/// assert_eq!(d, json!({"foo": 2}));
/// ```
pub fn coerce_key(key: impl Into<String>, kind: CoerceKind) -> KeyCoercion {
    KeyCoercion {
        key: key.into(),
        kind,
    }
}

/// A list of per-key coercions applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCoercion {
    ops: Vec<KeyCoercion>,
}

impl ObjectCoercion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>, kind: CoerceKind) -> Self {
        self.ops.push(coerce_key(key, kind));
        self
    }

    /// Like [`ObjectCoercion::key`] with the kind given by name.
    pub fn key_named(self, key: impl Into<String>, kind: &str) -> Result<Self, QueryError> {
        Ok(self.key(key, kind.parse()?))
    }

    pub fn apply(&self, record: &mut Map<String, Value>) {
        for op in &self.ops {
            op.apply(record);
        }
    }

    /// Coerces `d` if it is an object; other values are left alone.
    pub fn apply_value(&self, d: &mut Value) {
        if let Value::Object(record) = d {
            self.apply(record);
        }
    }
}
