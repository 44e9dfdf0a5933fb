//! Type predicates.

use crate::accessor::Accessor;
use crate::cmp::type_of;
use crate::error::QueryError;
use serde_json::Value;
use sift_expr::util::is_truthy;
use sift_expr::JsValue;

fn json(d: &JsValue) -> Option<&Value> {
    d.as_json()
}

fn as_f64(d: &JsValue) -> Option<f64> {
    match d {
        JsValue::NonFinite(n) => Some(*n),
        JsValue::Json(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

pub fn number(d: &JsValue) -> bool {
    as_f64(d).is_some_and(|n| !n.is_nan())
}

pub fn string(d: &JsValue) -> bool {
    matches!(json(d), Some(Value::String(_)))
}

pub fn bool(d: &JsValue) -> bool {
    matches!(json(d), Some(Value::Bool(_)))
}

/// Objects and arrays; not `null`.
pub fn object(d: &JsValue) -> bool {
    matches!(json(d), Some(Value::Object(_) | Value::Array(_)))
}

pub fn array(d: &JsValue) -> bool {
    matches!(json(d), Some(Value::Array(_)))
}

/// Arrays, and objects carrying a numeric `length`.
pub fn list(d: &JsValue) -> bool {
    match json(d) {
        Some(Value::Array(_)) => true,
        Some(Value::Object(obj)) => matches!(obj.get("length"), Some(Value::Number(_))),
        _ => false,
    }
}

/// Neither `null` nor `undefined`.
pub fn defined(d: &JsValue) -> bool {
    !undef(d)
}

/// `null` or `undefined`.
pub fn undef(d: &JsValue) -> bool {
    matches!(d, JsValue::Undefined | JsValue::Json(Value::Null))
}

pub fn nil(d: &JsValue) -> bool {
    matches!(d, JsValue::Json(Value::Null))
}

/// Falsy values, zero-length lists and objects without keys.
pub fn empty(d: &JsValue) -> bool {
    if !is_truthy(d) {
        return true;
    }
    match d {
        JsValue::Json(v) => sift_util::is_empty_value(v),
        _ => false,
    }
}

pub fn integer(d: &JsValue) -> bool {
    as_f64(d).is_some_and(|n| n % 1.0 == 0.0)
}

pub fn floating(d: &JsValue) -> bool {
    as_f64(d).is_some_and(|n| n.is_finite() && n % 1.0 != 0.0)
}

type Predicate = fn(&JsValue) -> bool;

const PREDICATES: &[(&str, Predicate)] = &[
    ("number", number),
    ("string", string),
    ("bool", bool),
    ("object", object),
    ("array", array),
    ("list", list),
    ("defined", defined),
    ("undef", undef),
    ("nil", nil),
    ("empty", empty),
    ("integer", integer),
    ("floating", floating),
];

fn lookup(name: &str) -> Option<Predicate> {
    PREDICATES.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

/// The named predicate as an accessor. Unknown names compare the type
/// name instead, as [`type_of`] does.
pub fn by_name(name: &str) -> Accessor {
    match lookup(name) {
        Some(p) => Accessor::from_fn(name, move |d| JsValue::from(p(d))),
        None => type_of(name),
    }
}

/// The negation of a named predicate, aliased `"!" + name`.
pub fn is_not(name: &str) -> Result<Accessor, QueryError> {
    let p = lookup(name).ok_or_else(|| QueryError::InvalidIsMethod(name.to_string()))?;
    Ok(Accessor::from_fn(format!("!{}", name), move |d| {
        JsValue::from(!p(d))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(value: Value) -> JsValue {
        JsValue::Json(value)
    }

    #[test]
    fn scalar_types() {
        assert!(number(&v(json!(1.5))));
        assert!(!number(&v(json!("1"))));
        assert!(bool(&v(json!(false))));
        assert!(object(&v(json!([]))));
        assert!(!object(&v(json!(null))));
        assert!(list(&v(json!({"length": 0}))));
        assert!(!list(&v(json!("abc"))));
    }

    #[test]
    fn non_finite_numbers() {
        assert!(number(&JsValue::NonFinite(f64::INFINITY)));
        assert!(!number(&JsValue::NonFinite(f64::NAN)));
        assert!(!integer(&JsValue::NonFinite(f64::INFINITY)));
        assert!(!floating(&JsValue::NonFinite(f64::NEG_INFINITY)));
    }

    #[test]
    fn undef_and_nil() {
        assert!(undef(&JsValue::Undefined));
        assert!(undef(&v(json!(null))));
        assert!(nil(&v(json!(null))));
        assert!(!nil(&JsValue::Undefined));
        assert!(defined(&v(json!(0))));
    }

    #[test]
    fn emptiness() {
        assert!(empty(&JsValue::Undefined));
        assert!(empty(&v(json!(0))));
        assert!(empty(&v(json!({}))));
        assert!(empty(&v(json!({"length": 0, "x": 1}))));
        assert!(!empty(&v(json!([0]))));
    }

    #[test]
    fn integer_and_floating() {
        assert!(integer(&v(json!(2))));
        assert!(integer(&v(json!(2.0))));
        assert!(!integer(&v(json!("2"))));
        assert!(floating(&v(json!(2.5))));
        assert!(floating(&v(json!(-2.5))));
        assert!(!floating(&v(json!(2))));
    }

    #[test]
    fn named_lookup() {
        let f = by_name("integer");
        assert_eq!(f.name(), "integer");
        assert_eq!(f.call_json(&json!(3)).unwrap(), JsValue::from(true));
        assert_eq!(by_name("function").name(), "type:function");
        assert_eq!(is_not("nil").unwrap().name(), "!nil");
        assert_eq!(
            is_not("nope").unwrap_err(),
            QueryError::InvalidIsMethod("nope".to_string())
        );
    }
}
