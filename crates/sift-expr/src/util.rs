//! Value semantics shared by the evaluator and the builtins: type names,
//! conversions, truthiness, equality, relational comparison, arithmetic and
//! property reads.

use crate::types::JsValue;
use serde_json::{Number, Value};
use sift_util::deep_equal;
use std::cmp::Ordering;

static UNDEFINED: JsValue = JsValue::Undefined;

/// Returns the `index`-th argument, or `undefined` when it was not passed.
pub fn arg(args: &[JsValue], index: usize) -> &JsValue {
    args.get(index).unwrap_or(&UNDEFINED)
}

/// A shared `undefined` for places that need a `&JsValue` with no owner.
pub fn undefined() -> &'static JsValue {
    &UNDEFINED
}

// ----------------------------------------------------------------- Type helpers

/// Returns the `typeof` name of a value.
pub fn type_of(value: &JsValue) -> &'static str {
    match value {
        JsValue::Undefined => "undefined",
        JsValue::Function(_) => "function",
        JsValue::Namespace(_) => "object",
        JsValue::NonFinite(_) => "number",
        JsValue::Json(v) => match v {
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        },
    }
}

/// Returns true if a value is truthy.
pub fn is_truthy(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined => false,
        JsValue::Function(_) | JsValue::Namespace(_) => true,
        JsValue::NonFinite(n) => !n.is_nan(),
        JsValue::Json(v) => match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        },
    }
}

// ----------------------------------------------------------- Number conversion

/// Converts a value to a number; unparseable input yields NaN.
pub fn to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined | JsValue::Function(_) | JsValue::Namespace(_) => f64::NAN,
        JsValue::NonFinite(n) => *n,
        JsValue::Json(v) => json_to_number(v),
    }
}

fn json_to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => json_to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    // Rust accepts "inf"/"nan" spellings that are not numbers here.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Converts a value to a number, mapping NaN to `0`.
pub fn num(value: &JsValue) -> f64 {
    let n = to_number(value);
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Truncates to an integer position argument (NaN → 0, infinities clamp).
pub fn to_integer(value: &JsValue) -> i64 {
    let n = to_number(value);
    if n.is_nan() {
        0
    } else if n >= i64::MAX as f64 {
        i64::MAX
    } else if n <= i64::MIN as f64 {
        i64::MIN
    } else {
        n.trunc() as i64
    }
}

/// Wraps a float as a value. Integral results become JSON integers so that
/// `1 + 2` compares equal to the literal `3`; NaN and infinities stay
/// [`JsValue::NonFinite`] until the value leaves the engine.
pub fn num_to_jsval(n: f64) -> JsValue {
    if n.is_finite() {
        JsValue::Json(f64_to_json(n))
    } else {
        JsValue::NonFinite(n)
    }
}

/// JSON form of a float; NaN and infinities have none and become `null`.
pub fn f64_to_json(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        // -0 folds to 0 here.
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

pub fn usize_to_jsval(n: usize) -> JsValue {
    JsValue::Json(Value::Number(Number::from(n as u64)))
}

// ----------------------------------------------------------- String conversion

/// Formats a number the way string conversion does: integral values print
/// without a fractional part.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

fn json_number_to_string(n: &Number) -> String {
    if n.is_f64() {
        number_to_string(n.as_f64().unwrap_or(f64::NAN))
    } else {
        n.to_string()
    }
}

/// Converts a value to a string.
pub fn to_js_string(value: &JsValue) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::Function(def) => format!("function {}() {{ [native code] }}", def.name),
        JsValue::Namespace(ns) => format!("[object {}]", ns),
        JsValue::NonFinite(n) => number_to_string(*n),
        JsValue::Json(v) => json_to_string(v),
    }
}

fn json_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => json_number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => json_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Reduces arrays and objects to their string form; primitives pass through.
pub fn to_primitive(value: &JsValue) -> JsValue {
    match value {
        JsValue::Json(Value::Array(_)) | JsValue::Json(Value::Object(_)) => {
            JsValue::Json(Value::String(to_js_string(value)))
        }
        JsValue::Function(_) | JsValue::Namespace(_) => {
            JsValue::Json(Value::String(to_js_string(value)))
        }
        other => other.clone(),
    }
}

fn is_string(value: &JsValue) -> bool {
    matches!(value, JsValue::Json(Value::String(_)))
}

fn is_nullish(value: &JsValue) -> bool {
    matches!(value, JsValue::Undefined | JsValue::Json(Value::Null))
}

fn as_number(value: &JsValue) -> Option<f64> {
    match value {
        JsValue::NonFinite(n) => Some(*n),
        JsValue::Json(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

fn is_composite(value: &JsValue) -> bool {
    matches!(
        value,
        JsValue::Json(Value::Array(_)) | JsValue::Json(Value::Object(_))
    )
}

// -------------------------------------------------------------- Equality

/// Strict equality (`===`): no conversions. Arrays and objects compare
/// structurally since values carry no identity.
pub fn strict_eq(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Json(Value::Number(x)), JsValue::Json(Value::Number(y))) => {
            sift_util::number_eq(x, y)
        }
        (JsValue::Json(x), JsValue::Json(y)) => deep_equal(x, y),
        (JsValue::NonFinite(_), _) | (_, JsValue::NonFinite(_)) => {
            // NaN is unequal to everything, itself included.
            matches!((as_number(a), as_number(b)), (Some(x), Some(y)) if x == y)
        }
        _ => a == b,
    }
}

/// Loose equality (`==`).
pub fn loose_eq(a: &JsValue, b: &JsValue) -> bool {
    if is_nullish(a) || is_nullish(b) {
        return is_nullish(a) && is_nullish(b);
    }
    if matches!(a, JsValue::NonFinite(_)) || matches!(b, JsValue::NonFinite(_)) {
        return to_number(&to_primitive(a)) == to_number(&to_primitive(b));
    }
    match (a, b) {
        (JsValue::Json(x), JsValue::Json(y)) if same_kind(x, y) => strict_eq(a, b),
        (JsValue::Json(Value::Bool(_)), _) => loose_eq(&num_to_jsval(to_number(a)), b),
        (_, JsValue::Json(Value::Bool(_))) => loose_eq(a, &num_to_jsval(to_number(b))),
        (JsValue::Json(Value::Number(_)), JsValue::Json(Value::String(_)))
        | (JsValue::Json(Value::String(_)), JsValue::Json(Value::Number(_))) => {
            to_number(a) == to_number(b)
        }
        _ if is_composite(a) && !is_composite(b) => loose_eq(&to_primitive(a), b),
        _ if is_composite(b) && !is_composite(a) => loose_eq(a, &to_primitive(b)),
        _ => strict_eq(a, b),
    }
}

fn same_kind(x: &Value, y: &Value) -> bool {
    std::mem::discriminant(x) == std::mem::discriminant(y)
        || (is_composite_json(x) && is_composite_json(y))
}

fn is_composite_json(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

// -------------------------------------------------------------- Comparison

/// Relational comparison: strings compare lexicographically, everything
/// else numerically. `None` when either side is NaN after conversion.
pub fn compare(a: &JsValue, b: &JsValue) -> Option<Ordering> {
    let pa = to_primitive(a);
    let pb = to_primitive(b);
    match (&pa, &pb) {
        (JsValue::Json(Value::String(x)), JsValue::Json(Value::String(y))) => Some(x.cmp(y)),
        _ => to_number(&pa).partial_cmp(&to_number(&pb)),
    }
}

pub fn js_gt(a: &JsValue, b: &JsValue) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

pub fn js_gte(a: &JsValue, b: &JsValue) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

pub fn js_lt(a: &JsValue, b: &JsValue) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

pub fn js_lte(a: &JsValue, b: &JsValue) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

// -------------------------------------------------------------- Arithmetic

/// `a + b`: concatenation when either primitive is a string, else addition.
pub fn add(a: &JsValue, b: &JsValue) -> JsValue {
    let pa = to_primitive(a);
    let pb = to_primitive(b);
    if is_string(&pa) || is_string(&pb) {
        let mut s = to_js_string(&pa);
        s.push_str(&to_js_string(&pb));
        return JsValue::Json(Value::String(s));
    }
    num_to_jsval(to_number(&pa) + to_number(&pb))
}

pub fn sub(a: &JsValue, b: &JsValue) -> JsValue {
    num_to_jsval(to_number(a) - to_number(b))
}

pub fn mul(a: &JsValue, b: &JsValue) -> JsValue {
    num_to_jsval(to_number(a) * to_number(b))
}

pub fn div(a: &JsValue, b: &JsValue) -> JsValue {
    num_to_jsval(to_number(a) / to_number(b))
}

/// Remainder with the sign of the dividend.
pub fn rem(a: &JsValue, b: &JsValue) -> JsValue {
    num_to_jsval(to_number(a) % to_number(b))
}

pub fn negate(a: &JsValue) -> JsValue {
    num_to_jsval(-to_number(a))
}

// ------------------------------------------------------------ Container helpers

/// Length of a string (in chars) or array.
pub fn len(value: &JsValue) -> Option<usize> {
    match value {
        JsValue::Json(Value::String(s)) => Some(s.chars().count()),
        JsValue::Json(Value::Array(a)) => Some(a.len()),
        _ => None,
    }
}

/// Parses a canonical array index ("0", "12", not "01" or "-1").
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Reads property `key` of a value: object fields, array elements and
/// `length`, string characters and `length`. Any other read is `undefined`.
pub fn property_of(container: &JsValue, key: &str) -> JsValue {
    match container {
        JsValue::Json(Value::Object(obj)) => obj
            .get(key)
            .map(|v| JsValue::Json(v.clone()))
            .unwrap_or(JsValue::Undefined),
        JsValue::Json(Value::Array(arr)) => {
            if key == "length" {
                return usize_to_jsval(arr.len());
            }
            parse_index(key)
                .and_then(|i| arr.get(i))
                .map(|v| JsValue::Json(v.clone()))
                .unwrap_or(JsValue::Undefined)
        }
        JsValue::Json(Value::String(s)) => {
            if key == "length" {
                return usize_to_jsval(s.chars().count());
            }
            parse_index(key)
                .and_then(|i| s.chars().nth(i))
                .map(|c| JsValue::Json(Value::String(c.to_string())))
                .unwrap_or(JsValue::Undefined)
        }
        _ => JsValue::Undefined,
    }
}

/// Property key for a computed member access (`a[b]`).
pub fn property_key(key: &JsValue) -> String {
    to_js_string(key)
}

/// Returns true if reading a property of `value` is an error.
pub fn is_not_container(value: &JsValue) -> bool {
    is_nullish(value)
}

/// Resolves a possibly negative relative position against `len`
/// (`-1` is the last element), clamping into `0..=len`.
pub fn relative_index(value: &JsValue, len: usize, default: usize) -> usize {
    if value.is_undefined() {
        return default;
    }
    let n = to_integer(value);
    let len_i = len as i64;
    if n < 0 {
        (len_i + n).max(0) as usize
    } else {
        n.min(len_i) as usize
    }
}

/// Converts a value to JSON (undefined/builtins → null).
pub fn jsvalue_to_json(v: JsValue) -> Value {
    v.into_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn j(v: Value) -> JsValue {
        JsValue::Json(v)
    }

    #[test]
    fn number_strings() {
        assert_eq!(number_to_string(3.0), "3");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn string_numbers() {
        assert_eq!(to_number(&j(json!(" 42 "))), 42.0);
        assert_eq!(to_number(&j(json!(""))), 0.0);
        assert_eq!(to_number(&j(json!("0x10"))), 16.0);
        assert!(to_number(&j(json!("inf"))).is_nan());
        assert!(to_number(&j(json!("abc"))).is_nan());
        assert!(to_number(&JsValue::Undefined).is_nan());
    }

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(num_to_jsval(3.0), j(json!(3)));
        assert_eq!(f64_to_json(0.25), json!(0.25));
        assert_eq!(f64_to_json(f64::INFINITY), Value::Null);
        assert_eq!(num_to_jsval(f64::INFINITY), JsValue::NonFinite(f64::INFINITY));
        assert_eq!(num_to_jsval(f64::NAN).into_json(), Value::Null);
    }

    #[test]
    fn non_finite_numbers() {
        let nan = num_to_jsval(f64::NAN);
        let inf = num_to_jsval(f64::INFINITY);
        assert_eq!(type_of(&nan), "number");
        assert!(!is_truthy(&nan));
        assert!(is_truthy(&inf));
        assert!(!strict_eq(&nan, &nan));
        assert!(strict_eq(&inf, &inf));
        assert!(!loose_eq(&nan, &j(json!(null))));
        assert!(loose_eq(&inf, &j(json!("Infinity"))));
        assert!(js_gt(&inf, &j(json!(5))));
        assert!(!js_gt(&nan, &j(json!(5))));
        assert_eq!(to_js_string(&num_to_jsval(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn loose_equality_coerces() {
        assert!(loose_eq(&j(json!(1)), &j(json!("1"))));
        assert!(loose_eq(&j(json!(true)), &j(json!(1))));
        assert!(loose_eq(&j(json!(null)), &JsValue::Undefined));
        assert!(!loose_eq(&j(json!(null)), &j(json!(0))));
        assert!(loose_eq(&j(json!([1, 2])), &j(json!("1,2"))));
    }

    #[test]
    fn strict_equality_does_not_coerce() {
        assert!(!strict_eq(&j(json!(1)), &j(json!("1"))));
        assert!(strict_eq(&j(json!(2)), &j(json!(2.0))));
        assert!(!strict_eq(&j(json!(null)), &JsValue::Undefined));
    }

    #[test]
    fn relational() {
        assert!(js_lt(&j(json!("a")), &j(json!("b"))));
        assert!(js_lt(&j(json!(2)), &j(json!(10))));
        assert!(js_gt(&j(json!("10")), &j(json!(9))));
        assert!(!js_lt(&JsValue::Undefined, &j(json!(1))));
        assert!(!js_gte(&JsValue::Undefined, &j(json!(1))));
        assert!(js_lt(&j(json!(null)), &j(json!(1))));
    }

    #[test]
    fn addition_concatenates_strings() {
        assert_eq!(add(&j(json!(1)), &j(json!(2))), j(json!(3)));
        assert_eq!(add(&j(json!("a")), &j(json!(1))), j(json!("a1")));
        assert_eq!(add(&j(json!(null)), &j(json!(1))), j(json!(1)));
        assert!(to_number(&add(&JsValue::Undefined, &j(json!(1)))).is_nan());
    }

    #[test]
    fn property_reads() {
        assert_eq!(property_of(&j(json!("hi")), "length"), j(json!(2)));
        assert_eq!(property_of(&j(json!([5, 6])), "1"), j(json!(6)));
        assert_eq!(property_of(&j(json!([5, 6])), "01"), JsValue::Undefined);
        assert_eq!(property_of(&j(json!({"a": 1})), "b"), JsValue::Undefined);
        assert_eq!(property_of(&j(json!(3)), "a"), JsValue::Undefined);
    }
}
