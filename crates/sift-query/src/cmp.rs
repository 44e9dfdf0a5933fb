//! Predicate factories that compare their argument against a fixed value.

use crate::accessor::Accessor;
use crate::error::QueryError;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use sift_expr::util::{strict_eq, to_js_string, type_of as js_type_of};
use sift_expr::{Compiler, JsValue};
use std::sync::OnceLock;

/// Builds `d <op> <value>` as a one-parameter function over `d`, aliased
/// `op + value`.
///
/// ```
/// use serde_json::json;
/// use sift_query::cmp::cmp;
/// use sift_expr::JsValue;
///
/// let gte5 = cmp(">=", 5).unwrap();
/// assert_eq!(gte5.name(), ">=5");
/// assert_eq!(gte5.call_json(&json!(4)).unwrap(), JsValue::from(false));
/// ```
pub fn cmp(op: &str, value: impl Into<Value>) -> Result<Accessor, QueryError> {
    let value = value.into();
    // JSON text is also a valid literal for the scalar and array cases.
    let literal = serde_json::to_string(&value).unwrap_or_default();
    let body = format!("d {} {}", op, literal);
    let compiled = Compiler::default().compile(&["d"], &body)?;
    let alias = format!("{}{}", op, to_js_string(&JsValue::Json(value)));
    Ok(Accessor::new(alias, move |d| {
        compiled.call(std::slice::from_ref(d))
    }))
}

pub fn eq(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("==", value)
}

pub fn eqq(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("===", value)
}

pub fn neq(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("!=", value)
}

pub fn neqq(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("!==", value)
}

pub fn gt(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp(">", value)
}

pub fn gte(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp(">=", value)
}

pub fn lt(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("<", value)
}

pub fn lte(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("<=", value)
}

/// `d % value`.
pub fn modulo(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("%", value)
}

pub fn plus(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("+", value)
}

pub fn minus(value: impl Into<Value>) -> Result<Accessor, QueryError> {
    cmp("-", value)
}

/// True when the argument's type name (`"number"`, `"string"`, ...) is
/// `name`. Aliased `"type:" + name`.
pub fn type_of(name: &str) -> Accessor {
    let expected = name.to_string();
    Accessor::from_fn(format!("type:{}", name), move |d| {
        JsValue::from(js_type_of(d) == expected)
    })
}

fn slash_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)^/(.*)/([a-z]+)?$").ok())
        .as_ref()
}

fn build_regex(pattern: &str) -> Result<Regex, QueryError> {
    let caps = match slash_pattern().and_then(|re| re.captures(pattern)) {
        Some(caps) => caps,
        None => {
            return Regex::new(pattern).map_err(|e| QueryError::InvalidPattern(e.to_string()))
        }
    };
    let source = caps.get(1).map_or("", |m| m.as_str());
    let mut builder = RegexBuilder::new(source);
    for flag in caps.get(2).map_or("", |m| m.as_str()).chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            // Global matching has no meaning for a yes/no test.
            'g' => &mut builder,
            other => {
                return Err(QueryError::InvalidPattern(format!(
                    "unsupported flag '{}' in {}",
                    other, pattern
                )))
            }
        };
    }
    builder
        .build()
        .map_err(|e| QueryError::InvalidPattern(e.to_string()))
}

/// Matches string arguments against a pattern, given bare (`"^foo?$"`) or
/// delimited with flags (`"/^foo?$/i"`). Non-strings never match.
pub fn re(pattern: &str) -> Result<Accessor, QueryError> {
    let regex = build_regex(pattern)?;
    Ok(Accessor::from_fn(format!("re:{}", pattern), move |d| {
        let hit = matches!(d, JsValue::Json(Value::String(s)) if regex.is_match(s));
        JsValue::from(hit)
    }))
}

/// Same as [`re`].
pub fn like(pattern: &str) -> Result<Accessor, QueryError> {
    re(pattern)
}

/// True when the argument is strictly equal to one of the flattened
/// `values`.
pub fn is_in(values: &[Value]) -> Accessor {
    let values = sift_util::flatten(values);
    Accessor::from_fn("isin", move |d| {
        JsValue::from(values.iter().any(|v| strict_eq(&JsValue::Json(v.clone()), d)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(f: &Accessor, v: Value) -> JsValue {
        f.call_json(&v).unwrap()
    }

    #[test]
    fn operators_compile_with_literal() {
        assert_eq!(call(&eq(5).unwrap(), json!(5)), JsValue::from(true));
        assert_eq!(call(&eq(5).unwrap(), json!("5")), JsValue::from(true));
        assert_eq!(call(&eqq(5).unwrap(), json!("5")), JsValue::from(false));
        assert_eq!(call(&gte(5).unwrap(), json!(4)), JsValue::from(false));
        assert_eq!(call(&modulo(3).unwrap(), json!(7)), JsValue::from(1i64));
        assert_eq!(call(&plus("!").unwrap(), json!("hi")), JsValue::from("hi!"));
    }

    #[test]
    fn string_values_are_quoted() {
        let f = eq("it's \"x\"").unwrap();
        assert_eq!(f.name(), "==it's \"x\"");
        assert_eq!(call(&f, json!("it's \"x\"")), JsValue::from(true));
    }

    #[test]
    fn unknown_operator_is_a_parse_error() {
        assert!(matches!(cmp("=", 1), Err(QueryError::Expr(_))));
    }

    #[test]
    fn regex_flags() {
        let f = re("/^foo?$/i").unwrap();
        assert_eq!(f.name(), "re:/^foo?$/i");
        assert_eq!(call(&f, json!("FO")), JsValue::from(true));
        assert_eq!(call(&f, json!(1)), JsValue::from(false));
        assert!(matches!(re("/a/x"), Err(QueryError::InvalidPattern(_))));
        assert!(matches!(re("("), Err(QueryError::InvalidPattern(_))));
    }

    #[test]
    fn type_and_membership() {
        assert_eq!(call(&type_of("string"), json!("a")), JsValue::from(true));
        assert_eq!(type_of("number").name(), "type:number");
        let f = is_in(&[json!([2, [4]])]);
        assert_eq!(call(&f, json!(4)), JsValue::from(true));
        assert_eq!(call(&f, json!(3)), JsValue::from(false));
    }
}
