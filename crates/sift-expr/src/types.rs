use crate::error::ExprError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Represents any value an expression can produce, including `undefined`
/// (no JSON equivalent) and the builtin callables reachable from the global
/// namespace.
#[derive(Debug, Clone)]
pub enum JsValue {
    /// `undefined`: missing fields, missing arguments, empty reductions.
    Undefined,
    /// Any JSON-compatible value.
    Json(Value),
    /// `NaN` or an infinity. Finite numbers are always `Json`.
    NonFinite(f64),
    /// A builtin function referenced without being called, e.g. `Math.max`.
    Function(Arc<BuiltinDefinition>),
    /// A builtin namespace object such as `Math`.
    Namespace(&'static str),
}

impl JsValue {
    /// Borrows the JSON payload, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            JsValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// Converts to JSON; `undefined`, non-finite numbers and builtins
    /// become `null`.
    pub fn into_json(self) -> Value {
        match self {
            JsValue::Json(v) => v,
            JsValue::Undefined
            | JsValue::NonFinite(_)
            | JsValue::Function(_)
            | JsValue::Namespace(_) => Value::Null,
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Json(a), JsValue::Json(b)) => sift_util::deep_equal(a, b),
            // Structural: NaN equals NaN here, unlike `===`.
            (JsValue::NonFinite(a), JsValue::NonFinite(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (JsValue::Function(a), JsValue::Function(b)) => Arc::ptr_eq(a, b),
            (JsValue::Namespace(a), JsValue::Namespace(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for JsValue {
    fn default() -> Self {
        JsValue::Undefined
    }
}

impl From<Value> for JsValue {
    fn from(v: Value) -> Self {
        JsValue::Json(v)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Json(Value::Bool(b))
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        crate::util::num_to_jsval(n)
    }
}

impl From<i64> for JsValue {
    fn from(n: i64) -> Self {
        JsValue::Json(Value::Number(serde_json::Number::from(n)))
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::Json(Value::String(s))
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::Json(Value::String(s.to_string()))
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::to_js_string(self))
    }
}

/// Builtin arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// Any number of arguments.
    Any,
    /// Exactly `n` arguments.
    Fixed(usize),
    /// Between `min` and `max` arguments. `None` for max = unlimited.
    Range(usize, Option<usize>),
}

/// What a builtin is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// Global function such as `parseInt`.
    Global,
    /// Member of a namespace object such as `Math`.
    Namespace(&'static str),
    /// Method called on a string value.
    String,
    /// Method called on an array value.
    Array,
    /// Method called on a number value.
    Number,
}

impl Receiver {
    pub fn describe(&self) -> &'static str {
        match self {
            Receiver::Global => "global",
            Receiver::Namespace(ns) => ns,
            Receiver::String => "string",
            Receiver::Array => "array",
            Receiver::Number => "number",
        }
    }
}

/// The type of a builtin function. `this` is the receiver for methods and
/// `undefined` for globals and namespace members.
pub type CallFn = fn(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError>;

/// A builtin function definition.
#[derive(Debug)]
pub struct BuiltinDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub receiver: Receiver,
    pub arity: Arity,
    pub call_fn: CallFn,
}

impl BuiltinDefinition {
    /// Checks arity, then invokes the builtin.
    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
        assert_arity(self.name, &self.arity, args.len())?;
        (self.call_fn)(this, args)
    }
}

/// Map of (receiver, name or alias) -> definition.
pub type BuiltinMap = HashMap<(Receiver, String), Arc<BuiltinDefinition>>;

/// Asserts that a call passes an acceptable number of arguments.
pub fn assert_arity(name: &str, arity: &Arity, argc: usize) -> Result<(), ExprError> {
    match arity {
        Arity::Any => Ok(()),
        Arity::Fixed(n) => {
            if argc != *n {
                Err(ExprError::Arity(format!(
                    "\"{}\" expects {} arguments, got {}.",
                    name, n, argc
                )))
            } else {
                Ok(())
            }
        }
        Arity::Range(min, max) => {
            if argc < *min {
                return Err(ExprError::Arity(format!(
                    "\"{}\" expects at least {} arguments, got {}.",
                    name, min, argc
                )));
            }
            match max {
                Some(max) if argc > *max => Err(ExprError::Arity(format!(
                    "\"{}\" expects at most {} arguments, got {}.",
                    name, max, argc
                ))),
                _ => Ok(()),
            }
        }
    }
}

/// Builds a `BuiltinMap` from a list of builtin definitions.
pub fn builtins_to_map(builtins: Vec<Arc<BuiltinDefinition>>) -> BuiltinMap {
    let mut map = HashMap::new();
    for def in builtins {
        map.insert((def.receiver, def.name.to_string()), Arc::clone(&def));
        for alias in def.aliases {
            map.insert((def.receiver, alias.to_string()), Arc::clone(&def));
        }
    }
    map
}
