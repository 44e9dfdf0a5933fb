//! Accessors: named unary functions over records.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sift_expr::util::property_of;
use sift_expr::{Compiler, EvalOptions, ExprError, JsValue};
use std::fmt;
use std::sync::Arc;

/// The callable behind an [`Accessor`].
pub type AccessorFn = dyn Fn(&JsValue) -> Result<JsValue, ExprError> + Send + Sync;

/// A unary function paired with the name used as its output column key.
///
/// The name is the alias set with [`Accessor::alias`] or, absent one, the
/// name given at construction.
#[derive(Clone)]
pub struct Accessor {
    declared: Arc<str>,
    alias: Option<Arc<str>>,
    f: Arc<AccessorFn>,
}

impl Accessor {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&JsValue) -> Result<JsValue, ExprError> + Send + Sync + 'static,
    {
        Accessor {
            declared: Arc::from(name.into()),
            alias: None,
            f: Arc::new(f),
        }
    }

    /// An accessor from an infallible function.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&JsValue) -> JsValue + Send + Sync + 'static,
    {
        Accessor::new(name, move |d| Ok(f(d)))
    }

    /// Renames the accessor.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(Arc::from(name.into()));
        self
    }

    pub fn name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&*self.declared)
    }

    pub fn call(&self, d: &JsValue) -> Result<JsValue, ExprError> {
        (self.f)(d)
    }

    /// Calls the accessor on a JSON value.
    pub fn call_json(&self, d: &Value) -> Result<JsValue, ExprError> {
        self.call(&JsValue::Json(d.clone()))
    }

    /// Calls the accessor and reports whether the result is truthy.
    pub fn test(&self, d: &JsValue) -> Result<bool, ExprError> {
        Ok(sift_expr::util::is_truthy(&self.call(d)?))
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accessor").field(&self.name()).finish()
    }
}

/// Something that can be turned into an accessor: text, or an accessor.
#[derive(Clone, Debug)]
pub enum Spec {
    Text(String),
    Func(Accessor),
}

impl From<&str> for Spec {
    fn from(s: &str) -> Self {
        Spec::Text(s.to_string())
    }
}

impl From<String> for Spec {
    fn from(s: String) -> Self {
        Spec::Text(s)
    }
}

impl From<&String> for Spec {
    fn from(s: &String) -> Self {
        Spec::Text(s.clone())
    }
}

impl From<Accessor> for Spec {
    fn from(a: Accessor) -> Self {
        Spec::Func(a)
    }
}

/// A flat list of specs. Nested lists flatten on conversion, so
/// `vec![vec!["a"], vec!["b", "c"]]` is the three specs `a`, `b`, `c`.
#[derive(Clone, Debug, Default)]
pub struct Specs(pub Vec<Spec>);

impl Specs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<Spec> {
        self.0
    }
}

impl IntoIterator for Specs {
    type Item = Spec;
    type IntoIter = std::vec::IntoIter<Spec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Spec> for Specs {
    fn from(s: Spec) -> Self {
        Specs(vec![s])
    }
}

impl From<&str> for Specs {
    fn from(s: &str) -> Self {
        Specs(vec![s.into()])
    }
}

impl From<String> for Specs {
    fn from(s: String) -> Self {
        Specs(vec![s.into()])
    }
}

impl From<Accessor> for Specs {
    fn from(a: Accessor) -> Self {
        Specs(vec![a.into()])
    }
}

impl<S: Into<Specs>> From<Vec<S>> for Specs {
    fn from(items: Vec<S>) -> Self {
        Specs(items.into_iter().flat_map(|s| s.into().0).collect())
    }
}

impl<S: Into<Specs>, const N: usize> From<[S; N]> for Specs {
    fn from(items: [S; N]) -> Self {
        Specs(items.into_iter().flat_map(|s| s.into().0).collect())
    }
}

/// Options for [`expr_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExprOptions {
    pub eval: EvalOptions,
    /// Rewrite record keys into identifiers before evaluation, so that a
    /// field named `"unit price"` is readable as `unit_price`.
    pub sanitize_keys: bool,
}

/// Reads field `key` of a record. Text specs are exact single-key lookups:
/// `property("a.b")` reads the field named `"a.b"`, not a nested path.
/// Accessor specs pass through unchanged.
pub fn property(spec: impl Into<Spec>) -> Accessor {
    match spec.into() {
        Spec::Func(a) => a,
        Spec::Text(key) => {
            let k = key.clone();
            Accessor::from_fn(key, move |d| property_of(d, &k))
        }
    }
}

/// Compiles a text spec into an accessor that evaluates it with the fields
/// of its argument as names. Accessor specs pass through unchanged.
pub fn expr(spec: impl Into<Spec>) -> Result<Accessor, QueryError> {
    expr_with(spec, ExprOptions::default())
}

pub fn expr_with(spec: impl Into<Spec>, options: ExprOptions) -> Result<Accessor, QueryError> {
    let text = match spec.into() {
        Spec::Func(a) => return Ok(a),
        Spec::Text(text) => text,
    };
    let compiled = Compiler::with_eval_options(options.eval).compile::<&str>(&[], &text)?;
    let accessor = if options.sanitize_keys {
        Accessor::new(text, move |d| compiled.call_with_env(&sanitize(d), &[]))
    } else {
        Accessor::new(text, move |d| compiled.call_with_env(d, &[]))
    };
    Ok(accessor)
}

/// Rewrites a key into an identifier: non-word characters become `_`,
/// trailing underscores are dropped and a leading digit gets a `_` prefix.
pub fn sanitize_key(key: &str) -> String {
    let mut out: String = key
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    while out.len() > 1 && out.ends_with('_') {
        out.pop();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn sanitize(d: &JsValue) -> JsValue {
    match d {
        JsValue::Json(Value::Object(obj)) => {
            let mut out = Map::with_capacity(obj.len());
            for (k, v) in obj {
                out.insert(sanitize_key(k), v.clone());
            }
            JsValue::Json(Value::Object(out))
        }
        other => other.clone(),
    }
}

/// Returns its argument.
pub fn identity() -> Accessor {
    Accessor::from_fn("identity", |d| d.clone())
}

/// Always returns `value`.
pub fn literal(value: impl Into<JsValue>) -> Accessor {
    let value = value.into();
    Accessor::from_fn("literal", move |_| value.clone())
}

/// Lifts a value into an accessor. Function values are called with the
/// record; anything else is returned as is, like [`literal`].
pub fn functor(value: impl Into<JsValue>) -> Accessor {
    match value.into() {
        JsValue::Function(def) => Accessor::new(def.name, move |d| {
            def.call(&JsValue::Undefined, std::slice::from_ref(d))
        }),
        value => Accessor::from_fn("functor", move |_| value.clone()),
    }
}

/// Always returns `undefined`.
pub fn noop() -> Accessor {
    Accessor::from_fn("noop", |_| JsValue::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_expr::Receiver;

    #[test]
    fn sanitized_keys() {
        assert_eq!(sanitize_key("unit price"), "unit_price");
        assert_eq!(sanitize_key("total ($)"), "total");
        assert_eq!(sanitize_key("2nd"), "_2nd");
        assert_eq!(sanitize_key("ok"), "ok");
    }

    #[test]
    fn functor_wraps_values_and_calls_functions() {
        let five = functor(5i64);
        assert_eq!(five.name(), "functor");
        assert_eq!(five.call(&JsValue::from("x")).unwrap(), JsValue::from(5i64));

        let abs = sift_expr::default_builtins()
            .get(&(Receiver::Namespace("Math"), "abs".to_string()))
            .cloned()
            .map(JsValue::Function)
            .unwrap();
        let f = functor(abs);
        assert_eq!(f.name(), "abs");
        assert_eq!(f.call(&JsValue::from(-3i64)).unwrap(), JsValue::from(3i64));
    }

    #[test]
    fn specs_flatten() {
        let specs: Specs = vec![vec!["a"], vec!["b", "c"]].into();
        assert_eq!(specs.len(), 3);
    }
}
