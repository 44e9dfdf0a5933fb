use crate::types::JsValue;
use crate::util::property_of;
use std::collections::HashMap;

/// Name bindings visible to an expression.
///
/// Holds an optional environment record whose fields are readable as bare
/// names, plus named bindings (function parameters) that shadow them.
/// Nothing outside the scope is ever reachable.
#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    env: Option<&'a JsValue>,
    vars: HashMap<String, JsValue>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope whose bare names resolve against the fields of `env`.
    pub fn with_env(env: &'a JsValue) -> Self {
        Scope {
            env: Some(env),
            vars: HashMap::new(),
        }
    }

    /// Returns the environment record, if any.
    pub fn env(&self) -> Option<&'a JsValue> {
        self.env
    }

    /// Chainable form of [`Scope::set`].
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<JsValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsValue>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Returns the named binding. `JsValue::Undefined` if not bound.
    pub fn get(&self, name: &str) -> JsValue {
        self.vars.get(name).cloned().unwrap_or(JsValue::Undefined)
    }

    /// Returns true if `name` is a named binding.
    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn del(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    /// Resolves a bare name: named bindings first, then fields of the
    /// environment record. `None` when neither has it.
    pub fn lookup(&self, name: &str) -> Option<JsValue> {
        if let Some(v) = self.vars.get(name) {
            return Some(v.clone());
        }
        let env = self.env?;
        match env.as_json() {
            Some(serde_json::Value::Object(obj)) => {
                obj.get(name).map(|v| JsValue::Json(v.clone()))
            }
            // Strings and arrays expose `length` and their indices.
            _ => Some(property_of(env, name)).filter(|v| !v.is_undefined()),
        }
    }
}
