//! Builtin functions reachable from expressions. Nothing else in the host
//! program is.

pub mod array;
pub mod global;
pub mod math;
pub mod number;
pub mod string;

use crate::types::{builtins_to_map, BuiltinDefinition, BuiltinMap, JsValue};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Namespace objects addressable by bare name.
const NAMESPACES: &[&str] = &["Math"];

/// All builtins combined.
pub fn all_builtins() -> Vec<Arc<BuiltinDefinition>> {
    let mut defs = Vec::new();
    defs.extend(global::builtins());
    defs.extend(math::builtins());
    defs.extend(string::builtins());
    defs.extend(array::builtins());
    defs.extend(number::builtins());
    defs
}

/// Builds a fresh builtin map.
pub fn builtins_map() -> BuiltinMap {
    builtins_to_map(all_builtins())
}

/// The shared default builtin map, built on first use.
pub fn default_builtins() -> Arc<BuiltinMap> {
    static DEFAULT: OnceLock<Arc<BuiltinMap>> = OnceLock::new();
    DEFAULT.get_or_init(|| Arc::new(builtins_map())).clone()
}

/// Returns the canonical name if `name` is a namespace object.
pub fn namespace(name: &str) -> Option<&'static str> {
    NAMESPACES.iter().copied().find(|ns| *ns == name)
}

/// Constant members of namespaces, e.g. `Math.PI`.
pub fn constant(ns: &str, name: &str) -> Option<JsValue> {
    match (ns, name) {
        ("Math", _) => math::constant(name),
        _ => None,
    }
}

pub(crate) fn string_of(this: &JsValue) -> String {
    crate::util::to_js_string(this)
}

pub(crate) fn array_of(this: &JsValue) -> &[Value] {
    match this {
        JsValue::Json(Value::Array(items)) => items,
        _ => &[],
    }
}

pub(crate) fn string_value(s: impl Into<String>) -> JsValue {
    JsValue::Json(Value::String(s.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Receiver;

    #[test]
    fn every_definition_has_its_own_key() {
        let defs = all_builtins();
        let map = builtins_map();
        assert_eq!(map.len(), defs.len());
        for def in &defs {
            assert!(map.contains_key(&(def.receiver, def.name.to_string())));
        }
    }

    #[test]
    fn receivers_are_split_by_module() {
        let map = builtins_map();
        assert!(map.contains_key(&(Receiver::Global, "isNaN".to_string())));
        assert!(map.contains_key(&(Receiver::Namespace("Math"), "max".to_string())));
        assert!(map.contains_key(&(Receiver::String, "indexOf".to_string())));
        assert!(map.contains_key(&(Receiver::Array, "indexOf".to_string())));
        assert!(map.contains_key(&(Receiver::Number, "toFixed".to_string())));
        assert!(!map.contains_key(&(Receiver::Global, "eval".to_string())));
    }
}
