//! Array methods.

use super::{array_of, string_value};
use crate::error::ExprError;
use crate::types::{Arity, BuiltinDefinition, JsValue, Receiver};
use crate::util::{arg, relative_index, strict_eq, to_js_string, usize_to_jsval};
use serde_json::Value;
use std::sync::Arc;

fn position(items: &[Value], needle: &JsValue, from: &JsValue) -> Option<usize> {
    let start = relative_index(from, items.len(), 0);
    items[start..]
        .iter()
        .position(|item| strict_eq(&JsValue::Json(item.clone()), needle))
        .map(|i| i + start)
}

fn index_of_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(match position(array_of(this), arg(args, 0), arg(args, 1)) {
        Some(i) => usize_to_jsval(i),
        None => JsValue::from(-1i64),
    })
}

fn includes_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(
        position(array_of(this), arg(args, 0), arg(args, 1)).is_some(),
    ))
}

fn join_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let sep = match arg(args, 0) {
        JsValue::Undefined => ",".to_string(),
        s => to_js_string(s),
    };
    let parts: Vec<String> = array_of(this)
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => to_js_string(&JsValue::Json(other.clone())),
        })
        .collect();
    Ok(string_value(parts.join(&sep)))
}

fn slice_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let items = array_of(this);
    let start = relative_index(arg(args, 0), items.len(), 0);
    let end = relative_index(arg(args, 1), items.len(), items.len());
    let out = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    Ok(JsValue::Json(Value::Array(out)))
}

/// Appends the arguments, spreading array arguments one level.
fn concat_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let mut out = array_of(this).to_vec();
    for a in args {
        match a {
            JsValue::Json(Value::Array(items)) => out.extend(items.iter().cloned()),
            other => out.push(other.clone().into_json()),
        }
    }
    Ok(JsValue::Json(Value::Array(out)))
}

pub fn builtins() -> Vec<Arc<BuiltinDefinition>> {
    let a = Receiver::Array;
    vec![
        Arc::new(BuiltinDefinition {
            name: "indexOf",
            aliases: &[],
            receiver: a,
            arity: Arity::Range(1, Some(2)),
            call_fn: index_of_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "includes",
            aliases: &[],
            receiver: a,
            arity: Arity::Range(1, Some(2)),
            call_fn: includes_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "join",
            aliases: &[],
            receiver: a,
            arity: Arity::Range(0, Some(1)),
            call_fn: join_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "slice",
            aliases: &[],
            receiver: a,
            arity: Arity::Range(0, Some(2)),
            call_fn: slice_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "concat",
            aliases: &[],
            receiver: a,
            arity: Arity::Any,
            call_fn: concat_call,
        }),
    ]
}
