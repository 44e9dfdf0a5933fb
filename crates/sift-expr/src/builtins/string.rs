//! String methods. Positions count characters, not bytes.

use super::{string_of, string_value};
use crate::error::ExprError;
use crate::types::{Arity, BuiltinDefinition, JsValue, Receiver};
use crate::util::{arg, relative_index, to_integer, to_js_string, usize_to_jsval};
use serde_json::Value;
use std::sync::Arc;

fn chars(this: &JsValue) -> Vec<char> {
    string_of(this).chars().collect()
}

/// Clamps a position argument into `0..=len` without negative wrap-around.
fn clamp_index(v: &JsValue, len: usize, default: usize) -> usize {
    if v.is_undefined() {
        return default;
    }
    to_integer(v).clamp(0, len as i64) as usize
}

fn find_from(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(hay.len()));
    }
    if needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

fn to_upper_case_call(this: &JsValue, _: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(string_value(string_of(this).to_uppercase()))
}

fn to_lower_case_call(this: &JsValue, _: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(string_value(string_of(this).to_lowercase()))
}

fn trim_call(this: &JsValue, _: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(string_value(string_of(this).trim()))
}

fn char_at_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let i = to_integer(arg(args, 0));
    let c = usize::try_from(i).ok().and_then(|i| cs.get(i));
    Ok(string_value(c.map(|c| c.to_string()).unwrap_or_default()))
}

fn index_of_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let needle: Vec<char> = to_js_string(arg(args, 0)).chars().collect();
    let from = clamp_index(arg(args, 1), cs.len(), 0);
    Ok(match find_from(&cs, &needle, from) {
        Some(i) => usize_to_jsval(i),
        None => JsValue::from(-1i64),
    })
}

fn includes_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let needle: Vec<char> = to_js_string(arg(args, 0)).chars().collect();
    let from = clamp_index(arg(args, 1), cs.len(), 0);
    Ok(JsValue::from(find_from(&cs, &needle, from).is_some()))
}

fn starts_with_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let needle: Vec<char> = to_js_string(arg(args, 0)).chars().collect();
    let from = clamp_index(arg(args, 1), cs.len(), 0);
    Ok(JsValue::from(cs[from..].starts_with(&needle)))
}

fn ends_with_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let needle: Vec<char> = to_js_string(arg(args, 0)).chars().collect();
    let end = clamp_index(arg(args, 1), cs.len(), cs.len());
    Ok(JsValue::from(cs[..end].ends_with(&needle)))
}

fn slice_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let start = relative_index(arg(args, 0), cs.len(), 0);
    let end = relative_index(arg(args, 1), cs.len(), cs.len());
    let out: String = if start < end {
        cs[start..end].iter().collect()
    } else {
        String::new()
    };
    Ok(string_value(out))
}

fn substring_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let a = clamp_index(arg(args, 0), cs.len(), 0);
    let b = clamp_index(arg(args, 1), cs.len(), cs.len());
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(string_value(cs[start..end].iter().collect::<String>()))
}

fn substr_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let cs = chars(this);
    let start = relative_index(arg(args, 0), cs.len(), 0);
    let count = match arg(args, 1) {
        JsValue::Undefined => cs.len() - start,
        n => to_integer(n).clamp(0, (cs.len() - start) as i64) as usize,
    };
    Ok(string_value(cs[start..start + count].iter().collect::<String>()))
}

fn split_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = string_of(this);
    let limit = match arg(args, 1) {
        JsValue::Undefined => usize::MAX,
        n => usize::try_from(to_integer(n)).unwrap_or(0),
    };
    let parts: Vec<Value> = match arg(args, 0) {
        JsValue::Undefined => vec![Value::String(s)],
        sep => {
            let sep = to_js_string(sep);
            if sep.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(sep.as_str())
                    .map(|p| Value::String(p.to_string()))
                    .collect()
            }
        }
    };
    Ok(JsValue::Json(Value::Array(
        parts.into_iter().take(limit).collect(),
    )))
}

fn concat_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let mut s = string_of(this);
    for a in args {
        s.push_str(&to_js_string(a));
    }
    Ok(string_value(s))
}

/// Replaces the first occurrence of a literal substring.
fn replace_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = string_of(this);
    let pattern = to_js_string(arg(args, 0));
    let replacement = to_js_string(arg(args, 1));
    Ok(string_value(s.replacen(pattern.as_str(), &replacement, 1)))
}

pub fn builtins() -> Vec<Arc<BuiltinDefinition>> {
    let s = Receiver::String;
    vec![
        Arc::new(BuiltinDefinition {
            name: "toUpperCase",
            aliases: &[],
            receiver: s,
            arity: Arity::Fixed(0),
            call_fn: to_upper_case_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "toLowerCase",
            aliases: &[],
            receiver: s,
            arity: Arity::Fixed(0),
            call_fn: to_lower_case_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "trim",
            aliases: &[],
            receiver: s,
            arity: Arity::Fixed(0),
            call_fn: trim_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "charAt",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(0, Some(1)),
            call_fn: char_at_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "indexOf",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: index_of_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "includes",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: includes_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "startsWith",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: starts_with_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "endsWith",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: ends_with_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "slice",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(0, Some(2)),
            call_fn: slice_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "substring",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: substring_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "substr",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(1, Some(2)),
            call_fn: substr_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "split",
            aliases: &[],
            receiver: s,
            arity: Arity::Range(0, Some(2)),
            call_fn: split_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "concat",
            aliases: &[],
            receiver: s,
            arity: Arity::Any,
            call_fn: concat_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "replace",
            aliases: &[],
            receiver: s,
            arity: Arity::Fixed(2),
            call_fn: replace_call,
        }),
    ]
}
