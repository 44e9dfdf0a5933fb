//! Global conversion functions.

use super::string_value;
use crate::error::ExprError;
use crate::types::{Arity, BuiltinDefinition, JsValue, Receiver};
use crate::util::{arg, is_truthy, num_to_jsval, to_integer, to_js_string, to_number};
use std::sync::Arc;

fn string_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(match args.first() {
        None => string_value(""),
        Some(v) => string_value(to_js_string(v)),
    })
}

fn number_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(match args.first() {
        None => num_to_jsval(0.0),
        Some(v) => num_to_jsval(to_number(v)),
    })
}

fn boolean_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(is_truthy(arg(args, 0))))
}

/// Parses the leading integer of a string in the given radix.
pub fn parse_int(text: &str, radix: Option<u32>) -> f64 {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match radix {
        None | Some(16) if s.starts_with("0x") || s.starts_with("0X") => (16, &s[2..]),
        None => (10, s),
        Some(r) if (2..=36).contains(&r) => (r, s),
        Some(_) => return f64::NAN,
    };
    let digits: String = s.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0f64;
    for c in digits.chars() {
        // take_while guarantees a digit in this radix
        acc = acc * radix as f64 + c.to_digit(radix).unwrap_or(0) as f64;
    }
    if negative {
        -acc
    } else {
        acc
    }
}

/// Parses the leading decimal number of a string.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || has_digits {
            has_digits = has_digits || frac_end > frac_start;
            end = frac_end;
        }
    }
    if !has_digits {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_int_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let text = to_js_string(arg(args, 0));
    let radix = match arg(args, 1) {
        JsValue::Undefined => None,
        r => match to_integer(r) {
            0 => None,
            n => Some(u32::try_from(n).unwrap_or(0)),
        },
    };
    Ok(num_to_jsval(parse_int(&text, radix)))
}

fn parse_float_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(num_to_jsval(parse_float(&to_js_string(arg(args, 0)))))
}

fn is_nan_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(to_number(arg(args, 0)).is_nan()))
}

fn is_finite_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(to_number(arg(args, 0)).is_finite()))
}

pub fn builtins() -> Vec<Arc<BuiltinDefinition>> {
    let g = Receiver::Global;
    vec![
        Arc::new(BuiltinDefinition {
            name: "String",
            aliases: &[],
            receiver: g,
            arity: Arity::Range(0, Some(1)),
            call_fn: string_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "Number",
            aliases: &[],
            receiver: g,
            arity: Arity::Range(0, Some(1)),
            call_fn: number_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "Boolean",
            aliases: &[],
            receiver: g,
            arity: Arity::Range(0, Some(1)),
            call_fn: boolean_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "parseInt",
            aliases: &[],
            receiver: g,
            arity: Arity::Range(1, Some(2)),
            call_fn: parse_int_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "parseFloat",
            aliases: &[],
            receiver: g,
            arity: Arity::Fixed(1),
            call_fn: parse_float_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "isNaN",
            aliases: &[],
            receiver: g,
            arity: Arity::Fixed(1),
            call_fn: is_nan_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "isFinite",
            aliases: &[],
            receiver: g,
            arity: Arity::Fixed(1),
            call_fn: is_finite_call,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_prefixes() {
        assert_eq!(parse_int("42px", None), 42.0);
        assert_eq!(parse_int("  -7", None), -7.0);
        assert_eq!(parse_int("0x1f", None), 31.0);
        assert_eq!(parse_int("101", Some(2)), 5.0);
        assert!(parse_int("px", None).is_nan());
    }

    #[test]
    fn parse_float_prefixes() {
        assert_eq!(parse_float("3.25abc"), 3.25);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("2e"), 2.0);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
    }
}
