//! `Math` namespace.

use crate::error::ExprError;
use crate::types::{Arity, BuiltinDefinition, JsValue, Receiver};
use crate::util::{arg, num_to_jsval, to_number};
use std::sync::Arc;

pub fn constant(name: &str) -> Option<JsValue> {
    match name {
        "PI" => Some(num_to_jsval(std::f64::consts::PI)),
        "E" => Some(num_to_jsval(std::f64::consts::E)),
        _ => None,
    }
}

fn unary(args: &[JsValue], f: fn(f64) -> f64) -> Result<JsValue, ExprError> {
    Ok(num_to_jsval(f(to_number(arg(args, 0)))))
}

fn abs_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::abs)
}

fn ceil_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::ceil)
}

fn floor_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::floor)
}

/// Rounds half up: `round(-2.5) == -2`.
fn round_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, |n| (n + 0.5).floor())
}

fn trunc_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::trunc)
}

fn sign_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, |n| {
        if n.is_nan() || n == 0.0 {
            n
        } else {
            n.signum()
        }
    })
}

fn sqrt_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::sqrt)
}

fn exp_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::exp)
}

fn log_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    unary(args, f64::ln)
}

fn pow_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(num_to_jsval(
        to_number(arg(args, 0)).powf(to_number(arg(args, 1))),
    ))
}

fn fold(args: &[JsValue], seed: f64, pick: fn(f64, f64) -> f64) -> JsValue {
    let mut acc = seed;
    for a in args {
        let n = to_number(a);
        if n.is_nan() {
            return num_to_jsval(f64::NAN);
        }
        acc = pick(acc, n);
    }
    num_to_jsval(acc)
}

fn min_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(fold(args, f64::INFINITY, f64::min))
}

fn max_call(_: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(fold(args, f64::NEG_INFINITY, f64::max))
}

pub fn builtins() -> Vec<Arc<BuiltinDefinition>> {
    let ns = Receiver::Namespace("Math");
    vec![
        Arc::new(BuiltinDefinition {
            name: "abs",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: abs_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "ceil",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: ceil_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "floor",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: floor_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "round",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: round_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "trunc",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: trunc_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "sign",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: sign_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "sqrt",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: sqrt_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "exp",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: exp_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "log",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(1),
            call_fn: log_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "pow",
            aliases: &[],
            receiver: ns,
            arity: Arity::Fixed(2),
            call_fn: pow_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "min",
            aliases: &[],
            receiver: ns,
            arity: Arity::Any,
            call_fn: min_call,
        }),
        Arc::new(BuiltinDefinition {
            name: "max",
            aliases: &[],
            receiver: ns,
            arity: Arity::Any,
            call_fn: max_call,
        }),
    ]
}
