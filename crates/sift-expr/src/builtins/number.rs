//! Number methods.

use super::string_value;
use crate::error::ExprError;
use crate::types::{Arity, BuiltinDefinition, JsValue, Receiver};
use crate::util::{arg, number_to_string, to_integer, to_number};
use std::sync::Arc;

/// `n.toFixed(digits)`, digits in `0..=100`.
fn to_fixed_call(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let n = to_number(this);
    let digits = to_integer(arg(args, 0));
    if !(0..=100).contains(&digits) {
        return Err(ExprError::Arity(format!(
            "\"toFixed\" digits must be between 0 and 100, got {}.",
            digits
        )));
    }
    if !n.is_finite() {
        return Ok(string_value(number_to_string(n)));
    }
    Ok(string_value(format!("{:.*}", digits as usize, n)))
}

pub fn builtins() -> Vec<Arc<BuiltinDefinition>> {
    vec![Arc::new(BuiltinDefinition {
        name: "toFixed",
        aliases: &[],
        receiver: Receiver::Number,
        arity: Arity::Range(0, Some(1)),
        call_fn: to_fixed_call,
    })]
}
