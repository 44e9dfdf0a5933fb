//! Tree-walking evaluator.

use crate::ast::{BinaryOp, Expr, LogicalOp, Property, UnaryOp};
use crate::builtins;
use crate::error::ExprError;
use crate::eval_ctx::EvalCtx;
use crate::parser::parse;
use crate::scope::Scope;
use crate::types::{JsValue, Receiver};
use crate::util;
use serde_json::Value;

/// Parses and evaluates `text` against `scope` with the default builtins and
/// permissive options.
pub fn evaluate(text: &str, scope: &Scope<'_>) -> Result<JsValue, ExprError> {
    let expr = parse(text)?;
    eval_expr(&expr, &EvalCtx::new(scope))
}

/// Evaluates a parsed expression.
pub fn eval_expr(expr: &Expr, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(JsValue::Json(v.clone())),
        Expr::Undefined => Ok(JsValue::Undefined),
        Expr::Identifier(name) => resolve_name(name, ctx),
        Expr::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expr(item, ctx)?.into_json());
            }
            Ok(JsValue::Json(Value::Array(values)))
        }
        Expr::Member { object, property } => {
            let target = eval_expr(object, ctx)?;
            let key = property_name(property, ctx)?;
            read_member(&target, &key, ctx)
        }
        Expr::Call { callee, args } => eval_call(callee, args, ctx),
        Expr::Unary { op, operand } => {
            let v = eval_expr(operand, ctx)?;
            Ok(match op {
                UnaryOp::Not => JsValue::from(!util::is_truthy(&v)),
                UnaryOp::Neg => util::negate(&v),
                UnaryOp::Plus => util::num_to_jsval(util::to_number(&v)),
            })
        }
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, ctx)?;
            let r = eval_expr(right, ctx)?;
            Ok(apply_binary(*op, &l, &r))
        }
        Expr::Logical { op, left, right } => {
            let l = eval_expr(left, ctx)?;
            let short = match op {
                LogicalOp::And => !util::is_truthy(&l),
                LogicalOp::Or => util::is_truthy(&l),
            };
            if short {
                Ok(l)
            } else {
                eval_expr(right, ctx)
            }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if util::is_truthy(&eval_expr(test, ctx)?) {
                eval_expr(consequent, ctx)
            } else {
                eval_expr(alternate, ctx)
            }
        }
    }
}

/// Applies a non-short-circuiting binary operator.
pub fn apply_binary(op: BinaryOp, l: &JsValue, r: &JsValue) -> JsValue {
    match op {
        BinaryOp::Add => util::add(l, r),
        BinaryOp::Sub => util::sub(l, r),
        BinaryOp::Mul => util::mul(l, r),
        BinaryOp::Div => util::div(l, r),
        BinaryOp::Rem => util::rem(l, r),
        BinaryOp::Eq => JsValue::from(util::loose_eq(l, r)),
        BinaryOp::NotEq => JsValue::from(!util::loose_eq(l, r)),
        BinaryOp::StrictEq => JsValue::from(util::strict_eq(l, r)),
        BinaryOp::StrictNe => JsValue::from(!util::strict_eq(l, r)),
        BinaryOp::Lt => JsValue::from(util::js_lt(l, r)),
        BinaryOp::LtEq => JsValue::from(util::js_lte(l, r)),
        BinaryOp::Gt => JsValue::from(util::js_gt(l, r)),
        BinaryOp::GtEq => JsValue::from(util::js_gte(l, r)),
    }
}

fn resolve_name(name: &str, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    if let Some(v) = ctx.scope.lookup(name) {
        return Ok(v);
    }
    if let Some(def) = ctx.builtins.get(&(Receiver::Global, name.to_string())) {
        return Ok(JsValue::Function(def.clone()));
    }
    if let Some(ns) = builtins::namespace(name) {
        return Ok(JsValue::Namespace(ns));
    }
    if ctx.options.strict {
        Err(ExprError::UnboundName(name.to_string()))
    } else {
        Ok(JsValue::Undefined)
    }
}

fn property_name(property: &Property, ctx: &EvalCtx<'_>) -> Result<String, ExprError> {
    match property {
        Property::Named(name) => Ok(name.clone()),
        Property::Computed(key) => Ok(util::property_key(&eval_expr(key, ctx)?)),
    }
}

fn read_member(target: &JsValue, key: &str, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    match target {
        JsValue::Namespace(ns) => {
            if let Some(c) = builtins::constant(ns, key) {
                return Ok(c);
            }
            Ok(ctx
                .builtins
                .get(&(Receiver::Namespace(*ns), key.to_string()))
                .map(|def| JsValue::Function(def.clone()))
                .unwrap_or(JsValue::Undefined))
        }
        t if util::is_not_container(t) => {
            if ctx.options.strict {
                Err(ExprError::NotContainer(key.to_string()))
            } else {
                Ok(JsValue::Undefined)
            }
        }
        t => Ok(util::property_of(t, key)),
    }
}

fn eval_args(args: &[Expr], ctx: &EvalCtx<'_>) -> Result<Vec<JsValue>, ExprError> {
    args.iter().map(|a| eval_expr(a, ctx)).collect()
}

fn eval_call(callee: &Expr, args: &[Expr], ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    if let Expr::Member { object, property } = callee {
        let this = eval_expr(object, ctx)?;
        let key = property_name(property, ctx)?;
        return call_method(&this, &key, callee, args, ctx);
    }
    match eval_expr(callee, ctx)? {
        JsValue::Function(def) => {
            let argv = eval_args(args, ctx)?;
            def.call(&JsValue::Undefined, &argv)
        }
        _ => Err(ExprError::NotCallable(callee.to_string())),
    }
}

fn call_method(
    this: &JsValue,
    key: &str,
    callee: &Expr,
    args: &[Expr],
    ctx: &EvalCtx<'_>,
) -> Result<JsValue, ExprError> {
    let receiver = match this {
        JsValue::Namespace(ns) => Receiver::Namespace(*ns),
        JsValue::Json(Value::String(_)) => Receiver::String,
        JsValue::Json(Value::Array(_)) => Receiver::Array,
        JsValue::Json(Value::Number(_)) | JsValue::NonFinite(_) => Receiver::Number,
        t if util::is_not_container(t) => {
            return Err(if ctx.options.strict {
                ExprError::NotContainer(key.to_string())
            } else {
                ExprError::NotCallable(callee.to_string())
            });
        }
        _ => {
            return Err(ExprError::UnknownMethod {
                target: util::type_of(this),
                method: key.to_string(),
            })
        }
    };
    let def = match ctx.builtins.get(&(receiver, key.to_string())) {
        Some(def) => def.clone(),
        None if matches!(receiver, Receiver::Namespace(_)) => {
            return Err(ExprError::NotCallable(callee.to_string()))
        }
        None => {
            return Err(ExprError::UnknownMethod {
                target: receiver.describe(),
                method: key.to_string(),
            })
        }
    };
    let argv = eval_args(args, ctx)?;
    let this = match receiver {
        Receiver::Namespace(_) => util::undefined(),
        _ => this,
    };
    def.call(this, &argv)
}
