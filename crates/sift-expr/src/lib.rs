//! Safe evaluator for small textual expressions.
//!
//! # Overview
//!
//! Expressions use a restricted infix grammar: literals, names, member
//! access, calls, arithmetic, comparison, logical and conditional operators.
//! There are no statements, assignments or loops. Names resolve only against
//! an explicit [`Scope`] and a fixed set of builtins (`Math`, `String`,
//! `parseInt`, string/array/number methods); nothing from the host program
//! is reachable.
//!
//! # Example
//!
//! ```
//! use sift_expr::{evaluate, fn_literal, JsValue, Scope};
//! use serde_json::json;
//!
//! let row = JsValue::Json(json!({"price": 12, "qty": 3}));
//! let total = evaluate("price * qty", &Scope::with_env(&row)).unwrap();
//! assert_eq!(total, JsValue::Json(json!(36)));
//!
//! let inc = fn_literal("f(x) x + 1").unwrap().unwrap();
//! assert_eq!(inc.call(&[JsValue::from(2i64)]).unwrap(), JsValue::Json(json!(3)));
//! ```

pub mod ast;
pub mod builtins;
pub mod compile;
pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod scope;
pub mod types;
pub mod util;

pub use ast::Expr;
pub use builtins::{builtins_map, default_builtins};
pub use compile::{compile, fn_literal, lambda, parse_params, CompiledFn, Compiler, CompilerOptions};
pub use error::{ExprError, ParseError};
pub use eval_ctx::EvalCtx;
pub use evaluate::{eval_expr, evaluate};
pub use options::EvalOptions;
pub use parser::parse;
pub use scope::Scope;
pub use types::{Arity, BuiltinDefinition, BuiltinMap, JsValue, Receiver};
