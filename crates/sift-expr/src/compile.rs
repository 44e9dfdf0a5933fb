//! Compiles expression bodies into reusable callables.
//!
//! A body is parsed once at compile time; each call binds the positional
//! arguments to the parameter names and walks the tree against that scope.
//! Two shorthand front-ends produce compiled functions from text:
//!
//! - `fn_literal("f(x, i) x + i")` (also `fn(...)`, optionally with a
//!   `{ ... }` body),
//! - `lambda("lambda x, i: x + i")`.

use crate::ast::Expr;
use crate::builtins::default_builtins;
use crate::error::ExprError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval_expr;
use crate::lexer::{is_ident_part, is_ident_start};
use crate::options::EvalOptions;
use crate::parser::parse;
use crate::scope::Scope;
use crate::types::{BuiltinMap, JsValue};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Parameter name used when a shorthand leaves the list blank.
pub const DEFAULT_PARAM: &str = "d";

const RESERVED: &[&str] = &["true", "false", "null", "undefined"];

/// A compiled function.
#[derive(Clone)]
pub struct CompiledFn {
    params: Vec<String>,
    body: Arc<Expr>,
    source: Arc<str>,
    builtins: Arc<BuiltinMap>,
    options: EvalOptions,
}

impl CompiledFn {
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The body as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// Calls the function. Missing arguments are `undefined`; extra ones are
    /// ignored.
    pub fn call(&self, args: &[JsValue]) -> Result<JsValue, ExprError> {
        self.run(Scope::new(), args)
    }

    /// Calls the function with the fields of `env` readable as bare names.
    /// Parameters shadow fields of the same name.
    pub fn call_with_env(&self, env: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
        self.run(Scope::with_env(env), args)
    }

    fn run(&self, mut scope: Scope<'_>, args: &[JsValue]) -> Result<JsValue, ExprError> {
        for (i, name) in self.params.iter().enumerate() {
            scope.set(name.clone(), args.get(i).cloned().unwrap_or_default());
        }
        let ctx = EvalCtx::new(&scope)
            .with_builtins(Arc::clone(&self.builtins))
            .with_options(self.options);
        eval_expr(&self.body, &ctx)
    }
}

impl fmt::Debug for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFn")
            .field("params", &self.params)
            .field("source", &self.source)
            .field("options", &self.options)
            .finish()
    }
}

impl fmt::Display for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", self.params.join(", "), self.source)
    }
}

/// Options for [`Compiler`].
#[derive(Clone)]
pub struct CompilerOptions {
    pub builtins: Arc<BuiltinMap>,
    pub eval: EvalOptions,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            builtins: default_builtins(),
            eval: EvalOptions::default(),
        }
    }
}

/// Compiles expression bodies with a fixed builtin set and options.
#[derive(Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Compiler { options }
    }

    pub fn with_eval_options(eval: EvalOptions) -> Self {
        Compiler::new(CompilerOptions {
            eval,
            ..CompilerOptions::default()
        })
    }

    /// Parses `body` once and returns the callable.
    pub fn compile<S: AsRef<str>>(&self, params: &[S], body: &str) -> Result<CompiledFn, ExprError> {
        tracing::trace!(target: "sift_expr::compile", body, "compiling expression");
        let expr = parse(body)?;
        Ok(CompiledFn {
            params: params.iter().map(|p| p.as_ref().to_string()).collect(),
            body: Arc::new(expr),
            source: Arc::from(body),
            builtins: Arc::clone(&self.options.builtins),
            options: self.options.eval,
        })
    }

    /// See [`fn_literal`].
    pub fn fn_literal(&self, text: &str) -> Result<Option<CompiledFn>, ExprError> {
        let caps = match fn_pattern().and_then(|re| re.captures(text)) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let params = caps.get(1).map_or("", |m| m.as_str());
        let mut body = caps.get(3).map_or("", |m| m.as_str());
        if caps.get(2).is_some() {
            body = body.strip_suffix('}').unwrap_or(body).trim_end();
        }
        self.shorthand(params, body)
    }

    /// See [`lambda`].
    pub fn lambda(&self, text: &str) -> Result<Option<CompiledFn>, ExprError> {
        let caps = match lambda_pattern().and_then(|re| re.captures(text)) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let params = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        let body = caps.get(3).map_or("", |m| m.as_str());
        self.shorthand(params, body)
    }

    fn shorthand(&self, params: &str, body: &str) -> Result<Option<CompiledFn>, ExprError> {
        match parse_params(params) {
            Some(names) => self.compile(&names, body).map(Some),
            None => Ok(None),
        }
    }
}

fn fn_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)^fn?\s*\(([^)]*)\)\s*(\{)?\s*(.+?)\s*$").ok())
        .as_ref()
}

fn lambda_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?s)^lambda(?:\s*\(([^):]*)\)|\s+([^:]*?))?\s*:\s*(.+?)\s*$").ok()
        })
        .as_ref()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_part) && !RESERVED.contains(&name),
        _ => false,
    }
}

/// Splits a textual parameter list on commas and whitespace. A blank list
/// yields the single default parameter `d`; any name that is not a valid
/// identifier yields `None`.
pub fn parse_params(list: &str) -> Option<Vec<String>> {
    let names: Vec<&str> = list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return Some(vec![DEFAULT_PARAM.to_string()]);
    }
    if names.iter().all(|n| is_identifier(n)) {
        Some(names.into_iter().map(String::from).collect())
    } else {
        None
    }
}

/// Compiles `body` with the given parameter names.
pub fn compile<S: AsRef<str>>(params: &[S], body: &str) -> Result<CompiledFn, ExprError> {
    Compiler::default().compile(params, body)
}

/// Parses `"f(a, b) body"`, `"fn(a, b) body"` or `"f(a) { body }"`.
/// `Ok(None)` when the text does not have that shape.
pub fn fn_literal(text: &str) -> Result<Option<CompiledFn>, ExprError> {
    Compiler::default().fn_literal(text)
}

/// Parses `"lambda a, b: body"` or `"lambda(a, b): body"`.
/// `Ok(None)` when the text does not have that shape.
pub fn lambda(text: &str) -> Result<Option<CompiledFn>, ExprError> {
    Compiler::default().lambda(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_split_on_commas_and_spaces() {
        assert_eq!(
            parse_params("a, b c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(parse_params("  "), Some(vec!["d".to_string()]));
        assert_eq!(parse_params("a, 1b"), None);
        assert_eq!(parse_params("null"), None);
    }

    #[test]
    fn braces_are_stripped() {
        let f = fn_literal("fn(x) { x * 2 }").unwrap().unwrap();
        assert_eq!(f.source(), "x * 2");
    }
}
