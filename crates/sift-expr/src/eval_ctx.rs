use crate::builtins::default_builtins;
use crate::options::EvalOptions;
use crate::scope::Scope;
use crate::types::BuiltinMap;
use std::sync::Arc;

/// The context threaded through expression evaluation.
pub struct EvalCtx<'a> {
    /// Name bindings (parameters + environment record).
    pub scope: &'a Scope<'a>,
    /// The builtins reachable from expressions.
    pub builtins: Arc<BuiltinMap>,
    pub options: EvalOptions,
}

impl<'a> EvalCtx<'a> {
    /// A context with the default builtins and permissive options.
    pub fn new(scope: &'a Scope<'a>) -> Self {
        EvalCtx {
            scope,
            builtins: default_builtins(),
            options: EvalOptions::default(),
        }
    }

    pub fn with_builtins(mut self, builtins: Arc<BuiltinMap>) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }
}
