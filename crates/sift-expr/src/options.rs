use serde::{Deserialize, Serialize};

/// Evaluation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Unbound names and property reads on `null`/`undefined` raise errors
    /// instead of yielding `undefined`.
    pub strict: bool,
}

impl EvalOptions {
    pub fn strict() -> Self {
        EvalOptions { strict: true }
    }
}
