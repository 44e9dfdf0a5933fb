use thiserror::Error;

/// Syntax errors raised while tokenizing or parsing an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unexpected token '{found}' at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unclosed string starting at {0}")]
    UnclosedString(usize),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Invalid escape sequence at {0}")]
    InvalidEscape(usize),

    #[error("Expression nested too deeply at {0}")]
    TooDeep(usize),
}

/// Errors raised while evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0} is not defined")]
    UnboundName(String),

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("Unknown method '{method}' on {target}")]
    UnknownMethod { target: &'static str, method: String },

    #[error("{0}")]
    Arity(String),

    #[error("Cannot read property '{0}' of null or undefined")]
    NotContainer(String),
}
