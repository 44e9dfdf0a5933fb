use sift_expr::ExprError;
use thiserror::Error;

/// Errors raised while building or running a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("unrecognized sort order: '{0}'")]
    InvalidSortOrder(String),

    #[error("{0}")]
    InvalidGroupBy(String),

    #[error("bad is method name: '{0}'")]
    InvalidIsMethod(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("unknown coercion: '{0}'")]
    InvalidCoercion(String),

    #[error(transparent)]
    Expr(#[from] ExprError),
}

impl From<sift_expr::ParseError> for QueryError {
    fn from(e: sift_expr::ParseError) -> Self {
        QueryError::Expr(ExprError::Parse(e))
    }
}
