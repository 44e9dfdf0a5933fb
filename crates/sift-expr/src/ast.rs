//! Expression syntax tree.

use serde_json::Value;
use std::fmt;

/// Binary operators, evaluated eagerly on both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,       // +
    Sub,       // -
    Mul,       // *
    Div,       // /
    Rem,       // %
    Eq,        // ==
    NotEq,     // !=
    StrictEq,  // ===
    StrictNe,  // !==
    Lt,        // <
    LtEq,      // <=
    Gt,        // >
    GtEq,      // >=
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And, // &&
    Or,  // ||
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,  // !
    Neg,  // -
    Plus, // +
}

/// The property part of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `a.name`
    Named(String),
    /// `a[expr]`
    Computed(Box<Expr>),
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number, string, boolean or `null` literal.
    Literal(Value),
    /// The `undefined` keyword.
    Undefined,
    Identifier(String),
    /// Array literal: `[a, b]`
    Array(Vec<Expr>),
    Member {
        object: Box<Expr>,
        property: Property,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Prints the expression back as source text. Compound operands are
/// parenthesized, so the output re-parses to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Undefined => f.write_str("undefined"),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::Member { object, property } => {
                write!(f, "{}", object)?;
                match property {
                    Property::Named(name) => write!(f, ".{}", name),
                    Property::Computed(key) => write!(f, "[{}]", key),
                }
            }
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Unary { op, operand } => {
                let sym = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                    UnaryOp::Plus => "+",
                };
                write!(f, "{}{}", sym, Operand(operand))
            }
            Expr::Binary { op, left, right } => {
                write!(f, "{} {} {}", Operand(left), op.as_str(), Operand(right))
            }
            Expr::Logical { op, left, right } => {
                let sym = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                };
                write!(f, "{} {} {}", Operand(left), sym, Operand(right))
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => write!(
                f,
                "{} ? {} : {}",
                Operand(test),
                Operand(consequent),
                Operand(alternate)
            ),
        }
    }
}

/// Wraps operator operands in parentheses when they are themselves
/// operator expressions.
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Unary { .. }
            | Expr::Binary { .. }
            | Expr::Logical { .. }
            | Expr::Conditional { .. } => write!(f, "({})", self.0),
            // A negative literal would otherwise merge with a preceding `-`.
            Expr::Literal(Value::Number(n)) if n.as_f64().is_some_and(|x| x < 0.0) => {
                write!(f, "({})", self.0)
            }
            other => write!(f, "{}", other),
        }
    }
}
