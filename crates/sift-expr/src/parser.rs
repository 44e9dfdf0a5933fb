//! Recursive-descent parser producing [`Expr`] trees.

use crate::ast::{BinaryOp, Expr, LogicalOp, Property, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Lexer, Punct, Token, TokenKind};
use crate::util::f64_to_json;
use serde_json::Value;

/// Parses a complete expression. The whole input must be consumed.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    ExprParser::parse(input)
}

/// Deepest nesting of sub-expressions and prefix operators accepted.
pub const MAX_DEPTH: usize = 128;

pub struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl ExprParser {
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        let tokens = Lexer::tokenize(input)?;
        let mut parser = Self {
            tokens,
            pos: 0,
            depth: 0,
        };
        if parser.peek_kind() == &TokenKind::Eof {
            return Err(ParseError::Empty);
        }
        let expr = parser.parse_conditional()?;
        match parser.peek_kind() {
            TokenKind::Eof => Ok(expr),
            _ => Err(parser.unexpected()),
        }
    }

    /// Runs `f` one nesting level down, failing past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            let at = self.tokens[self.pos.min(self.tokens.len() - 1)].pos;
            return Err(ParseError::TooDeep(at));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_conditional_inner)
    }

    fn parse_conditional_inner(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_or()?;
        if !self.eat(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.parse_conditional()?;
        self.expect(Punct::Colon)?;
        let alternate = self.parse_conditional()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(Punct::OrOr) {
            let right = self.parse_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.eat(Punct::AndAnd) {
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        while let Some(op) = self.binary_op(&[
            (Punct::EqEq, BinaryOp::Eq),
            (Punct::NotEq, BinaryOp::NotEq),
            (Punct::EqEqEq, BinaryOp::StrictEq),
            (Punct::NotEqEq, BinaryOp::StrictNe),
        ]) {
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.binary_op(&[
            (Punct::Lt, BinaryOp::Lt),
            (Punct::LtEq, BinaryOp::LtEq),
            (Punct::Gt, BinaryOp::Gt),
            (Punct::GtEq, BinaryOp::GtEq),
        ]) {
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) =
            self.binary_op(&[(Punct::Plus, BinaryOp::Add), (Punct::Minus, BinaryOp::Sub)])
        {
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_op(&[
            (Punct::Star, BinaryOp::Mul),
            (Punct::Slash, BinaryOp::Div),
            (Punct::Percent, BinaryOp::Rem),
        ]) {
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = if self.eat(Punct::Bang) {
            UnaryOp::Not
        } else if self.eat(Punct::Minus) {
            UnaryOp::Neg
        } else if self.eat(Punct::Plus) {
            UnaryOp::Plus
        } else {
            return self.parse_postfix();
        };
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(Punct::Dot) {
                let name = match self.advance() {
                    TokenKind::Ident(name) => name,
                    TokenKind::Eof => return Err(ParseError::UnexpectedEnd),
                    _ => return Err(self.unexpected_prev()),
                };
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Property::Named(name),
                };
            } else if self.eat(Punct::LBracket) {
                let key = self.parse_conditional()?;
                self.expect(Punct::RBracket)?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Property::Computed(Box::new(key)),
                };
            } else if self.eat(Punct::LParen) {
                let args = self.parse_list(Punct::RParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            TokenKind::Number(n) => Ok(Expr::Literal(f64_to_json(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" => Expr::Literal(Value::Null),
                "undefined" => Expr::Undefined,
                _ => Expr::Identifier(name),
            }),
            TokenKind::Punct(Punct::LParen) => {
                let inner = self.parse_conditional()?;
                self.expect(Punct::RParen)?;
                Ok(inner)
            }
            TokenKind::Punct(Punct::LBracket) => Ok(Expr::Array(self.parse_list(Punct::RBracket)?)),
            TokenKind::Eof => Err(ParseError::UnexpectedEnd),
            TokenKind::Punct(_) => Err(self.unexpected_prev()),
        }
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_list(&mut self, close: Punct) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_conditional()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(Punct::Comma)?;
        }
    }

    fn binary_op(&mut self, table: &[(Punct, BinaryOp)]) -> Option<BinaryOp> {
        let found = table
            .iter()
            .find(|(punct, _)| self.peek_kind() == &TokenKind::Punct(*punct))
            .map(|(_, op)| *op);
        if found.is_some() {
            self.pos += 1;
        }
        found
    }

    fn peek_kind(&self) -> &TokenKind {
        // The token list always ends with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek_kind().clone();
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek_kind() == &TokenKind::Punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct) -> Result<(), ParseError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEnd,
            ref kind => ParseError::UnexpectedToken {
                found: kind.to_string(),
                pos: token.pos,
            },
        }
    }

    fn unexpected_prev(&self) -> ParseError {
        let token = &self.tokens[self.pos.saturating_sub(1)];
        ParseError::UnexpectedToken {
            found: token.kind.to_string(),
            pos: token.pos,
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
