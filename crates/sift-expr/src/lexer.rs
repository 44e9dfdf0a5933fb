//! Tokenizer for the expression grammar.

use crate::error::ParseError;
use std::fmt;

/// Punctuators and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Question,
    Colon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Bang => "!",
            Punct::EqEq => "==",
            Punct::EqEqEq => "===",
            Punct::NotEq => "!=",
            Punct::NotEqEq => "!==",
            Punct::Lt => "<",
            Punct::LtEq => "<=",
            Punct::Gt => ">",
            Punct::GtEq => ">=",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",
            Punct::Question => "?",
            Punct::Colon => ":",
            Punct::Dot => ".",
            Punct::Comma => ",",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
        }
    }
}

/// Longest operators first so that `===` wins over `==`.
const PUNCTUATORS: &[(&str, Punct)] = &[
    ("===", Punct::EqEqEq),
    ("!==", Punct::NotEqEq),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::LtEq),
    (">=", Punct::GtEq),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("!", Punct::Bang),
    ("<", Punct::Lt),
    (">", Punct::Gt),
    ("?", Punct::Question),
    (":", Punct::Colon),
    (".", Punct::Dot),
    (",", Punct::Comma),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(Punct),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", crate::util::number_to_string(*n)),
            TokenKind::Str(s) => write!(f, "{:?}", s),
            TokenKind::Ident(name) => f.write_str(name),
            TokenKind::Punct(p) => f.write_str(p.as_str()),
            TokenKind::Eof => f.write_str("<end>"),
        }
    }
}

/// A token and its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Splits source text into tokens. The returned list always ends with
/// [`TokenKind::Eof`].
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Self { input, pos: 0 };
        let mut tokens = Vec::new();
        loop {
            lexer.skip_whitespace();
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let pos = self.pos;
        let c = match self.peek() {
            None => return Ok(Token { kind: TokenKind::Eof, pos }),
            Some(c) => c,
        };
        let kind = if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
            TokenKind::Number(self.read_number()?)
        } else if c == '"' || c == '\'' {
            TokenKind::Str(self.read_string(c)?)
        } else if is_ident_start(c) {
            TokenKind::Ident(self.read_identifier())
        } else {
            TokenKind::Punct(self.read_punct(c)?)
        };
        Ok(Token { kind, pos })
    }

    fn read_punct(&mut self, c: char) -> Result<Punct, ParseError> {
        let rest = &self.input[self.pos..];
        for (text, punct) in PUNCTUATORS {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(*punct);
            }
        }
        Err(ParseError::UnexpectedChar { ch: c, pos: self.pos })
    }

    fn read_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        self.eat_digits();
        if self.peek() == Some('.') {
            self.advance();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|d| d.is_ascii_digit()) {
                return Err(ParseError::InvalidNumber(self.input[start..self.pos].to_string()));
            }
            self.eat_digits();
        }
        let text = &self.input[start..self.pos];
        // `1x` or `2abc` is not a number followed by a name.
        if self.peek().is_some_and(is_ident_start) {
            return Err(ParseError::InvalidNumber(text.to_string()));
        }
        text.parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber(text.to_string()))
    }

    fn read_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.advance();
        let mut result = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString(start)),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    let escape_pos = self.pos;
                    self.advance();
                    match self.peek() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('b') => result.push('\u{8}'),
                        Some('f') => result.push('\u{c}'),
                        Some('/') => result.push('/'),
                        Some('\\') => result.push('\\'),
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        Some('u') => {
                            let hex = self.input.get(self.pos + 1..self.pos + 5);
                            let ch = hex
                                .and_then(|h| u32::from_str_radix(h, 16).ok())
                                .and_then(char::from_u32)
                                .ok_or(ParseError::InvalidEscape(escape_pos))?;
                            result.push(ch);
                            self.pos += 4;
                        }
                        None => return Err(ParseError::UnclosedString(start)),
                        _ => return Err(ParseError::InvalidEscape(escape_pos)),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }
}
