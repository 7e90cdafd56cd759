//! a module that turns a String expression into a symbolic expression
//!
//! # Example
//! ```
//! use trapflow::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("2*t^2 + 4*t + 6").unwrap();
//! let parsed_function = parsed_expression.lambdify1D();
//! assert_eq!(parsed_function(1.0), 12.0);
//! ```
//!
//! Grammar (precedence low to high):
//! ```text
//!   expr   := term (('+' | '-') term)*
//!   term   := unary (('*' | '/') unary)*
//!   unary  := '-' unary | power
//!   power  := atom ('^' unary)?          -- right associative
//!   atom   := number | ident '(' expr ')' | ident | '(' expr ')'
//! ```
//! `**` is accepted as a synonym for `^`, and `log`/`tg` as synonyms for
//! `ln`/`tan`. `sqrt(f)` is parsed as `f^0.5`.

use crate::symbolic::symbolic_engine::Expr;
use thiserror::Error;

/// Malformed expression text. Surfaced verbatim to the caller; fatal for the
/// current request only. There is never a silent fallback value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                // accept the Python-style `2*t**2` power spelling
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(literal))?;
                tokens.push(Token::Num(value));
            }
            _ if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => return Err(ParseError::UnexpectedChar(c, i)),
        }
    }
    Ok(tokens)
}

struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.next();
                    lhs = lhs + self.parse_term()?;
                }
                Token::Minus => {
                    self.next();
                    lhs = lhs - self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.next();
                    lhs = lhs * self.parse_unary()?;
                }
                Token::Slash => {
                    self.next();
                    lhs = lhs / self.parse_unary()?;
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Token::Minus) {
            self.next();
            return Ok(-self.parse_unary()?);
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.next();
            // right associative, and `-` binds tighter than `^` on the exponent side
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(Expr::Const(value)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.next();
                    let inner = self.parse_expr()?;
                    if self.next() != Some(Token::RParen) {
                        return Err(ParseError::UnbalancedParens);
                    }
                    function_call(&name, inner)
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                if self.next() != Some(Token::RParen) {
                    return Err(ParseError::UnbalancedParens);
                }
                Ok(inner)
            }
            Some(Token::RParen) => Err(ParseError::UnbalancedParens),
            Some(token) => Err(ParseError::TrailingInput(format!("{:?}", token))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn function_call(name: &str, inner: Expr) -> Result<Expr, ParseError> {
    match name {
        "exp" => Ok(Expr::Exp(inner.boxed())),
        "ln" | "log" => Ok(Expr::Ln(inner.boxed())),
        "sqrt" => Ok(inner.pow(Expr::Const(0.5))),
        "sin" => Ok(Expr::Sin(inner.boxed())),
        "cos" => Ok(Expr::Cos(inner.boxed())),
        "tan" | "tg" => Ok(Expr::Tan(inner.boxed())),
        _ => Err(ParseError::UnknownFunction(name.to_string())),
    }
}

impl Expr {
    /// Parses a textual mathematical expression into a symbolic expression.
    ///
    /// # Example
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("t^2 + 2*t + 1").unwrap();
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::UnexpectedEnd);
        }
        let mut stream = TokenStream {
            tokens: tokenize(input)?,
            pos: 0,
        };
        let expr = stream.parse_expr()?;
        match stream.peek() {
            None => Ok(expr),
            Some(Token::RParen) => Err(ParseError::UnbalancedParens),
            Some(token) => Err(ParseError::TrailingInput(format!("{:?}", token))),
        }
    }
}
