//! Arithmetic for the `calc` subcommand.
//!
//! Grammar:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('-' | '+')* (number | '(' expr ')')
//! ```
//!
//! Unary signs are folded in a loop. Parentheses nest at most
//! [`MAX_NESTING`] levels.

use crate::error::{AppError, Result};

/// Deepest parenthesis nesting `evaluate` accepts.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Evaluate an infix expression such as `1500 * 0.3 + (200 - 50) / 2`.
pub fn evaluate(input: &str) -> Result<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(AppError::Calculator("empty expression".into()));
    }

    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(AppError::Calculator(format!("unexpected {tok:?}")));
    }
    if !value.is_finite() {
        return Err(AppError::Calculator("result is not a finite number".into()));
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' | ',' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' || d == ',' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Accept a decimal comma as typed on Russian keyboards
                let literal = input[start..end].replace(',', ".");
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| AppError::Calculator(format!("bad number '{}'", &input[start..end])))?;
                tokens.push(Token::Number(number));
                continue;
            }
            '+' => Token::Plus,
            '-' | '−' => Token::Minus,
            '*' | '×' => Token::Star,
            '/' | '÷' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(AppError::Calculator(format!("unexpected character '{other}'")));
            }
        };
        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            if op == Token::Plus {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(AppError::Calculator("division by zero".into()));
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64> {
        let mut negate = false;
        while let Some(sign @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            if sign == Token::Minus {
                negate = !negate;
            }
        }
        let value = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    fn primary(&mut self) -> Result<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                if self.depth == MAX_NESTING {
                    return Err(AppError::Calculator("expression is nested too deeply".into()));
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(AppError::Calculator("missing ')'".into())),
                }
            }
            Some(tok) => Err(AppError::Calculator(format!("unexpected {tok:?}"))),
            None => Err(AppError::Calculator("unexpected end of expression".into())),
        }
    }
}

/// Render a result without a trailing `.0` and without float noise.
pub fn format_result(value: f64) -> String {
    let rounded = format!("{value:.10}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
