//! Condition string parser
//!
//! Grammar (keywords are case-insensitive):
//!
//! ```text
//! condition  := or_expr
//! or_expr    := and_expr (("or" | "|" | "||") and_expr)*
//! and_expr   := primary (("and" | "&" | "&&") primary)*
//! primary    := "(" or_expr ")" | operand cmp_op operand
//! operand    := identifier | `quoted identifier` | "string" | 'string' | number
//! cmp_op     := "==" | "!=" | "<" | "<=" | ">" | ">="
//! ```
//!
//! String literals must be quoted; a bare word is always a column name.

use crate::table::Value;

use super::ast::{CompareOp, Operand, Predicate};
use super::errors::{PlannerError, PlannerResult};

/// Deepest parenthesis nesting accepted in a condition
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(Value),
    Op(CompareOp),
    And,
    Or,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("column '{}'", name),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Number(v) => format!("number {}", v),
            Token::Op(op) => format!("operator '{}'", op),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

/// Parses a non-empty condition string
pub fn parse_predicate(input: &str) -> PlannerResult<Predicate> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(PlannerError::malformed(0, "Empty condition"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
    };
    let predicate = parser.or_expr()?;

    if let Some((offset, token)) = parser.peek() {
        return Err(PlannerError::malformed(
            *offset,
            format!("Unexpected {} after complete condition", token.describe()),
        ));
    }

    Ok(predicate)
}

/// Parses an optional condition.
///
/// `None`, empty and whitespace-only input mean "no condition".
pub fn parse_condition(input: Option<&str>) -> PlannerResult<Option<Predicate>> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_predicate(s).map(Some),
        _ => Ok(None),
    }
}

fn tokenize(input: &str) -> PlannerResult<Vec<(usize, Token)>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'(' => {
                tokens.push((start, Token::LParen));
                i += 1;
            }
            b')' => {
                tokens.push((start, Token::RParen));
                i += 1;
            }
            b'"' | b'\'' => {
                let (text, next) = read_quoted(input, i, c)?;
                tokens.push((start, Token::Str(text)));
                i = next;
            }
            b'`' => {
                let (text, next) = read_quoted(input, i, c)?;
                tokens.push((start, Token::Ident(text)));
                i = next;
            }
            b'=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Op(CompareOp::Eq)));
                    i += 2;
                } else {
                    return Err(PlannerError::malformed(start, "Use '==' for equality"));
                }
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((start, Token::Op(CompareOp::Ne)));
                    i += 2;
                } else {
                    return Err(PlannerError::malformed(start, "Expected '!='"));
                }
            }
            b'<' | b'>' => {
                let with_eq = bytes.get(i + 1) == Some(&b'=');
                let op = match (c, with_eq) {
                    (b'<', true) => CompareOp::Le,
                    (b'<', false) => CompareOp::Lt,
                    (_, true) => CompareOp::Ge,
                    (_, false) => CompareOp::Gt,
                };
                tokens.push((start, Token::Op(op)));
                i += if with_eq { 2 } else { 1 };
            }
            b'&' | b'|' => {
                let token = if c == b'&' { Token::And } else { Token::Or };
                tokens.push((start, token));
                i += if bytes.get(i + 1) == Some(&c) { 2 } else { 1 };
            }
            b'0'..=b'9' | b'.' | b'-' => {
                let (value, next) = read_number(input, i)?;
                tokens.push((start, Token::Number(value)));
                i = next;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let mut end = i;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                let word = &input[i..end];
                let token = if word.eq_ignore_ascii_case("and") {
                    Token::And
                } else if word.eq_ignore_ascii_case("or") {
                    Token::Or
                } else {
                    Token::Ident(word.to_string())
                };
                tokens.push((start, token));
                i = end;
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(PlannerError::malformed(
                    start,
                    format!("Unexpected character '{}'", ch),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Reads a quoted run starting at `start`; a backslash escapes the next char
fn read_quoted(input: &str, start: usize, quote: u8) -> PlannerResult<(String, usize)> {
    let mut out = String::new();
    let mut chars = input[start + 1..].char_indices();

    while let Some((offset, ch)) = chars.next() {
        if ch == quote as char {
            return Ok((out, start + 1 + offset + 1));
        }
        if ch == '\\' {
            match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            }
            continue;
        }
        out.push(ch);
    }

    Err(PlannerError::malformed(start, "Unterminated quoted text"))
}

fn read_number(input: &str, start: usize) -> PlannerResult<(Value, usize)> {
    let bytes = input.as_bytes();
    let mut end = start;

    if bytes[end] == b'-' {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            end = exp;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }

    let text = &input[start..end];
    if !input[digits_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return Err(PlannerError::malformed(
            start,
            format!("Invalid number '{}'", text),
        ));
    }

    if let Ok(i) = text.parse::<i64>() {
        return Ok((Value::Int(i), end));
    }
    text.parse::<f64>()
        .map(|f| (Value::Float(f), end))
        .map_err(|_| PlannerError::malformed(start, format!("Invalid number '{}'", text)))
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn or_expr(&mut self) -> PlannerResult<Predicate> {
        let mut left = self.and_expr()?;
        while matches!(self.peek(), Some((_, Token::Or))) {
            self.pos += 1;
            let right = self.and_expr()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> PlannerResult<Predicate> {
        let mut left = self.primary()?;
        while matches!(self.peek(), Some((_, Token::And))) {
            self.pos += 1;
            let right = self.primary()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn primary(&mut self) -> PlannerResult<Predicate> {
        if let Some(&(offset, Token::LParen)) = self.peek() {
            if self.depth >= MAX_NESTING {
                return Err(PlannerError::malformed(offset, "Condition nested too deeply"));
            }
            self.pos += 1;
            self.depth += 1;
            let inner = self.or_expr()?;
            self.depth -= 1;
            return match self.next() {
                Some((_, Token::RParen)) => Ok(inner),
                Some((offset, token)) => Err(PlannerError::malformed(
                    offset,
                    format!("Expected ')' but found {}", token.describe()),
                )),
                None => Err(PlannerError::malformed(self.end, "Missing ')'")),
            };
        }

        let left = self.operand()?;
        let op = match self.next() {
            Some((_, Token::Op(op))) => op,
            Some((offset, token)) => {
                return Err(PlannerError::malformed(
                    offset,
                    format!("Expected comparison operator but found {}", token.describe()),
                ))
            }
            None => {
                return Err(PlannerError::malformed(
                    self.end,
                    "Expected comparison operator",
                ))
            }
        };
        let right = self.operand()?;

        Ok(Predicate::compare(left, op, right))
    }

    fn operand(&mut self) -> PlannerResult<Operand> {
        match self.next() {
            Some((_, Token::Ident(name))) => Ok(Operand::Column(name)),
            Some((_, Token::Str(s))) => Ok(Operand::Literal(Value::Str(s))),
            Some((_, Token::Number(v))) => Ok(Operand::Literal(v)),
            Some((offset, token)) => Err(PlannerError::malformed(
                offset,
                format!("Expected column or literal but found {}", token.describe()),
            )),
            None => Err(PlannerError::malformed(self.end, "Expected column or literal")),
        }
    }
}
