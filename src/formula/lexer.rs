//! Splits a multiplier formula into tokens.
//!
//! Identifiers are kept whole so that symbol substitution only ever matches
//! complete names: `ATTACK` is one identifier, never `ATK` plus leftovers.
//! Number literals may carry an exponent (`1e-3`); an `e` with no digits
//! after it starts an identifier.

use std::fmt;

use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{value}"),
            Token::Ident(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Render tokens back into a compact expression string (for logs and triage rows).
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
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
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                    // a second '.' starts a new literal; the parser rejects the pair
                    if chars[i - 1] == '.' && chars[start..i - 1].contains(&'.') {
                        i -= 1;
                        break;
                    }
                }
                if chars[start..i].iter().any(char::is_ascii_digit) {
                    i = exponent_end(&chars, i);
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => {
                return Err(FormulaError::UnexpectedCharacter {
                    ch: other,
                    position: i,
                });
            }
        }
    }

    Ok(tokens)
}

/// End of an `e`/`E` exponent with optional sign starting at `i`, or `i`
/// when no digits follow.
fn exponent_end(chars: &[char], i: usize) -> usize {
    if !matches!(chars.get(i), Some('e' | 'E')) {
        return i;
    }
    let mut end = i + 1;
    if matches!(chars.get(end), Some('+' | '-')) {
        end += 1;
    }
    let digits_start = end;
    while chars.get(end).is_some_and(char::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        i
    } else {
        end
    }
}
