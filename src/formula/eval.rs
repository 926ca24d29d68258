//! Recursive-descent evaluator for substituted formulas.
//!
//! Grammar:
//!   expr    := term (('+' | '-') term)*
//!   term    := unary (('*' | '/') unary)*
//!   unary   := ('+' | '-') unary | primary
//!   primary := NUMBER | '(' expr ')'
//!
//! Any identifier that survived substitution is an error. Nesting of
//! parentheses and unary signs is capped at `MAX_DEPTH`.

use super::lexer::Token;
use super::FormulaError;

pub const MAX_DEPTH: usize = 256;

pub fn evaluate(tokens: &[Token]) -> Result<f64, FormulaError> {
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(Token::RParen) => Err(FormulaError::UnbalancedParenthesis),
        Some(token) => Err(FormulaError::UnexpectedToken {
            token: token.to_string(),
            position: parser.pos,
        }),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<f64, FormulaError>,
    ) -> Result<f64, FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, FormulaError> {
        let position = self.pos;
        match self.next() {
            Some(Token::Number(value)) => Ok(*value),
            Some(Token::LParen) => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    None => Err(FormulaError::UnbalancedParenthesis),
                    Some(token) => Err(FormulaError::UnexpectedToken {
                        token: token.to_string(),
                        position: self.pos - 1,
                    }),
                }
            }
            Some(Token::Ident(name)) => Err(FormulaError::UnresolvedIdentifier(name.clone())),
            Some(token) => Err(FormulaError::UnexpectedToken {
                token: token.to_string(),
                position,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, MAX_DEPTH};
    use crate::formula::lexer::tokenize;
    use crate::formula::FormulaError;

    fn eval_str(input: &str) -> Result<f64, FormulaError> {
        evaluate(&tokenize(input).unwrap())
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval_str("2+3*4").unwrap(), 14.0);
        assert_eq!(eval_str("(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval_str("10-4-3").unwrap(), 3.0);
        assert_eq!(eval_str("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn unary_sign() {
        assert_eq!(eval_str("-5+2").unwrap(), -3.0);
        assert_eq!(eval_str("3*-2").unwrap(), -6.0);
        assert_eq!(eval_str("+(4)").unwrap(), 4.0);
    }

    #[test]
    fn doubled_operator_is_rejected() {
        assert!(matches!(
            eval_str("1000**"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn trailing_operator_hits_end() {
        assert_eq!(eval_str("1000*"), Err(FormulaError::UnexpectedEnd));
    }

    #[test]
    fn parentheses_must_balance() {
        assert_eq!(eval_str("(1+2"), Err(FormulaError::UnbalancedParenthesis));
        assert_eq!(eval_str("1+2)"), Err(FormulaError::UnbalancedParenthesis));
    }

    #[test]
    fn leftover_identifier_is_unresolved() {
        assert_eq!(
            eval_str("ATTACK*2"),
            Err(FormulaError::UnresolvedIdentifier("ATTACK".into()))
        );
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(eval_str("5/(2-2)"), Err(FormulaError::DivisionByZero));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let open = "(".repeat(100_000);
        assert_eq!(eval_str(&open), Err(FormulaError::TooDeep(MAX_DEPTH)));

        let wrapped = format!("{}1{}", "(".repeat(3_000), ")".repeat(3_000));
        assert_eq!(eval_str(&wrapped), Err(FormulaError::TooDeep(MAX_DEPTH)));

        let signs = format!("{}1", "-".repeat(100_000));
        assert_eq!(eval_str(&signs), Err(FormulaError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn nesting_below_the_cap_evaluates() {
        let depth = MAX_DEPTH - 1;
        let wrapped = format!("{}2{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval_str(&wrapped), Ok(2.0));
    }

    #[test]
    fn adjacent_numbers_fail() {
        assert!(matches!(
            eval_str("1.2.3"),
            Err(FormulaError::UnexpectedToken { position: 1, .. })
        ));
    }
}
