//! Arithmetic evaluator for angle expressions such as `2pi/3` or `-(pi/2)`.
//!
//! Grammar (juxtaposition multiplies and binds tighter than `*` and `/`, so
//! `1/2pi` is `1 / (2 * pi)`):
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | product
//! product := primary ('pi' | 'π' | '(' expr ')')*
//! primary := number | 'pi' | 'π' | '(' expr ')'

use std::f64::consts::PI;

use thiserror::Error;

/// Why an angle expression was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },

    #[error("malformed number '{text}' at position {position}")]
    MalformedNumber { text: String, position: usize },

    #[error("expected {expected} at position {position}")]
    Expected { expected: &'static str, position: usize },

    #[error("unexpected trailing input at position {position}")]
    TrailingInput { position: usize },

    #[error("expression does not evaluate to a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Pi,
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            'π' => Token::Pi,
            'p' | 'P' if matches!(chars.get(i + 1), Some('i') | Some('I')) => {
                tokens.push((Token::Pi, i));
                i += 2;
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| ExpressionError::MalformedNumber {
                    text: literal.clone(),
                    position: start,
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            found => return Err(ExpressionError::UnexpectedCharacter { found, position: i }),
        };
        tokens.push((token, i));
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.cursor).map(|&(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.cursor).map_or(self.end, |&(_, p)| p)
    }

    fn expr(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.cursor += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.cursor += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.cursor += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.cursor += 1;
                    value /= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn product(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.primary()?;
        while matches!(self.peek(), Some(Token::Pi) | Some(Token::Open)) {
            value *= self.primary()?;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ExpressionError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.cursor += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.cursor += 1;
                self.unary()
            }
            _ => self.product(),
        }
    }

    fn primary(&mut self) -> Result<f64, ExpressionError> {
        let position = self.position();
        match self.peek() {
            Some(Token::Number(value)) => {
                self.cursor += 1;
                Ok(value)
            }
            Some(Token::Pi) => {
                self.cursor += 1;
                Ok(PI)
            }
            Some(Token::Open) => {
                self.cursor += 1;
                let value = self.expr()?;
                if self.peek() != Some(Token::Close) {
                    return Err(ExpressionError::Expected {
                        expected: "')'",
                        position: self.position(),
                    });
                }
                self.cursor += 1;
                Ok(value)
            }
            _ => Err(ExpressionError::Expected {
                expected: "a number, 'pi' or '('",
                position,
            }),
        }
    }
}

/// Evaluate an angle expression built from numbers, `pi`/`π`, parentheses
/// and `+ - * /`
pub fn evaluate(text: &str) -> Result<f64, ExpressionError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        end: text.chars().count(),
    };

    let value = parser.expr()?;
    if parser.cursor < parser.tokens.len() {
        return Err(ExpressionError::TrailingInput {
            position: parser.position(),
        });
    }
    if !value.is_finite() {
        return Err(ExpressionError::NonFinite);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_plain_pi_forms() {
        assert!(close(evaluate("pi").unwrap(), PI));
        assert!(close(evaluate("π").unwrap(), PI));
        assert!(close(evaluate("PI/2").unwrap(), PI / 2.0));
        assert!(close(evaluate("pi/6").unwrap(), PI / 6.0));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert!(close(evaluate("2pi/3").unwrap(), 2.0 * PI / 3.0));
        assert!(close(evaluate("2 π").unwrap(), 2.0 * PI));
        assert!(close(evaluate("3(pi/4)").unwrap(), 0.75 * PI));
        assert!(close(evaluate("(1 + 1)pi").unwrap(), 2.0 * PI));
    }

    #[test]
    fn test_implicit_multiplication_binds_tighter_than_division() {
        assert!(close(evaluate("pi/2pi").unwrap(), 0.5));
        assert!(close(evaluate("1/2pi").unwrap(), 1.0 / (2.0 * PI)));
        assert!(close(evaluate("pi/2(1+1)").unwrap(), PI / 4.0));
        assert!(close(evaluate("-3pi/4").unwrap(), -0.75 * PI));
        assert!(close(evaluate("2pi*3").unwrap(), 6.0 * PI));
    }

    #[test]
    fn test_signs_and_precedence() {
        assert!(close(evaluate("-pi/2").unwrap(), -PI / 2.0));
        assert!(close(evaluate("pi - pi/4 * 2").unwrap(), PI / 2.0));
        assert!(close(evaluate("-(1 + 1) * pi").unwrap(), -2.0 * PI));
        assert!(close(evaluate("0.5*pi").unwrap(), PI / 2.0));
    }

    #[test]
    fn test_rejects_code_like_input() {
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(ExpressionError::UnexpectedCharacter { .. })
        ));
        assert!(matches!(evaluate("pi**2"), Err(ExpressionError::Expected { .. })));
        assert!(matches!(evaluate("sin(pi)"), Err(ExpressionError::UnexpectedCharacter { .. })));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(evaluate("(pi/2"), Err(ExpressionError::Expected { .. })));
        assert!(matches!(evaluate("pi)"), Err(ExpressionError::TrailingInput { .. })));
        assert!(matches!(evaluate("1..2pi"), Err(ExpressionError::MalformedNumber { .. })));
        assert!(matches!(evaluate("pi/0"), Err(ExpressionError::NonFinite)));
        assert!(matches!(evaluate(""), Err(ExpressionError::Expected { .. })));
    }
}
