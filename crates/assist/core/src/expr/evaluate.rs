//! Restricted arithmetic evaluator.
//!
//! Grammar (standard precedence, left associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-') unary | atom
//! atom   := number | '(' expr ')'
//! number := digits ['.' digits] | '.' digits | digits '.'
//! ```
//!
//! Only the characters accepted by [`is_allowed`] ever reach the parser;
//! anything else is rejected up front.

/// Failure modes of [`evaluate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("character {found:?} at offset {offset} is not allowed")]
    Disallowed { found: char, offset: usize },

    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedToken { found: char, offset: usize },

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("invalid number literal at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("expression does not evaluate to a finite number")]
    NonFinite,

    #[error("expression nests too deeply")]
    TooDeep,
}

/// Deepest run of nested parentheses and unary signs the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// Allow-list for evaluator input: digits, `+ - * / ( ) .` and whitespace.
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

/// Evaluates `expression` and returns its finite value.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    if let Some((offset, found)) = expression.char_indices().find(|(_, c)| !is_allowed(*c)) {
        return Err(EvalError::Disallowed { found, offset });
    }

    let mut parser = Parser::new(expression);
    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some(found) = parser.peek() {
        return Err(EvalError::UnexpectedToken {
            found,
            offset: parser.pos,
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consumes `expected` after optional whitespace.
    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Runs `step` one nesting level deeper, failing past [`MAX_DEPTH`].
    fn nested(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let value = step(self);
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            if self.eat('*') {
                value *= self.unary()?;
            } else if self.eat('/') {
                value /= self.unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.eat('-') {
            return self.nested(|p| p.unary().map(|v| -v));
        }
        if self.eat('+') {
            return self.nested(Self::unary);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(EvalError::UnexpectedEnd),
            Some('(') => {
                self.bump();
                let value = self.nested(Self::expr)?;
                if self.eat(')') {
                    Ok(value)
                } else {
                    match self.peek() {
                        Some(found) => Err(EvalError::UnexpectedToken {
                            found,
                            offset: self.pos,
                        }),
                        None => Err(EvalError::UnexpectedEnd),
                    }
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(found) => Err(EvalError::UnexpectedToken {
                found,
                offset: self.pos,
            }),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.bump();
            } else {
                break;
            }
        }

        let literal = &self.input[start..self.pos];
        if literal == "." {
            return Err(EvalError::InvalidNumber { offset: start });
        }
        literal
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_with_precedence() {
        assert_eq!(evaluate("2*3+1"), Ok(7.0));
        assert_eq!(evaluate("1+2*3"), Ok(7.0));
        assert_eq!(evaluate("(1+2)*3"), Ok(9.0));
        assert_eq!(evaluate("8/2/2"), Ok(2.0));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
    }

    #[test]
    fn handles_unary_signs_and_decimals() {
        assert_eq!(evaluate("-2+5"), Ok(3.0));
        assert_eq!(evaluate("2- -1"), Ok(3.0));
        assert_eq!(evaluate(".5*4"), Ok(2.0));
        assert_eq!(evaluate("3. + 1"), Ok(4.0));
        assert_eq!(evaluate("  ( 4 ) "), Ok(4.0));
    }

    #[test]
    fn rejects_disallowed_input_before_parsing() {
        assert_eq!(
            evaluate("1+x"),
            Err(EvalError::Disallowed {
                found: 'x',
                offset: 2
            })
        );
    }

    #[test]
    fn reports_syntax_errors() {
        assert_eq!(evaluate("1+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(1+2"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(EvalError::UnexpectedToken { found: '2', .. })));
        assert!(matches!(evaluate("1.2.3"), Err(EvalError::UnexpectedToken { found: '.', .. })));
        assert!(matches!(evaluate("2**3"), Err(EvalError::UnexpectedToken { found: '*', .. })));
        assert_eq!(evaluate("."), Err(EvalError::InvalidNumber { offset: 0 }));
        assert_eq!(evaluate(""), Err(EvalError::UnexpectedEnd));
    }

    #[test]
    fn non_finite_results_fail() {
        assert_eq!(evaluate("1/0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate("0/0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn nesting_is_bounded() {
        let signs = format!("{}1", "-".repeat(200_000));
        assert_eq!(evaluate(&signs), Err(EvalError::TooDeep));

        let parens = format!("{}1+1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(evaluate(&parens), Err(EvalError::TooDeep));

        let shallow = format!("{}2{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(evaluate(&shallow), Ok(2.0));
        assert_eq!(evaluate("--3"), Ok(3.0));
    }
}
