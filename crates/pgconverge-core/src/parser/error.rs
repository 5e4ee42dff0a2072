//! Parser error types.

use thiserror::Error;

use crate::lexer::Token;

/// A syntax error in one statement of one input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input_name}:{line}: {message}")]
pub struct ParseError {
    /// Display name of the input the error was found in.
    pub input_name: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// The error message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(input_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            input_name: input_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(input_name: impl Into<String>, expected: &str, found: &Token) -> Self {
        Self::new(
            input_name,
            found.line,
            format!("expected {expected}, found {}", found.describe()),
        )
    }

    /// Creates an error for an `Illegal` token from the lexer.
    #[must_use]
    pub fn illegal(input_name: impl Into<String>, token: &Token) -> Self {
        Self::new(
            input_name,
            token.line,
            format!("illegal token {}", token.literal),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_display() {
        let error = ParseError::new("schema.sql", 12, "unknown statement FOO");
        assert_eq!(error.to_string(), "schema.sql:12: unknown statement FOO");
    }

    #[test]
    fn test_unexpected() {
        let found = Token::new(TokenKind::Comma, ",", 4);
        let error = ParseError::unexpected("a.sql", "identifier", &found);
        assert_eq!(error.to_string(), "a.sql:4: expected identifier, found ,");

        let error = ParseError::unexpected("a.sql", ";", &Token::eof(9));
        assert_eq!(error.to_string(), "a.sql:9: expected ;, found end of input");
    }

    #[test]
    fn test_illegal() {
        let token = Token::new(TokenKind::Illegal, "'a", 1);
        assert_eq!(
            ParseError::illegal("a.sql", &token).to_string(),
            "a.sql:1: illegal token 'a"
        );
    }
}
