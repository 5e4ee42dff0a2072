//! Pratt expression parser for operator precedence.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Binding strength of an operator, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `IS`, `IS NOT`
    Is,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// `::`
    Typecast,
    /// `-x`, `+x`
    Prefix,
    /// `f(...)`
    Call,
}

/// Returns the precedence of a token in infix position.
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_precedence(kind: &TokenKind) -> Option<Precedence> {
    match kind {
        TokenKind::Keyword(Keyword::Is) => Some(Precedence::Is),
        TokenKind::Plus | TokenKind::Minus => Some(Precedence::Sum),
        TokenKind::Asterisk | TokenKind::Slash => Some(Precedence::Product),
        TokenKind::Typecast => Some(Precedence::Typecast),
        TokenKind::LeftParen => Some(Precedence::Call),
        _ => None,
    }
}

/// Converts a token to an arithmetic binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Asterisk => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Plus => Some(UnaryOp::Plus),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::Lowest < Precedence::Is);
        assert!(Precedence::Is < Precedence::Sum);
        assert!(Precedence::Sum < Precedence::Product);
        assert!(Precedence::Product < Precedence::Typecast);
        assert!(Precedence::Typecast < Precedence::Prefix);
        assert!(Precedence::Prefix < Precedence::Call);
    }

    #[test]
    fn test_infix_precedence() {
        assert_eq!(infix_precedence(&TokenKind::Plus), Some(Precedence::Sum));
        assert_eq!(
            infix_precedence(&TokenKind::Keyword(Keyword::Is)),
            Some(Precedence::Is)
        );
        assert_eq!(infix_precedence(&TokenKind::LeftParen), Some(Precedence::Call));
        assert_eq!(infix_precedence(&TokenKind::Comma), None);
    }

    #[test]
    fn test_token_to_ops() {
        assert_eq!(token_to_binary_op(&TokenKind::Slash), Some(BinaryOp::Div));
        assert_eq!(token_to_binary_op(&TokenKind::Typecast), None);
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(token_to_unary_op(&TokenKind::Asterisk), None);
    }
}
