//! Binding powers for Pratt expression parsing.
//!
//! The table encodes the dialect's precedence: within binary operators
//! `* / %` > `+ -` > comparisons > `AND` > `OR`; the prefix operators
//! `- ~` bind tighter than every binary, the postfix `IS [NOT] NULL`
//! tighter still, and `NOT` sits between the comparison family and `AND`.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Binding power of prefix operators.
pub(crate) const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Tilde => Some(13),
        TokenKind::Keyword(Keyword::Exists) => Some(13),
        TokenKind::Keyword(Keyword::Not) => Some(5),
        _ => None,
    }
}

/// Binding powers `(left, right)` of infix operators; left < right makes
/// them left-associative.
pub(crate) const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((7, 8)),
        TokenKind::Plus | TokenKind::Minus => Some((9, 10)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((11, 12)),
        _ => None,
    }
}

/// Binding power of the postfix null tests.
pub(crate) const fn postfix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Keyword(Keyword::IsNull | Keyword::IsNotNull) => Some(15),
        _ => None,
    }
}

/// Converts a token to a binary operator.
pub(crate) const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        _ => None,
    }
}

/// Converts a token to a prefix unary operator.
pub(crate) const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        TokenKind::Keyword(Keyword::Exists) => Some(UnaryOp::Exists),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let or_bp = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(or_bp.0 < and_bp.0);
        assert!(and_bp.0 < eq_bp.0);
        assert!(eq_bp.0 < add_bp.0);
        assert!(add_bp.0 < mul_bp.0);
    }

    #[test]
    fn test_not_sits_between_comparisons_and_and() {
        let not_bp = prefix_binding_power(&TokenKind::Keyword(Keyword::Not)).unwrap();
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        assert!(not_bp > and_bp.0);
        assert!(not_bp < eq_bp.0);
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let neg_bp = prefix_binding_power(&TokenKind::Minus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(neg_bp > mul_bp.1);
    }

    #[test]
    fn test_null_tests_bind_tightest() {
        let is_null = postfix_binding_power(&TokenKind::Keyword(Keyword::IsNull)).unwrap();
        let neg_bp = prefix_binding_power(&TokenKind::Minus).unwrap();
        assert!(is_null > neg_bp);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(left < right);
    }
}
