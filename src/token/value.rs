//! Payload carried by a [`super::Token`](crate::token::Token) alongside its
//! [`TokenKind`](super::TokenKind).

use num_bigint::{BigInt, BigUint};

use crate::lexer::LexError;

/// The base of an integer literal, preserved for exact re-emission and for
/// [`crate::ast::Expression::Integer`]'s `base` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerBase {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hex = 16,
}

/// A scanned integer literal: original text, decoded arbitrary-precision
/// value, and base.
///
/// `text` is kept verbatim (including any `_` digit separators and the
/// `0b`/`0o`/`0x` prefix) so that later stages can re-emit the literal
/// exactly as written, per the round-trip requirement in `spec.md` §8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub text: String,
    pub value: BigInt,
    pub base: IntegerBase,
}

/// A scanned fixed-point literal, e.g. `12.345`.
///
/// The fractional part is kept as its own unsigned magnitude plus a
/// `scale` (number of digits after the decimal point) rather than
/// converting to a floating-point number, so that `1.10` and `1.1` remain
/// distinguishable if a later stage cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPointLiteral {
    pub text: String,
    pub negative: bool,
    pub integer: BigUint,
    pub fractional: BigUint,
    pub scale: u32,
}

/// The `contains_newline` flag carried by [`TokenKind::Space`](super::TokenKind::Space)
/// tokens, used by [`crate::context::ParseContext::skip_trivia`] to decide
/// whether a production that forbids line breaks should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceValue {
    pub contains_newline: bool,
}

/// The decoded payload of a token, keyed loosely to its
/// [`TokenKind`](super::TokenKind) (the lexer never produces a combination
/// the parser does not expect).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Punctuation and `Eof` carry no payload.
    None,
    /// An identifier's exact spelling (this is also how keywords are
    /// represented; see [`super::TokenKind`]).
    Identifier(String),
    /// A string literal's value with escape sequences already decoded.
    String(String),
    Integer(IntegerLiteral),
    FixedPoint(FixedPointLiteral),
    Space(SpaceValue),
    /// The content of a single line- or block-comment token.
    Comment(String),
    /// The diagnostic produced when the lexer could not make sense of the
    /// input at the current position. Never surfaced to the parser as a
    /// token value: [`crate::context::ParseContext::advance`] converts it
    /// to a syntax error immediately and skips the token.
    Error(LexError),
}

impl TokenValue {
    /// Returns the identifier text, if this value is
    /// [`TokenValue::Identifier`].
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            TokenValue::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns the string literal text, if this value is
    /// [`TokenValue::String`].
    pub fn as_string(&self) -> Option<&str> {
        match self {
            TokenValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_identifier_matches_identifier_value() {
        let value = TokenValue::Identifier("transaction".to_string());
        assert_eq!(value.as_identifier(), Some("transaction"));
    }

    #[test]
    fn as_identifier_rejects_other_kinds() {
        let value = TokenValue::String("hi".to_string());
        assert_eq!(value.as_identifier(), None);
    }
}
