//! Numeric literal scanning: integers (binary/octal/decimal/hex) and
//! fixed-point literals.

use num_bigint::{BigInt, BigUint};

use super::Lexer;
use crate::position::Range;
use crate::token::{FixedPointLiteral, IntegerBase, IntegerLiteral, Token, TokenKind, TokenValue};

fn digit_value(c: char) -> Option<u32> {
    c.to_digit(16)
}

fn is_valid_digit(c: char, base: IntegerBase) -> bool {
    match base {
        IntegerBase::Binary => c == '0' || c == '1',
        IntegerBase::Octal => ('0'..='7').contains(&c),
        IntegerBase::Decimal => c.is_ascii_digit(),
        IntegerBase::Hex => c.is_ascii_hexdigit(),
    }
}

impl<'a> Lexer<'a> {
    /// Scans a numeric literal starting at the current position, which
    /// must be an ASCII digit. Dispatches to the `0b`/`0o`/`0x` prefixed
    /// forms, otherwise scans decimal digits and, if a `.` followed by a
    /// digit is found, continues into a fixed-point literal.
    pub(super) fn scan_number(&mut self) -> Token {
        let start = self.pos();

        if self.current_char() == Some('0') {
            match self.peek_char(1) {
                Some('b') => return self.scan_based_integer(start, IntegerBase::Binary, "0b"),
                Some('o') => return self.scan_based_integer(start, IntegerBase::Octal, "0o"),
                Some('x') => return self.scan_based_integer(start, IntegerBase::Hex, "0x"),
                _ => {}
            }
        }

        self.scan_decimal_or_fixed_point(start)
    }

    fn scan_based_integer(&mut self, start: crate::position::Position, base: IntegerBase, prefix: &str) -> Token {
        let mut text = String::from(prefix);
        self.bump();
        self.bump();

        let mut digits = String::new();
        loop {
            match self.current_char() {
                Some('_') => {
                    text.push('_');
                    self.bump();
                }
                Some(c) if is_valid_digit(c, base) => {
                    text.push(c);
                    digits.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        let range = Range::new(start, self.pos());
        let kind = if base == IntegerBase::Hex {
            TokenKind::HexadecimalInteger
        } else {
            TokenKind::Integer
        };

        if digits.is_empty() {
            return self.number_error(
                format!("missing digits after '{}' integer prefix", prefix),
                range,
            );
        }

        let value = match BigInt::parse_bytes(digits.as_bytes(), base as u32) {
            Some(v) => v,
            None => {
                return self.number_error(format!("invalid integer literal '{}'", text), range);
            }
        };

        Token::new(
            kind,
            TokenValue::Integer(IntegerLiteral { text, value, base }),
            range,
        )
    }

    fn scan_decimal_or_fixed_point(&mut self, start: crate::position::Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        // A `.` followed by a digit starts a fixed-point literal; a `.`
        // followed by anything else (e.g. member access `1.foo`) is left
        // for the caller to tokenize separately.
        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            return self.scan_fixed_point(start, text);
        }

        let range = Range::new(start, self.pos());
        let digits: String = text.chars().filter(|c| *c != '_').collect();
        let value = match BigInt::parse_bytes(digits.as_bytes(), 10) {
            Some(v) => v,
            None => {
                return self.number_error(format!("invalid integer literal '{}'", text), range);
            }
        };

        Token::new(
            TokenKind::Integer,
            TokenValue::Integer(IntegerLiteral {
                text,
                value,
                base: IntegerBase::Decimal,
            }),
            range,
        )
    }

    fn scan_fixed_point(&mut self, start: crate::position::Position, integer_text: String) -> Token {
        let mut text = integer_text.clone();
        text.push('.');
        self.bump(); // consume '.'

        let mut fractional_text = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '_' {
                text.push(c);
                fractional_text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        let range = Range::new(start, self.pos());
        let integer_digits: String = integer_text.chars().filter(|c| *c != '_').collect();
        let fractional_digits: String = fractional_text.chars().filter(|c| *c != '_').collect();

        let integer = if integer_digits.is_empty() {
            BigUint::from(0u32)
        } else {
            match BigUint::parse_bytes(integer_digits.as_bytes(), 10) {
                Some(v) => v,
                None => {
                    return self.number_error(format!("invalid fixed-point literal '{}'", text), range);
                }
            }
        };
        let fractional = if fractional_digits.is_empty() {
            BigUint::from(0u32)
        } else {
            match BigUint::parse_bytes(fractional_digits.as_bytes(), 10) {
                Some(v) => v,
                None => {
                    return self.number_error(format!("invalid fixed-point literal '{}'", text), range);
                }
            }
        };

        Token::new(
            TokenKind::FixedPoint,
            TokenValue::FixedPoint(FixedPointLiteral {
                text,
                negative: false,
                integer,
                fractional,
                scale: fractional_digits.len() as u32,
            }),
            range,
        )
    }

    fn number_error(&self, message: String, range: Range) -> Token {
        let error = super::LexError::new(message, range);
        Token::new(TokenKind::Error, TokenValue::Error(error), range)
    }
}

/// Re-exposed for tests that want to sanity-check hex digit decoding
/// without constructing a full lexer.
#[cfg(test)]
pub(super) fn decode_digit(c: char) -> Option<u32> {
    digit_value(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_digits() {
        assert_eq!(decode_digit('a'), Some(10));
        assert_eq!(decode_digit('F'), Some(15));
        assert_eq!(decode_digit('9'), Some(9));
    }

    #[test]
    fn rejects_digit_outside_base() {
        assert!(!is_valid_digit('8', IntegerBase::Octal));
        assert!(is_valid_digit('7', IntegerBase::Octal));
        assert!(!is_valid_digit('2', IntegerBase::Binary));
    }
}
