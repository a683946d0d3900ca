//! String literal scanning.

use super::{LexError, Lexer};
use crate::position::Range;
use crate::token::{Token, TokenKind, TokenValue};

impl<'a> Lexer<'a> {
    /// Scans a double-quoted string literal starting at the opening `"`.
    ///
    /// Supported escapes: `\n`, `\t`, `\r`, `\\`, `\"`. An unknown escape
    /// or a string left open at end-of-line/end-of-input produces a
    /// [`TokenKind::Error`] token instead of panicking.
    pub(super) fn scan_string(&mut self) -> Token {
        let start = self.pos();
        self.bump(); // opening quote

        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    let range = Range::new(start, self.pos());
                    return self.string_error("unterminated string literal", range);
                }
                Some('\n') => {
                    let range = Range::new(start, self.pos());
                    return self.string_error("unterminated string literal", range);
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.pos();
                    self.bump();
                    match self.current_char() {
                        Some('n') => {
                            value.push('\n');
                            self.bump();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.bump();
                        }
                        Some('r') => {
                            value.push('\r');
                            self.bump();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.bump();
                        }
                        Some('"') => {
                            value.push('"');
                            self.bump();
                        }
                        other => {
                            let range = Range::new(escape_start, self.pos());
                            return self.string_error(
                                format!(
                                    "unknown escape sequence '\\{}'",
                                    other.map(|c| c.to_string()).unwrap_or_default()
                                ),
                                range,
                            );
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }

        let range = Range::new(start, self.pos());
        Token::new(TokenKind::String, TokenValue::String(value), range)
    }

    fn string_error(&self, message: impl Into<String>, range: Range) -> Token {
        let error = LexError::new(message, range);
        Token::new(TokenKind::Error, TokenValue::Error(error), range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_string() {
        let mut lexer = Lexer::new(r#""hello""#);
        let token = lexer.scan_string();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value.as_string(), Some("hello"));
    }

    #[test]
    fn decodes_escape_sequences() {
        let mut lexer = Lexer::new(r#""a\nb\t\"c\"""#);
        let token = lexer.scan_string();
        assert_eq!(token.value.as_string(), Some("a\nb\t\"c\""));
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let mut lexer = Lexer::new("\"abc");
        let token = lexer.scan_string();
        assert_eq!(token.kind, TokenKind::Error);
    }
}
