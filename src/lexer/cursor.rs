//! Cursor position management for the lexer.

use super::Lexer;
use crate::position::Position;

impl<'a> Lexer<'a> {
    /// Returns the current character without consuming it.
    pub(super) fn current_char(&self) -> Option<char> {
        self.input[self.pos.offset..].chars().next()
    }

    /// Returns the character `n` positions ahead without consuming
    /// anything, or `None` past the end of input.
    pub(super) fn peek_char(&self, n: usize) -> Option<char> {
        self.input[self.pos.offset..].chars().nth(n)
    }

    /// Returns `true` once the end of input has been reached.
    pub(super) fn is_eof(&self) -> bool {
        self.pos.offset >= self.input.len()
    }

    /// Advances past one character, updating line/column bookkeeping.
    /// Does nothing at end of input.
    pub(super) fn bump(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos = if c == '\n' {
            self.pos.next_line(c.len_utf8())
        } else {
            self.pos.advanced_by(c.len_utf8())
        };
        Some(c)
    }

    /// Consumes `current_char` if it equals `expected`, returning whether
    /// it did.
    pub(super) fn eat(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// The position one character length past `start`, without mutating
    /// the lexer — used when a punctuation token's range needs to be
    /// computed from a start position captured earlier.
    pub(super) fn pos(&self) -> Position {
        self.pos
    }
}
