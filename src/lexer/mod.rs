//! Lexical analyzer for the Solstice language.
//!
//! `spec.md` treats lexical scanning as an external collaborator specified
//! only at the interface level — the parser only depends on
//! [`crate::stream::TokenStream`]. This module is a concrete
//! implementation of that interface: a hand-written scanner that turns
//! source text into a flat `Vec<Token>`, which [`crate::stream::VecTokenStream`]
//! then wraps to provide the `cursor()`/`revert()` contract the parser
//! relies on for speculative buffering.
//!
//! # Supported lexemes
//!
//! - **Identifiers** (and, indistinguishably at this layer, keywords):
//!   ASCII alphabetic or `_` start, ASCII alphanumeric or `_` continuation.
//!   Non-ASCII characters are rejected with a [`LexError`].
//! - **Integer literals**: decimal, or `0b`/`0o`/`0x` prefixed, with `_`
//!   digit separators allowed anywhere in the digit run.
//! - **Fixed-point literals**: `123.456`.
//! - **String literals**: double-quoted, with `\n \t \r \\ \"` escapes.
//! - **Punctuation**: see [`crate::token::TokenKind`].
//! - **Comments**: `//` line comments (including `///` doc comments) and
//!   `/* ... */` block comments (including `/** ... */` doc comments),
//!   emitted as separate start/content/end tokens so the doc-string
//!   processor in [`crate::context`] can distinguish doc from plain forms
//!   without re-scanning raw source.
//! - **Whitespace**: runs of whitespace collapse into one
//!   [`crate::token::TokenKind::Space`] token carrying a `contains_newline`
//!   flag.
//!
//! # Module Structure
//!
//! - [`error`] - [`LexError`]
//! - [`cursor`] - character-level position tracking
//! - [`number`] - integer / fixed-point literal scanning
//! - [`string`] - string literal scanning
//!
//! # See Also
//!
//! * [`crate::token`] - the token types produced here
//! * [`crate::stream`] - wraps the produced `Vec<Token>` as a restartable cursor

mod cursor;
mod error;
mod number;
mod string;

#[cfg(test)]
mod tests;

pub use error::LexError;

use crate::position::{Position, Range};
use crate::token::{SpaceValue, Token, TokenKind, TokenValue};

/// A lexical analyzer that tokenizes Solstice source code.
///
/// Designed for single use: construct with [`Lexer::new`], call
/// [`Lexer::tokenize`] once.
pub struct Lexer<'a> {
    input: &'a str,
    pos: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` over `input`.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: Position::START,
        }
    }

    /// Tokenizes the entire input, returning every token including trivia
    /// (whitespace and comments). The returned vector always ends with
    /// exactly one [`TokenKind::Eof`] token.
    ///
    /// This never fails: lexical errors become [`TokenKind::Error`] tokens
    /// inline, per `spec.md` §4.1 ("Error tokens are not returned to
    /// callers; they are converted to syntax errors and skipped").
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            if self.is_eof() {
                tokens.push(Token::bare(TokenKind::Eof, Range::empty_at(self.pos())));
                break;
            }
            self.next_tokens(&mut tokens);
        }
        tokens
    }

    /// Scans one lexeme, pushing the token(s) it produces onto `tokens`.
    /// Most lexemes produce exactly one token; block comments produce
    /// three (start, content, end) since they are modeled as a trio so the
    /// doc-comment processor can tell `/**`-opened comments apart from
    /// `/*`-opened ones without re-scanning source text.
    fn next_tokens(&mut self, tokens: &mut Vec<Token>) {
        let c = match self.current_char() {
            Some(c) => c,
            None => unreachable!("next_tokens called at EOF"),
        };

        if c.is_whitespace() {
            tokens.push(self.scan_space());
            return;
        }
        if c == '/' && matches!(self.peek_char(1), Some('/')) {
            tokens.push(self.scan_line_comment());
            return;
        }
        if c == '/' && matches!(self.peek_char(1), Some('*')) {
            tokens.push(self.scan_block_comment_start());
            let (content, end) = self.scan_block_comment_body_and_end();
            tokens.push(content);
            tokens.push(end);
            return;
        }
        if c == '"' {
            tokens.push(self.scan_string());
            return;
        }
        if c.is_ascii_digit() {
            tokens.push(self.scan_number());
            return;
        }
        if c.is_alphabetic() || c == '_' {
            if c.is_ascii() {
                tokens.push(self.scan_identifier());
                return;
            }
            let start = self.pos();
            self.bump();
            let range = Range::new(start, self.pos());
            tokens.push(self.error_token("non-ASCII characters are not permitted in identifiers", range));
            return;
        }

        tokens.push(self.scan_punctuation());
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos();
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let range = Range::new(start, self.pos());
        Token::new(TokenKind::Identifier, TokenValue::Identifier(name), range)
    }

    fn scan_space(&mut self) -> Token {
        let start = self.pos();
        let mut contains_newline = false;
        while let Some(c) = self.current_char() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                contains_newline = true;
            }
            self.bump();
        }
        let range = Range::new(start, self.pos());
        Token::new(
            TokenKind::Space,
            TokenValue::Space(SpaceValue { contains_newline }),
            range,
        )
    }

    fn scan_line_comment(&mut self) -> Token {
        let start = self.pos();
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        let range = Range::new(start, self.pos());
        Token::new(TokenKind::LineComment, TokenValue::Comment(text), range)
    }

    fn scan_block_comment_start(&mut self) -> Token {
        let start = self.pos();
        self.bump(); // '/'
        self.bump(); // '*'
        let mut delimiter = String::from("/*");
        if self.eat('*') {
            delimiter.push('*');
        }
        let range = Range::new(start, self.pos());
        Token::new(
            TokenKind::BlockCommentStart,
            TokenValue::Comment(delimiter),
            range,
        )
    }

    /// Scans the body and closing `*/` of a block comment whose opening
    /// delimiter has already been produced by [`Lexer::scan_block_comment_start`].
    fn scan_block_comment_body_and_end(&mut self) -> (Token, Token) {
        let content_start = self.pos();
        let mut text = String::new();
        loop {
            if self.is_eof() {
                let range = Range::new(content_start, self.pos());
                let content = Token::new(TokenKind::BlockCommentContent, TokenValue::Comment(text), range);
                let end = self.error_token(
                    "unterminated block comment",
                    Range::empty_at(self.pos()),
                );
                return (content, end);
            }
            if self.current_char() == Some('*') && self.peek_char(1) == Some('/') {
                break;
            }
            text.push(self.current_char().expect("checked is_eof above"));
            self.bump();
        }
        let content_range = Range::new(content_start, self.pos());
        let content = Token::new(
            TokenKind::BlockCommentContent,
            TokenValue::Comment(text),
            content_range,
        );

        let end_start = self.pos();
        self.bump(); // '*'
        self.bump(); // '/'
        let end_range = Range::new(end_start, self.pos());
        let end = Token::new(
            TokenKind::BlockCommentEnd,
            TokenValue::Comment("*/".to_string()),
            end_range,
        );
        (content, end)
    }

    fn error_token(&self, message: impl Into<String>, range: Range) -> Token {
        let error = LexError::new(message, range);
        Token::new(TokenKind::Error, TokenValue::Error(error), range)
    }

    fn scan_punctuation(&mut self) -> Token {
        let start = self.pos();
        let c = self.current_char().expect("scan_punctuation called at EOF");
        self.bump();

        macro_rules! bare {
            ($kind:expr) => {{
                let range = Range::new(start, self.pos());
                Token::bare($kind, range)
            }};
        }

        match c {
            '(' => bare!(TokenKind::LeftParen),
            ')' => bare!(TokenKind::RightParen),
            '{' => bare!(TokenKind::LeftBrace),
            '}' => bare!(TokenKind::RightBrace),
            '[' => bare!(TokenKind::LeftBracket),
            ']' => bare!(TokenKind::RightBracket),
            ',' => bare!(TokenKind::Comma),
            ':' => bare!(TokenKind::Colon),
            ';' => bare!(TokenKind::Semicolon),
            '.' => bare!(TokenKind::Dot),
            '+' => bare!(TokenKind::Plus),
            '-' => bare!(TokenKind::Minus),
            '*' => bare!(TokenKind::Star),
            '%' => bare!(TokenKind::Percent),
            '^' => bare!(TokenKind::Caret),
            '@' => bare!(TokenKind::At),
            '#' => bare!(TokenKind::Hash),
            '?' => {
                if self.eat('?') {
                    bare!(TokenKind::DoubleQuestion)
                } else {
                    bare!(TokenKind::Question)
                }
            }
            '=' => {
                if self.eat('=') {
                    bare!(TokenKind::EqualEqual)
                } else {
                    bare!(TokenKind::Equal)
                }
            }
            '!' => {
                if self.eat('=') {
                    bare!(TokenKind::NotEqual)
                } else {
                    bare!(TokenKind::Bang)
                }
            }
            '>' => {
                if self.eat('=') {
                    bare!(TokenKind::GreaterEqual)
                } else {
                    bare!(TokenKind::Greater)
                }
            }
            '&' => {
                if self.eat('&') {
                    bare!(TokenKind::AmpAmp)
                } else {
                    bare!(TokenKind::Amp)
                }
            }
            '|' => {
                if self.eat('|') {
                    bare!(TokenKind::PipePipe)
                } else {
                    bare!(TokenKind::Pipe)
                }
            }
            '/' => bare!(TokenKind::Slash),
            '<' => {
                if self.eat('-') {
                    if self.eat('!') {
                        bare!(TokenKind::ForceArrow)
                    } else if self.eat('>') {
                        bare!(TokenKind::Swap)
                    } else {
                        bare!(TokenKind::Arrow)
                    }
                } else if self.eat('=') {
                    bare!(TokenKind::LessEqual)
                } else {
                    bare!(TokenKind::Less)
                }
            }
            other => {
                let range = Range::new(start, self.pos());
                self.error_token(format!("unexpected character '{}'", other), range)
            }
        }
    }
}
