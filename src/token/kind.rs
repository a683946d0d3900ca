//! Token kinds recognized by the Solstice lexer.

/// The syntactic kind of a [`super::Token`](crate::token::Token).
///
/// `TokenKind` is deliberately a small, `Copy`, unit-only enum: it is the
/// lookup key for the Pratt engine's null/left-denotation tables in
/// `crate::parser::expr` and `crate::parser::types`, so it must be cheap
/// to hash and compare.
/// Any payload a token carries (the decoded text of an identifier, the
/// big-integer value of a literal, ...) lives in
/// [`TokenValue`](super::TokenValue) instead.
///
/// Keywords are not represented here. The language has no reserved-word
/// lexical category: `let`, `fun`, `true`, `nil`, `as`, `auth`, and every
/// other keyword are lexed as an ordinary [`TokenKind::Identifier`] and
/// recognized by the parser comparing `current.value` against the
/// expected spelling (see [`crate::context::ParseContext::expect_keyword`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier, including every keyword spelling.
    Identifier,
    /// An integer literal in base 2, 8, or 10 (see [`super::IntegerBase`]).
    Integer,
    /// An integer literal in base 16 (`0x...`). Kept distinct from
    /// [`TokenKind::Integer`] because hex digit scanning accepts `a`-`f`
    /// and is driven by a different lexer state.
    HexadecimalInteger,
    /// A fixed-point literal, e.g. `1.05`.
    FixedPoint,
    /// A double-quoted string literal.
    String,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    Comma,
    Colon,
    Semicolon,
    Dot,
    /// `?`
    Question,
    /// `??`
    DoubleQuestion,

    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,

    /// `<-` (move transfer)
    Arrow,
    /// `<-!` (forced-move transfer)
    ForceArrow,
    /// `<->` (swap)
    Swap,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `@` (resource-type marker)
    At,
    /// `#` (pragma marker)
    Hash,

    /// `//...` to end of line.
    LineComment,
    /// `/**` or `/*`.
    BlockCommentStart,
    /// The text content between a block comment's delimiters.
    BlockCommentContent,
    /// `*/`.
    BlockCommentEnd,

    /// Whitespace; see [`super::SpaceValue`] for the `contains_newline` flag.
    Space,

    /// A lexical error (unterminated string, invalid character, malformed
    /// numeric literal, ...). Never observed by parser code directly: see
    /// [`crate::context::ParseContext::advance`].
    Error,

    /// End of input. The stream yields exactly one logical `Eof` and
    /// continues returning it on every subsequent `next()`.
    Eof,
}

impl TokenKind {
    /// `true` for any trivia kind: whitespace or comment tokens that carry
    /// no syntactic meaning of their own.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Space
                | TokenKind::LineComment
                | TokenKind::BlockCommentStart
                | TokenKind::BlockCommentContent
                | TokenKind::BlockCommentEnd
        )
    }
}
