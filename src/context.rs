//! The parse-context data structure (`spec.md` §3 "ParseContext", §4.1).
//!
//! Holds the current token, accumulated errors, the backtracking-cursor
//! stack and its companion buffered-error stack, the replay budget, the
//! memory gauge, and the `NodeId` counter. Every parser routine in
//! [`crate::parser`] takes `&mut ParseContext` as its first argument.

use crate::ast::NodeId;
use crate::error::{ParseError, PResult, Signal};
use crate::gauge::{FatalError, MemoryGauge, MemoryKind};
use crate::position::Range;
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind, TokenValue};

/// Hard limit on tokens re-scanned during replays within a single
/// buffering session (`spec.md` §3). Exceeding it raises a fatal
/// "program too ambiguous" error.
pub const MAX_REPLAYED_TOKENS: usize = 8192;

/// Controls how [`ParseContext::skip_trivia`] behaves (`spec.md` §4.1).
#[derive(Debug, Clone, Copy)]
pub struct TriviaOptions {
    /// If `false`, stop at the first space token carrying
    /// `contains_newline`, leaving it unconsumed.
    pub skip_newlines: bool,
    /// If `true`, accumulate `///`/`/** */` trivia into a doc-string.
    pub parse_doc_strings: bool,
}

impl TriviaOptions {
    pub const fn skip_all() -> Self {
        TriviaOptions {
            skip_newlines: true,
            parse_doc_strings: false,
        }
    }

    pub const fn stop_at_newline() -> Self {
        TriviaOptions {
            skip_newlines: false,
            parse_doc_strings: false,
        }
    }

    pub const fn with_doc_strings(mut self) -> Self {
        self.parse_doc_strings = true;
        self
    }
}

/// The parser's primary state, per `spec.md` §3.
pub struct ParseContext<'a> {
    tokens: Box<dyn TokenStream + 'a>,
    pub current: Token,
    pub errors: Vec<ParseError>,
    backtracking_stack: Vec<usize>,
    buffered_errors_stack: Vec<Vec<ParseError>>,
    replayed_tokens_count: usize,
    gauge: Box<dyn MemoryGauge + 'a>,
    next_node_id: u32,
}

impl<'a> ParseContext<'a> {
    /// Builds a context over `tokens`, seeding `current` with a synthetic
    /// `Eof` per `spec.md` §3 ("initially a synthetic EOF at (0,1,0)")
    /// and then performing the first real `advance()`.
    pub fn new(tokens: impl TokenStream + 'a, gauge: impl MemoryGauge + 'a) -> Self {
        let mut ctx = ParseContext {
            tokens: Box::new(tokens),
            current: Token::synthetic_eof(),
            errors: Vec::new(),
            backtracking_stack: Vec::new(),
            buffered_errors_stack: Vec::new(),
            replayed_tokens_count: 0,
            gauge: Box::new(gauge),
            next_node_id: 0,
        };
        ctx.advance();
        ctx
    }

    /// The original source text, for `ParseProgram`'s combined diagnostic.
    pub fn source(&self) -> &str {
        self.tokens.input()
    }

    /// Mints a fresh [`NodeId`] for the back-reference relations
    /// described in `spec.md` §3 and §9.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Charges `amount` units of `kind` to the memory gauge. Per
    /// `spec.md` §5 and §9, every AST constructor calls this before
    /// building the node it describes, never batching charges.
    pub fn meter(&mut self, kind: MemoryKind, amount: u64) -> PResult<()> {
        self.gauge.meter(kind, amount).map_err(Signal::Fatal)
    }

    /// Reads the next token from the stream. Error tokens are converted
    /// to reported syntax errors and skipped, never surfaced to callers
    /// (`spec.md` §4.1). `Eof` is idempotent.
    pub fn advance(&mut self) {
        loop {
            let token = self.tokens.next();
            if token.kind == TokenKind::Error {
                if let TokenValue::Error(lex_error) = &token.value {
                    self.report(ParseError::new(lex_error.message.clone(), lex_error.range));
                }
                continue;
            }
            self.current = token;
            break;
        }
    }

    /// If `current.kind == kind`, consumes and returns it; else fails
    /// with "expected token `<kind>`".
    pub fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.current.kind == kind {
            let token = self.current.clone();
            self.advance();
            Ok(token)
        } else {
            Err(Signal::Error(ParseError::new(
                format!("expected {kind:?}, found {:?}", self.current.kind),
                self.current.range,
            )))
        }
    }

    /// Like [`ParseContext::expect`], additionally requiring
    /// `current.value == value`.
    pub fn expect_keyword(&mut self, kind: TokenKind, value: &str) -> PResult<Token> {
        if self.current.kind == kind && self.current.value.as_identifier() == Some(value) {
            let token = self.current.clone();
            self.advance();
            Ok(token)
        } else {
            Err(Signal::Error(ParseError::new(
                format!("expected '{value}'"),
                self.current.range,
            )))
        }
    }

    /// `true` if `current` is the identifier-shaped keyword `value`,
    /// without consuming it.
    pub fn at_keyword(&self, value: &str) -> bool {
        self.current.kind == TokenKind::Identifier
            && self.current.value.as_identifier() == Some(value)
    }

    /// Routes `err` to the top buffering frame's error list if one is
    /// open, else to the main `errors` list (`spec.md` §4.1, §7).
    pub fn report(&mut self, err: ParseError) {
        if let Some(top) = self.buffered_errors_stack.last_mut() {
            top.push(err);
        } else {
            self.errors.push(err);
        }
    }

    /// Pushes a backtracking cursor and an empty buffered-error list
    /// (`spec.md` §4.1). Buffering frames nest; nesting must be strictly
    /// balanced (`spec.md` §4.4).
    pub fn start_buffering(&mut self) {
        let cursor = self.tokens.cursor().saturating_sub(1);
        self.backtracking_stack.push(cursor);
        self.buffered_errors_stack.push(Vec::new());
    }

    /// Discards the backtracking cursor and merges the buffered errors
    /// into the parent frame (or the main list at depth 0), resetting
    /// the replay counter (`spec.md` §4.1).
    pub fn accept_buffered(&mut self) {
        self.backtracking_stack.pop();
        let buffered = self.buffered_errors_stack.pop().unwrap_or_default();
        if let Some(parent) = self.buffered_errors_stack.last_mut() {
            parent.extend(buffered);
        } else {
            self.errors.extend(buffered);
        }
        self.replayed_tokens_count = 0;
    }

    /// Reverts the token stream to the buffered cursor, re-reads
    /// `current`, and discards the buffered errors (the alternate parse
    /// may yet succeed). Charges the rewound token count against the
    /// replay budget, raising a fatal ambiguity error past it
    /// (`spec.md` §3, §4.1).
    pub fn replay_buffered(&mut self) -> PResult<()> {
        let cursor = self
            .backtracking_stack
            .pop()
            .expect("replay_buffered called without a matching start_buffering");
        let rewound = self.tokens.cursor().saturating_sub(cursor);
        self.tokens.revert(cursor);
        self.advance();
        self.buffered_errors_stack.pop();
        self.replayed_tokens_count += rewound;
        if self.replayed_tokens_count > MAX_REPLAYED_TOKENS {
            return Err(Signal::Fatal(FatalError::new(
                "program too ambiguous: replay budget exceeded",
            )));
        }
        Ok(())
    }

    /// The number of open buffering frames, exposed for the invariant
    /// test in `spec.md` §8 ("the number of `start_buffering` calls
    /// equals the sum of `accept_buffered` and `replay_buffered` calls").
    pub fn buffering_depth(&self) -> usize {
        self.backtracking_stack.len()
    }

    /// Consumes whitespace, line comments, and block comments per
    /// `spec.md` §4.1/§4.2, optionally building a doc-string as it goes.
    /// Returns `(contains_newline, doc_string)`.
    pub fn skip_trivia(&mut self, opts: TriviaOptions) -> (bool, Option<String>) {
        let mut contains_newline = false;
        let mut doc_string: Option<String> = None;
        let mut block_is_doc = false;
        let mut block_text = String::new();

        loop {
            match self.current.kind {
                TokenKind::Space => {
                    let has_newline =
                        matches!(&self.current.value, TokenValue::Space(space) if space.contains_newline);
                    if has_newline {
                        contains_newline = true;
                        if !opts.skip_newlines {
                            return (contains_newline, doc_string);
                        }
                    }
                    if opts.parse_doc_strings {
                        doc_string = None;
                    }
                    self.advance();
                }
                TokenKind::LineComment => {
                    if opts.parse_doc_strings {
                        if let TokenValue::Comment(text) = &self.current.value {
                            if let Some(rest) = text.strip_prefix("///") {
                                let line = rest.trim_start().to_string();
                                doc_string = Some(match doc_string.take() {
                                    Some(prev) => format!("{prev}\n{line}"),
                                    None => line,
                                });
                            } else {
                                doc_string = None;
                            }
                        }
                    }
                    self.advance();
                }
                TokenKind::BlockCommentStart => {
                    block_is_doc =
                        matches!(&self.current.value, TokenValue::Comment(delim) if delim == "/**");
                    block_text.clear();
                    self.advance();
                }
                TokenKind::BlockCommentContent => {
                    if let TokenValue::Comment(text) = &self.current.value {
                        block_text = text.clone();
                    }
                    self.advance();
                }
                TokenKind::BlockCommentEnd => {
                    if opts.parse_doc_strings {
                        doc_string = if block_is_doc {
                            Some(block_text.trim().to_string())
                        } else {
                            None
                        };
                    }
                    self.advance();
                }
                _ => break,
            }
        }

        (contains_newline, doc_string)
    }

    /// Convenience: skips trivia with default options (newlines skipped,
    /// no doc-string bookkeeping) before inspecting/consuming `current`.
    pub fn skip_trivia_default(&mut self) {
        self.skip_trivia(TriviaOptions::skip_all());
    }

    /// Range of the current token, for error reporting at call sites
    /// that haven't captured one already.
    pub fn current_range(&self) -> Range {
        self.current.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::NoopGauge;
    use crate::stream::lex;

    fn ctx(input: &str) -> ParseContext<'static> {
        ParseContext::new(lex(input), NoopGauge)
    }

    #[test]
    fn advance_skips_error_tokens_and_reports_them() {
        let mut c = ctx("\u{1} a");
        // first advance (during `new`) may have already consumed the
        // error token; ensure at least one error was reported and `a`
        // is reachable as an identifier.
        assert!(!c.errors.is_empty());
        assert_eq!(c.current.value.as_identifier(), Some("a"));
    }

    #[test]
    fn expect_keyword_checks_both_kind_and_spelling() {
        let mut c = ctx("let x");
        assert!(c.expect_keyword(TokenKind::Identifier, "let").is_ok());
        assert_eq!(c.current.value.as_identifier(), Some("x"));
    }

    #[test]
    fn expect_keyword_rejects_wrong_spelling() {
        let mut c = ctx("var x");
        assert!(c.expect_keyword(TokenKind::Identifier, "let").is_err());
    }

    #[test]
    fn buffering_balance_tracks_start_and_resolve_calls() {
        let mut c = ctx("a b c");
        assert_eq!(c.buffering_depth(), 0);
        c.start_buffering();
        assert_eq!(c.buffering_depth(), 1);
        c.accept_buffered();
        assert_eq!(c.buffering_depth(), 0);
    }

    #[test]
    fn replay_buffered_restores_current_token() {
        let mut c = ctx("foo bar");
        assert_eq!(c.current.value.as_identifier(), Some("foo"));
        c.start_buffering();
        c.advance();
        assert_eq!(c.current.value.as_identifier(), Some("bar"));
        c.replay_buffered().unwrap();
        assert_eq!(c.current.value.as_identifier(), Some("foo"));
    }

    #[test]
    fn reported_errors_during_buffering_are_not_in_main_list_until_accepted() {
        let mut c = ctx("a b");
        c.start_buffering();
        c.report(ParseError::new("buffered", c.current_range()));
        assert!(c.errors.is_empty());
        c.accept_buffered();
        assert_eq!(c.errors.len(), 1);
    }

    #[test]
    fn reported_errors_during_buffering_are_discarded_on_replay() {
        let mut c = ctx("a b");
        c.start_buffering();
        c.report(ParseError::new("buffered", c.current_range()));
        c.replay_buffered().unwrap();
        assert!(c.errors.is_empty());
    }

    #[test]
    fn nested_buffering_propagates_one_level_up_on_accept() {
        let mut c = ctx("a b c");
        c.start_buffering();
        c.start_buffering();
        c.report(ParseError::new("inner", c.current_range()));
        c.accept_buffered(); // inner accepted into outer frame
        assert!(c.errors.is_empty());
        c.accept_buffered(); // outer accepted into main list
        assert_eq!(c.errors.len(), 1);
    }

    #[test]
    fn skip_trivia_collects_consecutive_line_doc_comments() {
        let mut c = ctx("/// first\n/// second\nfun");
        let (_, doc) = c.skip_trivia(TriviaOptions::skip_all().with_doc_strings());
        assert_eq!(doc.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn skip_trivia_block_doc_replaces_buffer() {
        let mut c = ctx("/// line doc\n/** block doc */\nfun");
        let (_, doc) = c.skip_trivia(TriviaOptions::skip_all().with_doc_strings());
        assert_eq!(doc.as_deref(), Some("block doc"));
    }

    #[test]
    fn skip_trivia_resets_buffer_on_plain_comment() {
        let mut c = ctx("/// doc\n// plain\nfun");
        let (_, doc) = c.skip_trivia(TriviaOptions::skip_all().with_doc_strings());
        assert_eq!(doc, None);
    }

    #[test]
    fn skip_trivia_stops_at_newline_when_requested() {
        let mut c = ctx("   \nfun");
        let (contains_newline, _) = c.skip_trivia(TriviaOptions::stop_at_newline());
        assert!(contains_newline);
        assert_eq!(c.current.kind, TokenKind::Space);
    }
}
