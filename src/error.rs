//! Parser-level error types and the non-local control transfer mechanism.
//!
//! Resolves the Open Question in `spec.md` §9: this crate threads a
//! `Result<T, Signal>` through every parser routine rather than using
//! unwinding. A speculative attempt (`spec.md` §4.4) calls
//! [`crate::context::ParseContext::start_buffering`], then inspects the
//! `Result` of the candidate sub-parser: `Ok` (with any extra lookahead
//! condition satisfied) accepts the buffer; `Ok` otherwise or
//! `Err(Signal::Error(_))` replays it; `Err(Signal::Fatal(_))` propagates
//! immediately via `?`, bypassing the buffering frame entirely.

use std::fmt;

pub use crate::gauge::FatalError;
use crate::position::Range;

/// An ordinary syntax error: unexpected token, missing token, unterminated
/// construct, malformed literal, or a semantic-structural error (e.g.
/// "invalid second access modifier") that `spec.md` §7 treats as a syntax
/// error for propagation purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub range: Range,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: Range) -> Self {
        ParseError {
            message: message.into(),
            range,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.range.start.line, self.range.start.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// The non-local control transfer carried by every parser routine's
/// `Result`. See the module docs for how buffering frames interact with
/// each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Ordinary; may be swallowed by a buffering frame on replay.
    Error(ParseError),
    /// Replay-limit exceeded, or the memory gauge refused a charge.
    /// Bypasses every buffering frame unconditionally.
    Fatal(FatalError),
}

impl From<ParseError> for Signal {
    fn from(err: ParseError) -> Self {
        Signal::Error(err)
    }
}

impl From<FatalError> for Signal {
    fn from(err: FatalError) -> Self {
        Signal::Fatal(err)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Error(e) => write!(f, "{e}"),
            Signal::Fatal(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Signal {}

/// Shorthand used throughout the parser for a routine's result type.
pub type PResult<T> = Result<T, Signal>;

/// The combined diagnostic returned by `ParseProgram` (`spec.md` §6):
/// wraps the original source alongside every accumulated [`ParseError`]
/// so a caller can render a multi-error report with source excerpts.
#[derive(Debug, Clone)]
pub struct ProgramError {
    pub source: String,
    pub errors: Vec<ParseError>,
}

impl ProgramError {
    pub fn new(source: impl Into<String>, errors: Vec<ParseError>) -> Self {
        ProgramError {
            source: source.into(),
            errors,
        }
    }
}

impl fmt::Display for ProgramError {
    /// Renders one `ariadne::Report` per accumulated error into this
    /// formatter, per `spec.md` §6 ("human-readable multi-error format,
    /// one entry per error, with source excerpt and caret").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let mut buf: Vec<u8> = Vec::new();
            let span = error.range.start.offset..error.range.end.offset.max(error.range.start.offset + 1);
            let report = Report::build(ReportKind::Error, ("source", span.clone()))
                .with_config(Config::default().with_index_type(IndexType::Byte))
                .with_message(&error.message)
                .with_label(Label::new(("source", span)).with_message(&error.message))
                .finish();
            if report
                .write(("source", Source::from(&self.source)), &mut buf)
                .is_ok()
            {
                write!(f, "{}", String::from_utf8_lossy(&buf))?;
            } else {
                write!(f, "{error}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ProgramError {}
