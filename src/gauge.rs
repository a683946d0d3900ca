//! Memory metering for AST node construction.
//!
//! `spec.md` §5 and §9 require every AST constructor to charge an
//! external, opaque "memory gauge" before building the node it describes,
//! and to propagate a fatal error immediately (never batched, never
//! swallowed by a buffering frame) if the gauge refuses. [`MemoryGauge`]
//! is that contract; [`MemoryKind`] is the charge key.

use std::fmt;

/// The kind of syntactic value being charged to a [`MemoryGauge`].
///
/// Mirrors the node families in `spec.md` §3 plus a few primitive kinds
/// (`SyntaxToken`, `Identifier`, `RawString`, `BigInt`) that recur across
/// many node constructors. Kept as a flat, `Copy` enum so charging never
/// allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryKind {
    SyntaxToken,
    Identifier,
    RawString,
    BigInt,
    TypeAnnotation,
    Type,
    Expression,
    Array,
    Dictionary,
    DictionaryEntry,
    Argument,
    Parameter,
    Statement,
    Block,
    Declaration,
    Condition,
    Conditions,
}

/// A fatal, non-recoverable error. Per `spec.md` §7, fatal errors "never
/// enter buffered-error frames; they unwind to the top-level entry point
/// which returns them."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub message: String,
}

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        FatalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fatal: {}", self.message)
    }
}

impl std::error::Error for FatalError {}

/// External memory-metering collaborator.
///
/// `spec.md` §6: "`Meter(kind, amount) → unit | fatal`. AST constructors
/// call it for each node; the gauge may raise a fatal error that the
/// parser propagates unchanged."
pub trait MemoryGauge {
    fn meter(&mut self, kind: MemoryKind, amount: u64) -> Result<(), FatalError>;
}

/// A gauge that never refuses. The default for callers that don't need
/// resource accounting (most tests, and any embedder that meters
/// elsewhere).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGauge;

impl MemoryGauge for NoopGauge {
    fn meter(&mut self, _kind: MemoryKind, _amount: u64) -> Result<(), FatalError> {
        Ok(())
    }
}

/// A gauge with a hard ceiling on total charged units, used to exercise
/// the fatal-error propagation path in tests without constructing a
/// pathologically large program.
#[derive(Debug, Clone)]
pub struct LimitedGauge {
    pub used: u64,
    pub limit: u64,
}

impl LimitedGauge {
    pub fn new(limit: u64) -> Self {
        LimitedGauge { used: 0, limit }
    }
}

impl MemoryGauge for LimitedGauge {
    fn meter(&mut self, kind: MemoryKind, amount: u64) -> Result<(), FatalError> {
        self.used = self.used.saturating_add(amount);
        if self.used > self.limit {
            Err(FatalError::new(format!(
                "memory gauge exhausted while charging {:?} ({} used of {} allowed)",
                kind, self.used, self.limit
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_gauge_never_refuses() {
        let mut gauge = NoopGauge;
        for _ in 0..1000 {
            assert!(gauge.meter(MemoryKind::Expression, 1).is_ok());
        }
    }

    #[test]
    fn limited_gauge_refuses_past_its_limit() {
        let mut gauge = LimitedGauge::new(10);
        assert!(gauge.meter(MemoryKind::Expression, 5).is_ok());
        assert!(gauge.meter(MemoryKind::Expression, 5).is_ok());
        assert!(gauge.meter(MemoryKind::Expression, 1).is_err());
    }
}
