//! External entry points (`spec.md` §6 "External Interfaces").
//!
//! Everything else in this crate is reached through one of these
//! functions: a generic harness, [`parse`], plus one convenience wrapper
//! per syntactic category the grammar distinguishes. Each behaves the
//! same way: build a [`ParseContext`] over `input`, run the requested
//! parser, and return whatever it produced alongside every accumulated
//! [`ParseError`] — even on failure, since `spec.md` §7 requires a
//! partial result rather than an exception for ordinary syntax errors.
//! Only a [`FatalError`] (memory-gauge refusal, replay-budget overrun)
//! escapes as an `Err`.

use crate::ast::{Argument, Declaration, Expression, Program, Statement, Type};
use crate::context::ParseContext;
use crate::error::{ParseError, ProgramError, Signal};
use crate::gauge::{FatalError, MemoryGauge};
use crate::stream::lex;

/// The generic harness every other entry point is built on: run `parse_fn`
/// to completion against `input`, returning its result (or `None` if a
/// non-fatal error aborted the parse outright) alongside every error
/// gathered along the way. Propagates a fatal error as `Err` rather than
/// folding it into the error list, since `spec.md` §5 and §7 both insist a
/// fatal error "is never captured by a buffer" and unwinds "past all
/// buffering frames to the `Parse` entry".
pub fn parse<T>(
    input: &str,
    gauge: impl MemoryGauge,
    parse_fn: impl FnOnce(&mut ParseContext) -> Result<T, Signal>,
) -> Result<(Option<T>, Vec<ParseError>), FatalError> {
    let mut ctx = ParseContext::new(lex(input), gauge);
    match parse_fn(&mut ctx) {
        Ok(value) => Ok((Some(value), ctx.errors)),
        Err(Signal::Error(err)) => {
            ctx.errors.push(err);
            Ok((None, ctx.errors))
        }
        Err(Signal::Fatal(fatal)) => Err(fatal),
    }
}

/// Parses a single expression (`spec.md` §6's `ParseExpression`).
pub fn parse_expression(
    input: &str,
    gauge: impl MemoryGauge,
) -> Result<(Option<Expression>, Vec<ParseError>), FatalError> {
    parse(input, gauge, |ctx| crate::parser::parse_expression(ctx, 0))
}

/// Parses a sequence of statements up to `Eof` (`spec.md` §6's
/// `ParseStatements`).
pub fn parse_statements(
    input: &str,
    gauge: impl MemoryGauge,
) -> Result<(Option<Vec<Statement>>, Vec<ParseError>), FatalError> {
    parse(input, gauge, |ctx| {
        let mut statements = Vec::new();
        loop {
            ctx.skip_trivia_default();
            if ctx.current.kind == crate::token::TokenKind::Eof {
                break;
            }
            match crate::parser::parse_statement(ctx) {
                Ok(stmt) => statements.push(stmt),
                Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
                Err(Signal::Error(err)) => {
                    ctx.report(err);
                    crate::parser::recover_to_statement_boundary(ctx);
                }
            }
        }
        Ok(statements)
    })
}

/// Parses a single type annotation (`spec.md` §6's `ParseType`).
pub fn parse_type(
    input: &str,
    gauge: impl MemoryGauge,
) -> Result<(Option<Type>, Vec<ParseError>), FatalError> {
    parse(input, gauge, |ctx| crate::parser::parse_type(ctx, 0))
}

/// Parses a sequence of top-level declarations up to `Eof` (`spec.md`
/// §6's `ParseDeclarations`).
pub fn parse_declarations(
    input: &str,
    gauge: impl MemoryGauge,
) -> Result<(Option<Vec<Declaration>>, Vec<ParseError>), FatalError> {
    parse(input, gauge, crate::parser::parse_declarations)
}

/// Parses a single parenthesized argument list, e.g. `(1, label: 2)`
/// (`spec.md` §6's `ParseArgumentList`).
pub fn parse_argument_list(
    input: &str,
    gauge: impl MemoryGauge,
) -> Result<(Option<Vec<Argument>>, Vec<ParseError>), FatalError> {
    parse(input, gauge, crate::parser::parse_argument_list)
}

/// Parses a whole program (`spec.md` §6's `ParseProgram`): every
/// top-level declaration, with every accumulated error wrapped into a
/// single [`ProgramError`] that also carries the original source for
/// diagnostic rendering. The `Program` returned is always the (possibly
/// partial, possibly empty) AST built so far — callers must consult
/// `errors` rather than assume a `None` means nothing parsed.
pub fn parse_program(code: &str, gauge: impl MemoryGauge) -> (Program, Option<ProgramError>) {
    match parse(code, gauge, crate::parser::parse_declarations) {
        Ok((declarations, errors)) => {
            let program = Program::new(declarations.unwrap_or_default());
            if errors.is_empty() {
                (program, None)
            } else {
                (program, Some(ProgramError::new(code, errors)))
            }
        }
        Err(fatal) => (
            Program::new(Vec::new()),
            Some(ProgramError::new(
                code,
                vec![ParseError::new(
                    fatal.message,
                    crate::position::Range::empty_at(crate::position::Position::START),
                )],
            )),
        ),
    }
}
