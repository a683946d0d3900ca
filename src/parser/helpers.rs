//! Shared parsing helpers: parameter lists, argument lists, access
//! modifiers, and block parsing. Used by [`super::expr`] (anonymous
//! function literals), [`super::decl`] (function, composite, and
//! transaction declarations), and [`super::stmt`] (blocks).

use crate::ast::{Access, Argument, Block, Parameter, Statement};
use crate::context::ParseContext;
use crate::error::{ParseError, PResult, Signal};
use crate::gauge::MemoryKind;
use crate::token::TokenKind;

/// `priv | pub ('(' 'set' ')')? | access '(' ('self'|'contract'|'account'|'all') ')'`.
/// Consumes nothing and returns [`Access::NotSpecified`] if none of these
/// keywords is present.
pub fn parse_access(ctx: &mut ParseContext) -> PResult<Access> {
    ctx.skip_trivia_default();
    if ctx.at_keyword("priv") {
        ctx.advance();
        return Ok(Access::Private);
    }
    if ctx.at_keyword("pub") {
        ctx.advance();
        ctx.skip_trivia_default();
        if ctx.current.kind == TokenKind::LeftParen {
            ctx.advance();
            ctx.skip_trivia_default();
            ctx.expect_keyword(TokenKind::Identifier, "set")?;
            ctx.skip_trivia_default();
            ctx.expect(TokenKind::RightParen)?;
            return Ok(Access::PublicSettable);
        }
        return Ok(Access::Public);
    }
    if ctx.at_keyword("access") {
        ctx.advance();
        ctx.skip_trivia_default();
        ctx.expect(TokenKind::LeftParen)?;
        ctx.skip_trivia_default();
        let access = if ctx.at_keyword("self") {
            ctx.advance();
            Access::Self_
        } else if ctx.at_keyword("contract") {
            ctx.advance();
            Access::Contract
        } else if ctx.at_keyword("account") {
            ctx.advance();
            Access::Account
        } else if ctx.at_keyword("all") {
            ctx.advance();
            Access::All
        } else {
            return Err(Signal::Error(ParseError::new(
                "expected 'self', 'contract', 'account', or 'all'",
                ctx.current_range(),
            )));
        };
        ctx.skip_trivia_default();
        ctx.expect(TokenKind::RightParen)?;
        return Ok(access);
    }
    Ok(Access::NotSpecified)
}

/// A parenthesized, comma-separated parameter list: `(label? name: Type, ...)`.
/// A lone identifier before `:` is the parameter's `name`; two consecutive
/// identifiers are `label name`. A label spelled `_` means "no external
/// label" and is dropped rather than stored as `Some("_")`.
pub fn parse_parameters(ctx: &mut ParseContext) -> PResult<Vec<Parameter>> {
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::LeftParen)?;
    let mut parameters = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind == TokenKind::Eof {
        return Err(missing_parameter_list_close(ctx));
    }
    if ctx.current.kind != TokenKind::RightParen {
        loop {
            parameters.push(parse_parameter(ctx)?);
            ctx.skip_trivia_default();
            match ctx.current.kind {
                TokenKind::Comma => {
                    ctx.advance();
                    ctx.skip_trivia_default();
                    match ctx.current.kind {
                        TokenKind::RightParen => {
                            return Err(Signal::Error(ParseError::new(
                                "expected parameter or end of parameter list",
                                ctx.current_range(),
                            )));
                        }
                        TokenKind::Eof => return Err(missing_parameter_list_close(ctx)),
                        _ => continue,
                    }
                }
                TokenKind::RightParen => break,
                TokenKind::Eof => return Err(missing_parameter_list_close(ctx)),
                _ => {
                    return Err(Signal::Error(ParseError::new(
                        "expected comma or end of parameter list",
                        ctx.current_range(),
                    )));
                }
            }
        }
    }
    ctx.expect(TokenKind::RightParen)?;
    Ok(parameters)
}

/// `spec.md`'s literal boundary-behavior diagnostic for a parameter list
/// left open at end of input.
fn missing_parameter_list_close(ctx: &ParseContext) -> Signal {
    Signal::Error(ParseError::new(
        "missing ')' at end of parameter list",
        ctx.current_range(),
    ))
}

fn parse_parameter(ctx: &mut ParseContext) -> PResult<Parameter> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();
    let first = ctx.expect(TokenKind::Identifier)?;
    let first_name = first
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    ctx.skip_trivia_default();
    let (label, name) = if ctx.current.kind == TokenKind::Identifier {
        let second = ctx.expect(TokenKind::Identifier)?;
        let second_name = second
            .value
            .as_identifier()
            .expect("Identifier token always carries an identifier value")
            .to_string();
        let label = if first_name == "_" { None } else { Some(first_name) };
        (label, second_name)
    } else {
        (None, first_name)
    };

    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    let type_annotation = super::types::parse_type_annotation(ctx)?;
    let range = start.join(&type_annotation.range);
    ctx.meter(MemoryKind::Parameter, 1)?;
    Ok(Parameter {
        label,
        name,
        type_annotation,
        range,
    })
}

/// A parenthesized, comma-separated argument list: `(label: value, ...)`.
/// Each argument speculatively tries `identifier ':'` as a label; on
/// failure it replays and parses a plain expression.
pub fn parse_arguments(ctx: &mut ParseContext) -> PResult<Vec<Argument>> {
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::LeftParen)?;
    parse_argument_list_items(ctx)
}

/// Parses a comma-separated argument list up to and including the
/// closing `)`, assuming the opening `(` has already been consumed by
/// the caller (the Pratt driver, for a postfix invocation).
pub fn parse_argument_list_items(ctx: &mut ParseContext) -> PResult<Vec<Argument>> {
    let mut arguments = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::RightParen {
        loop {
            arguments.push(parse_argument(ctx)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    ctx.expect(TokenKind::RightParen)?;
    Ok(arguments)
}

fn parse_argument(ctx: &mut ParseContext) -> PResult<Argument> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();

    ctx.start_buffering();
    let label = match try_parse_argument_label(ctx) {
        Ok(label) => {
            ctx.accept_buffered();
            Some(label)
        }
        Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
        Err(_) => {
            ctx.replay_buffered()?;
            None
        }
    };

    let value = super::expr::parse_expression(ctx, 0)?;
    let range = start.join(&value.range());
    ctx.meter(MemoryKind::Argument, 1)?;
    Ok(Argument { label, value, range })
}

fn try_parse_argument_label(ctx: &mut ParseContext) -> PResult<String> {
    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    Ok(name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string())
}

/// A `{`-delimited statement block, recovering from a statement-level
/// error by skipping to the next plausible synchronization point (the
/// closing `}` or the start of another statement) and continuing.
pub fn parse_block(ctx: &mut ParseContext) -> PResult<Block> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();
    ctx.expect(TokenKind::LeftBrace)?;
    let mut statements = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if ctx.current.kind == TokenKind::RightBrace || ctx.current.kind == TokenKind::Eof {
            break;
        }
        match super::stmt::parse_statement(ctx) {
            Ok(stmt) => statements.push(stmt),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                recover_to_statement_boundary(ctx);
            }
        }
    }
    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.join(&end.range);
    ctx.meter(MemoryKind::Block, 1)?;
    Ok(Block { statements, range })
}

const STATEMENT_START_KEYWORDS: &[&str] = &[
    "let", "var", "return", "if", "while", "for", "emit", "break", "continue", "switch", "fun",
];

/// Top-level and composite-member declaration starts, used by
/// [`super::decl`]'s recovery loops.
const DECLARATION_START_KEYWORDS: &[&str] = &[
    "let", "var", "fun", "import", "event", "struct", "resource", "contract", "enum", "interface",
    "transaction", "priv", "pub", "access", "case", "init", "destroy", "prepare", "execute",
    "post", "pre",
];

/// Skips tokens until the next `}` (not consumed), `Eof`, or a token that
/// plausibly starts a new statement (not consumed either), giving the
/// enclosing block's loop a stable place to resume after a statement
/// fails to parse.
pub(crate) fn recover_to_statement_boundary(ctx: &mut ParseContext) {
    loop {
        ctx.skip_trivia_default();
        match ctx.current.kind {
            TokenKind::RightBrace | TokenKind::Eof => break,
            TokenKind::Identifier
                if STATEMENT_START_KEYWORDS
                    .iter()
                    .any(|kw| ctx.at_keyword(kw)) =>
            {
                break
            }
            _ => ctx.advance(),
        }
    }
}

/// Like [`recover_to_statement_boundary`], but also stops before a
/// `case`/`default` keyword so a failing statement inside a `switch` case
/// body doesn't consume the next case's label.
pub(crate) fn recover_to_case_boundary(ctx: &mut ParseContext) {
    loop {
        ctx.skip_trivia_default();
        match ctx.current.kind {
            TokenKind::RightBrace | TokenKind::Eof => break,
            TokenKind::Identifier
                if ctx.at_keyword("case")
                    || ctx.at_keyword("default")
                    || STATEMENT_START_KEYWORDS.iter().any(|kw| ctx.at_keyword(kw)) =>
            {
                break
            }
            _ => ctx.advance(),
        }
    }
}

/// Skips tokens until the next `}` (not consumed), `Eof`, or a token that
/// plausibly starts a new declaration (not consumed either), used by
/// [`super::decl`]'s declaration-list and composite-member-list recovery.
pub(crate) fn recover_to_declaration_boundary(ctx: &mut ParseContext) {
    loop {
        ctx.skip_trivia_default();
        match ctx.current.kind {
            TokenKind::RightBrace | TokenKind::Eof | TokenKind::Hash => break,
            TokenKind::Identifier
                if DECLARATION_START_KEYWORDS.iter().any(|kw| ctx.at_keyword(kw)) =>
            {
                break
            }
            _ => ctx.advance(),
        }
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
    fn parse_access_recognizes_priv() {
        let mut c = ctx("priv");
        assert_eq!(parse_access(&mut c).unwrap(), Access::Private);
    }

    #[test]
    fn parse_access_recognizes_pub_settable() {
        let mut c = ctx("pub(set)");
        assert_eq!(parse_access(&mut c).unwrap(), Access::PublicSettable);
    }

    #[test]
    fn parse_access_recognizes_access_self() {
        let mut c = ctx("access(self)");
        assert_eq!(parse_access(&mut c).unwrap(), Access::Self_);
    }

    #[test]
    fn parse_access_defaults_to_not_specified() {
        let mut c = ctx("let");
        assert_eq!(parse_access(&mut c).unwrap(), Access::NotSpecified);
    }

    #[test]
    fn parse_parameters_handles_label_and_name() {
        let mut c = ctx("(amount to: Int)");
        let params = parse_parameters(&mut c).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].label.as_deref(), Some("amount"));
        assert_eq!(params[0].name, "to");
    }

    #[test]
    fn parse_parameters_underscore_label_means_no_label() {
        let mut c = ctx("(_ to: Int)");
        let params = parse_parameters(&mut c).unwrap();
        assert_eq!(params[0].label, None);
        assert_eq!(params[0].name, "to");
    }

    #[test]
    fn parse_parameters_single_identifier_is_name_only() {
        let mut c = ctx("(amount: Int)");
        let params = parse_parameters(&mut c).unwrap();
        assert_eq!(params[0].label, None);
        assert_eq!(params[0].name, "amount");
    }

    #[test]
    fn parse_parameters_rejects_trailing_comma() {
        let mut c = ctx("(amount: Int,)");
        let err = parse_parameters(&mut c).unwrap_err();
        assert!(err.to_string().contains("expected parameter or end of parameter list"));
    }

    #[test]
    fn parse_parameters_reports_missing_comma() {
        let mut c = ctx("(amount: Int amount2: Int)");
        let err = parse_parameters(&mut c).unwrap_err();
        assert!(err.to_string().contains("expected comma or end of parameter list"));
    }

    #[test]
    fn parse_parameters_reports_missing_close_paren_at_eof() {
        let mut c = ctx("(amount: Int");
        let err = parse_parameters(&mut c).unwrap_err();
        assert!(err.to_string().contains("missing ')' at end of parameter list"));
    }

    #[test]
    fn parse_parameters_reports_missing_close_paren_on_empty_unterminated_list() {
        let mut c = ctx("(");
        let err = parse_parameters(&mut c).unwrap_err();
        assert!(err.to_string().contains("missing ')' at end of parameter list"));
    }

    #[test]
    fn parse_arguments_recognizes_labels() {
        let mut c = ctx("(amount: 1, 2)");
        let args = parse_arguments(&mut c).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].label.as_deref(), Some("amount"));
        assert_eq!(args[1].label, None);
    }

    #[test]
    fn parse_block_recovers_after_a_bad_statement() {
        let mut c = ctx("{ @ let x = 1 }");
        let block = parse_block(&mut c).unwrap();
        assert_eq!(!c.errors.is_empty(), true);
        assert_eq!(block.statements.len(), 1);
    }
}
