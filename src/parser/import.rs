//! Import declaration parsing (`spec.md` §4.4, §4.5).
//!
//! `import a, b, from from 0x01` is a legal, if perverse, import: `from`
//! has no reserved-word status, so it can appear both as one of the
//! imported names and as the keyword introducing the location clause.
//! The two are told apart with a single token of buffered lookahead.

use crate::ast::{Declaration, ImportDeclaration};
use crate::context::ParseContext;
use crate::error::{ParseError, PResult};
use crate::gauge::MemoryKind;
use crate::token::TokenKind;

/// `'import' (name (',' name)*)? ('from' location)?` where `location` is
/// an address, string, or identifier expression.
pub fn parse_import(ctx: &mut ParseContext) -> PResult<Declaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "import")?;

    let mut identifiers = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if ctx.current.kind != TokenKind::Identifier {
            break;
        }
        if ctx.at_keyword("from") {
            if !resolve_from_as_identifier(ctx)? {
                break;
            }
        }
        let name_token = ctx.expect(TokenKind::Identifier)?;
        let name = name_token
            .value
            .as_identifier()
            .expect("Identifier token always carries an identifier value")
            .to_string();
        identifiers.push(name);
        ctx.meter(MemoryKind::Identifier, 1)?;

        ctx.skip_trivia_default();
        if ctx.current.kind == TokenKind::Comma {
            ctx.advance();
            continue;
        }
        break;
    }

    ctx.skip_trivia_default();
    let location = if ctx.at_keyword("from") {
        ctx.advance();
        ctx.skip_trivia_default();
        Some(super::expr::parse_expression(ctx, 0)?)
    } else if identifiers.is_empty() && is_location_start(ctx) {
        Some(super::expr::parse_expression(ctx, 0)?)
    } else {
        None
    };

    let end = location
        .as_ref()
        .map(|loc| loc.range())
        .unwrap_or(start.range);
    let range = start.range.join(&end);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(Declaration::Import(ImportDeclaration {
        identifiers,
        location,
        range,
    }))
}

/// Decides, with one token of buffered lookahead past a `from` the
/// identifier loop has just reached, whether that `from` is itself an
/// imported name (list continues) or the `from` keyword (list ends).
///
/// Per `spec.md` §4.4: if the token immediately following `from` is a
/// comma, `from` must be a name (a keyword can't be followed by `,`
/// inside the list); anything else means `from` starts the location
/// clause, and the location parser is perfectly happy to see a bare
/// identifier named `from` there too.
fn resolve_from_as_identifier(ctx: &mut ParseContext) -> PResult<bool> {
    ctx.start_buffering();
    ctx.advance();
    ctx.skip_trivia_default();
    let followed_by_comma = ctx.current.kind == TokenKind::Comma;
    ctx.replay_buffered()?;
    Ok(followed_by_comma)
}

fn is_location_start(ctx: &ParseContext) -> bool {
    matches!(
        ctx.current.kind,
        TokenKind::String | TokenKind::Integer | TokenKind::HexadecimalInteger
    )
}
