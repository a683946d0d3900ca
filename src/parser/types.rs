//! The type Pratt engine: null/left-denotation tables over [`Type`],
//! keyed by [`TokenKind`], plus the `{` ambiguity resolution between a
//! dictionary type and a bare restriction list.
//!
//! Static, `once_cell`-backed tables, matching the lexer/parser split's
//! commitment: "built once (static/global or lazily-initialized), keyed
//! by token kind, free of per-parse allocation." One deviation, recorded
//! in `DESIGN.md`: the language has no reserved-word lexical category
//! (keywords are plain `TokenKind::Identifier` tokens distinguished only
//! by spelling), so the `auth` prefix keyword cannot be a
//! `TokenKind`-keyed table entry on its own; it is special-cased inside
//! the `Identifier` null denotation by inspecting `token.value`.

use std::collections::HashMap;

use num_bigint::BigInt;
use once_cell::sync::Lazy;

use crate::ast::{Type, TypeAnnotation};
use crate::context::ParseContext;
use crate::error::{ParseError, PResult, Signal};
use crate::token::{Token, TokenKind, TokenValue};

type NudFn = fn(&mut ParseContext, Token) -> PResult<Type>;
type LedFn = fn(&mut ParseContext, Type, Token) -> PResult<Type>;

const BP_NONE: u8 = 0;
/// `?`, `<...>`, and `{...}` all sit at the same postfix tier: the type
/// grammar has no binary infix operators to rank them against.
const BP_POSTFIX: u8 = 10;

static NUD: Lazy<HashMap<TokenKind, NudFn>> = Lazy::new(|| {
    let mut m: HashMap<TokenKind, NudFn> = HashMap::new();
    m.insert(TokenKind::Identifier, nud_identifier);
    m.insert(TokenKind::Amp, nud_reference);
    m.insert(TokenKind::LeftBracket, nud_array);
    m.insert(TokenKind::LeftBrace, nud_brace);
    m.insert(TokenKind::LeftParen, nud_paren);
    m
});

static LED: Lazy<HashMap<TokenKind, LedFn>> = Lazy::new(|| {
    let mut m: HashMap<TokenKind, LedFn> = HashMap::new();
    m.insert(TokenKind::Question, led_optional);
    m.insert(TokenKind::Less, led_instantiation);
    m.insert(TokenKind::LeftBrace, led_restriction);
    m
});

static LBP: Lazy<HashMap<TokenKind, u8>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(TokenKind::Question, BP_POSTFIX);
    m.insert(TokenKind::Less, BP_POSTFIX);
    m.insert(TokenKind::LeftBrace, BP_POSTFIX);
    m
});

/// Parses a type annotation: an optional leading `@` resource marker
/// (legal only here, never mid-expression) plus the underlying type.
pub fn parse_type_annotation(ctx: &mut ParseContext) -> PResult<TypeAnnotation> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();
    let is_resource = if ctx.current.kind == TokenKind::At {
        ctx.advance();
        true
    } else {
        false
    };
    let ty = parse_type(ctx, BP_NONE)?;
    let range = start.join(&ty.range());
    ctx.meter(crate::gauge::MemoryKind::TypeAnnotation, 1)?;
    Ok(TypeAnnotation::new(is_resource, ty, range))
}

/// The type-side Pratt driver: read one null denotation, then repeatedly
/// extend it through left denotations whose binding power exceeds
/// `right_bp`.
pub fn parse_type(ctx: &mut ParseContext, right_bp: u8) -> PResult<Type> {
    ctx.skip_trivia_default();
    let token = ctx.current.clone();
    ctx.advance();
    let nud = NUD.get(&token.kind).copied().ok_or_else(|| {
        Signal::Error(ParseError::new(
            format!("expected a type, found {:?}", token.kind),
            token.range,
        ))
    })?;
    let mut left = nud(ctx, token)?;

    loop {
        ctx.skip_trivia_default();
        let op = ctx.current.clone();
        let bp = *LBP.get(&op.kind).unwrap_or(&BP_NONE);
        if bp <= right_bp {
            return Ok(left);
        }
        ctx.advance();
        let led = LED
            .get(&op.kind)
            .copied()
            .expect("left_binding_power present without a left_denotation");
        left = led(ctx, left, op)?;
    }
}

fn nud_identifier(ctx: &mut ParseContext, token: Token) -> PResult<Type> {
    let name = token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    if name == "auth" && ctx.current.kind == TokenKind::Amp {
        ctx.advance();
        let inner = parse_type(ctx, BP_POSTFIX)?;
        let range = token.range.join(&inner.range());
        return Ok(Type::Reference {
            auth: true,
            inner: Box::new(inner),
            range,
        });
    }

    let mut identifiers = vec![name];
    let mut end = token.range;
    while ctx.current.kind == TokenKind::Dot {
        ctx.advance();
        let part = ctx.expect(TokenKind::Identifier)?;
        identifiers.push(
            part.value
                .as_identifier()
                .expect("Identifier token always carries an identifier value")
                .to_string(),
        );
        end = part.range;
    }
    let range = token.range.join(&end);
    Ok(Type::Nominal { identifiers, range })
}

fn nud_reference(ctx: &mut ParseContext, token: Token) -> PResult<Type> {
    let inner = parse_type(ctx, BP_POSTFIX)?;
    let range = token.range.join(&inner.range());
    Ok(Type::Reference {
        auth: false,
        inner: Box::new(inner),
        range,
    })
}

fn nud_array(ctx: &mut ParseContext, token: Token) -> PResult<Type> {
    let element = parse_type(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    if ctx.current.kind == TokenKind::Semicolon {
        ctx.advance();
        ctx.skip_trivia_default();
        let size_token = ctx.expect(TokenKind::Integer)?;
        let size = match size_token.value {
            TokenValue::Integer(lit) => lit.value,
            _ => BigInt::from(0),
        };
        ctx.skip_trivia_default();
        let end = ctx.expect(TokenKind::RightBracket)?;
        let range = token.range.join(&end.range);
        return Ok(Type::ConstantSized {
            element: Box::new(element),
            size,
            range,
        });
    }
    let end = ctx.expect(TokenKind::RightBracket)?;
    let range = token.range.join(&end.range);
    Ok(Type::VariableSized {
        element: Box::new(element),
        range,
    })
}

/// On seeing a bare `{`, buffer an attempt at `{K: V}`; a `:` following
/// the first type accepts it as a dictionary, anything else replays and
/// falls back to a restriction list.
fn nud_brace(ctx: &mut ParseContext, token: Token) -> PResult<Type> {
    ctx.start_buffering();
    match try_parse_dictionary(ctx, token.clone()) {
        Ok(dict) => {
            ctx.accept_buffered();
            Ok(dict)
        }
        Err(Signal::Fatal(fatal)) => Err(Signal::Fatal(fatal)),
        Err(_) => {
            ctx.replay_buffered()?;
            parse_restriction_list(ctx, token, None)
        }
    }
}

fn try_parse_dictionary(ctx: &mut ParseContext, start: Token) -> PResult<Type> {
    ctx.skip_trivia_default();
    let key = parse_type(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    let value = parse_type(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.range.join(&end.range);
    Ok(Type::Dictionary {
        key: Box::new(key),
        value: Box::new(value),
        range,
    })
}

fn parse_restriction_list(
    ctx: &mut ParseContext,
    start: Token,
    restricted: Option<Box<Type>>,
) -> PResult<Type> {
    let mut restrictions = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::RightBrace {
        loop {
            restrictions.push(parse_type(ctx, BP_NONE)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.range.join(&end.range);
    Ok(Type::Restricted {
        restricted,
        restrictions,
        range,
    })
}

fn led_optional(_ctx: &mut ParseContext, left: Type, token: Token) -> PResult<Type> {
    let range = left.range().join(&token.range);
    Ok(Type::Optional {
        inner: Box::new(left),
        range,
    })
}

fn led_instantiation(ctx: &mut ParseContext, left: Type, _start: Token) -> PResult<Type> {
    let mut type_arguments = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::Greater {
        loop {
            type_arguments.push(parse_type(ctx, BP_NONE)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    let end = ctx.expect(TokenKind::Greater)?;
    let range = left.range().join(&end.range);
    Ok(Type::Instantiation {
        base: Box::new(left),
        type_arguments,
        range,
    })
}

fn led_restriction(ctx: &mut ParseContext, left: Type, start: Token) -> PResult<Type> {
    parse_restriction_list(ctx, start, Some(Box::new(left)))
}

/// Function types and parenthesized grouping share `(` as their leading
/// token. This crate spells a function type `((A, B): C)` — an outer
/// group whose sole content is an inner parenthesized, comma-separated
/// parameter-type list followed by `:` and a return type annotation —
/// and treats a bare `(T)` as a transparent grouping around a single
/// type (see `DESIGN.md`).
fn nud_paren(ctx: &mut ParseContext, start: Token) -> PResult<Type> {
    ctx.skip_trivia_default();
    if ctx.current.kind == TokenKind::LeftParen {
        ctx.advance();
        let mut parameter_types = Vec::new();
        ctx.skip_trivia_default();
        if ctx.current.kind != TokenKind::RightParen {
            loop {
                parameter_types.push(parse_type_annotation(ctx)?);
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
        ctx.skip_trivia_default();
        ctx.expect(TokenKind::Colon)?;
        let return_type = parse_type_annotation(ctx)?;
        ctx.skip_trivia_default();
        let end = ctx.expect(TokenKind::RightParen)?;
        let range = start.range.join(&end.range);
        return Ok(Type::Function {
            parameter_types,
            return_type: Box::new(return_type),
            range,
        });
    }

    let inner = parse_type(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::RightParen)?;
    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::NoopGauge;
    use crate::stream::lex;

    fn parse(input: &str) -> Type {
        let mut ctx = ParseContext::new(lex(input), NoopGauge);
        parse_type(&mut ctx, BP_NONE).expect("type should parse")
    }

    #[test]
    fn nominal_type_collects_dotted_identifiers() {
        match parse("Foo.Bar.Baz") {
            Type::Nominal { identifiers, .. } => {
                assert_eq!(identifiers, vec!["Foo", "Bar", "Baz"]);
            }
            other => panic!("expected nominal type, got {other:?}"),
        }
    }

    #[test]
    fn variable_sized_array_type() {
        match parse("[Int]") {
            Type::VariableSized { element, .. } => match *element {
                Type::Nominal { identifiers, .. } => assert_eq!(identifiers, vec!["Int"]),
                other => panic!("unexpected element type {other:?}"),
            },
            other => panic!("expected variable-sized array, got {other:?}"),
        }
    }

    #[test]
    fn constant_sized_array_type_keeps_size() {
        match parse("[Int; 4]") {
            Type::ConstantSized { size, .. } => assert_eq!(size, BigInt::from(4)),
            other => panic!("expected constant-sized array, got {other:?}"),
        }
    }

    #[test]
    fn brace_with_colon_parses_as_dictionary() {
        match parse("{String: Int}") {
            Type::Dictionary { .. } => {}
            other => panic!("expected dictionary type, got {other:?}"),
        }
    }

    #[test]
    fn bare_brace_without_colon_parses_as_restriction_list() {
        match parse("{Foo, Bar}") {
            Type::Restricted {
                restricted,
                restrictions,
                ..
            } => {
                assert!(restricted.is_none());
                assert_eq!(restrictions.len(), 2);
            }
            other => panic!("expected restriction list, got {other:?}"),
        }
    }

    #[test]
    fn restriction_list_after_nominal_type() {
        match parse("Vault{Receiver}") {
            Type::Restricted {
                restricted,
                restrictions,
                ..
            } => {
                assert!(restricted.is_some());
                assert_eq!(restrictions.len(), 1);
            }
            other => panic!("expected restricted type, got {other:?}"),
        }
    }

    #[test]
    fn optional_type_wraps_inner() {
        match parse("Int?") {
            Type::Optional { .. } => {}
            other => panic!("expected optional type, got {other:?}"),
        }
    }

    #[test]
    fn reference_type_without_auth() {
        match parse("&Int") {
            Type::Reference { auth, .. } => assert!(!auth),
            other => panic!("expected reference type, got {other:?}"),
        }
    }

    #[test]
    fn auth_reference_type() {
        match parse("auth &Int") {
            Type::Reference { auth, .. } => assert!(auth),
            other => panic!("expected authorized reference type, got {other:?}"),
        }
    }

    #[test]
    fn plain_identifier_named_auth_without_ampersand_is_nominal() {
        match parse("auth") {
            Type::Nominal { identifiers, .. } => assert_eq!(identifiers, vec!["auth"]),
            other => panic!("expected nominal type, got {other:?}"),
        }
    }

    #[test]
    fn instantiation_type_collects_type_arguments() {
        match parse("Vec<Int, String>") {
            Type::Instantiation { type_arguments, .. } => assert_eq!(type_arguments.len(), 2),
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn nested_instantiation_handles_adjacent_greater_tokens() {
        match parse("Vec<Vec<Int>>") {
            Type::Instantiation { type_arguments, .. } => {
                assert_eq!(type_arguments.len(), 1);
                match &type_arguments[0] {
                    Type::Instantiation { .. } => {}
                    other => panic!("expected nested instantiation, got {other:?}"),
                }
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn resource_annotation_requires_at_sign() {
        let mut ctx = ParseContext::new(lex("@R"), NoopGauge);
        let annotation = parse_type_annotation(&mut ctx).expect("should parse");
        assert!(annotation.is_resource);
    }
}
