//! The expression Pratt engine: null/left-denotation tables over
//! [`Expression`], keyed by [`TokenKind`].
//!
//! Two deviations from pure token-kind dispatch, both forced by the
//! language having no reserved-word lexical category (keywords lex as
//! plain `TokenKind::Identifier` tokens): the `Identifier` null
//! denotation dispatches internally on spelling (`true`, `false`, `nil`,
//! `create`, `destroy`, `fun`, `auth`, or a plain name), and the cast
//! keywords `as`/`as?`/`as!` are recognized as a left denotation by
//! inspecting an `Identifier` token's value rather than by a
//! `TokenKind`-keyed table entry, since `TokenKind::Identifier` is also
//! the null-denotation key for ordinary names. Both are resolved the
//! same way the type engine resolves `auth` (see [`super::types`]).

use std::collections::HashMap;

use num_bigint::BigInt;
use once_cell::sync::Lazy;

use crate::ast::{
    Argument, BinaryOp, CastKind, DictionaryEntry, Expression, Parameter, TransferKind, TypeAnnotation,
    UnaryOp,
};
use crate::context::ParseContext;
use crate::error::{ParseError, PResult, Signal};
use crate::gauge::MemoryKind;
use crate::token::{Token, TokenKind, TokenValue};

type NudFn = fn(&mut ParseContext, Token) -> PResult<Expression>;
type LedFn = fn(&mut ParseContext, Expression, Token) -> PResult<Expression>;

const BP_NONE: u8 = 0;
const BP_CONDITIONAL: u8 = 2;
const BP_NIL_COALESCE: u8 = 3;
const BP_OR: u8 = 4;
const BP_AND: u8 = 5;
const BP_EQUALITY: u8 = 6;
const BP_COMPARISON: u8 = 7;
const BP_CAST: u8 = 8;
const BP_BITWISE_OR: u8 = 9;
const BP_BITWISE_XOR: u8 = 10;
const BP_ADDITIVE: u8 = 11;
const BP_BITWISE_AND: u8 = 12;
const BP_MULTIPLICATIVE: u8 = 13;
const BP_POSTFIX: u8 = 14;

static NUD: Lazy<HashMap<TokenKind, NudFn>> = Lazy::new(|| {
    let mut m: HashMap<TokenKind, NudFn> = HashMap::new();
    m.insert(TokenKind::Identifier, nud_identifier);
    m.insert(TokenKind::Integer, nud_integer);
    m.insert(TokenKind::HexadecimalInteger, nud_integer);
    m.insert(TokenKind::FixedPoint, nud_fixed_point);
    m.insert(TokenKind::String, nud_string);
    m.insert(TokenKind::LeftParen, nud_paren);
    m.insert(TokenKind::LeftBracket, nud_array);
    m.insert(TokenKind::LeftBrace, nud_dictionary);
    m.insert(TokenKind::Slash, nud_path);
    m.insert(TokenKind::Minus, nud_unary_minus);
    m.insert(TokenKind::Bang, nud_unary_not);
    m.insert(TokenKind::Arrow, nud_unary_move);
    m.insert(TokenKind::Amp, nud_reference);
    m
});

static LED: Lazy<HashMap<TokenKind, LedFn>> = Lazy::new(|| {
    let mut m: HashMap<TokenKind, LedFn> = HashMap::new();
    m.insert(TokenKind::DoubleQuestion, led_nil_coalesce);
    m.insert(TokenKind::PipePipe, led_or);
    m.insert(TokenKind::AmpAmp, led_and);
    m.insert(TokenKind::EqualEqual, led_binary(BinaryOp::Equal));
    m.insert(TokenKind::NotEqual, led_binary(BinaryOp::NotEqual));
    m.insert(TokenKind::Less, led_less);
    m.insert(TokenKind::LessEqual, led_binary(BinaryOp::LessEqual));
    m.insert(TokenKind::Greater, led_binary(BinaryOp::Greater));
    m.insert(TokenKind::GreaterEqual, led_binary(BinaryOp::GreaterEqual));
    m.insert(TokenKind::Pipe, led_binary(BinaryOp::BitwiseOr));
    m.insert(TokenKind::Caret, led_binary(BinaryOp::BitwiseXor));
    m.insert(TokenKind::Plus, led_binary(BinaryOp::Add));
    m.insert(TokenKind::Minus, led_binary(BinaryOp::Subtract));
    m.insert(TokenKind::Amp, led_binary(BinaryOp::BitwiseAnd));
    m.insert(TokenKind::Star, led_binary(BinaryOp::Multiply));
    m.insert(TokenKind::Slash, led_binary(BinaryOp::Divide));
    m.insert(TokenKind::Percent, led_binary(BinaryOp::Remainder));
    m.insert(TokenKind::Question, led_question);
    m.insert(TokenKind::Dot, led_member);
    m.insert(TokenKind::LeftParen, led_invocation);
    m.insert(TokenKind::LeftBracket, led_index);
    m.insert(TokenKind::Bang, led_force);
    m
});

static LBP: Lazy<HashMap<TokenKind, u8>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(TokenKind::DoubleQuestion, BP_NIL_COALESCE);
    m.insert(TokenKind::PipePipe, BP_OR);
    m.insert(TokenKind::AmpAmp, BP_AND);
    m.insert(TokenKind::EqualEqual, BP_EQUALITY);
    m.insert(TokenKind::NotEqual, BP_EQUALITY);
    m.insert(TokenKind::Less, BP_COMPARISON);
    m.insert(TokenKind::LessEqual, BP_COMPARISON);
    m.insert(TokenKind::Greater, BP_COMPARISON);
    m.insert(TokenKind::GreaterEqual, BP_COMPARISON);
    m.insert(TokenKind::Pipe, BP_BITWISE_OR);
    m.insert(TokenKind::Caret, BP_BITWISE_XOR);
    m.insert(TokenKind::Plus, BP_ADDITIVE);
    m.insert(TokenKind::Minus, BP_ADDITIVE);
    m.insert(TokenKind::Amp, BP_BITWISE_AND);
    m.insert(TokenKind::Star, BP_MULTIPLICATIVE);
    m.insert(TokenKind::Slash, BP_MULTIPLICATIVE);
    m.insert(TokenKind::Percent, BP_MULTIPLICATIVE);
    m.insert(TokenKind::Question, BP_CONDITIONAL);
    m.insert(TokenKind::Dot, BP_POSTFIX);
    m.insert(TokenKind::LeftParen, BP_POSTFIX);
    m.insert(TokenKind::LeftBracket, BP_POSTFIX);
    m.insert(TokenKind::Bang, BP_POSTFIX);
    m
});

/// `true` for the three cast-keyword spellings, which share
/// `TokenKind::Identifier` with every plain name.
fn cast_kind_of(name: &str) -> Option<CastKind> {
    match name {
        "as" => Some(CastKind::Simple),
        "as?" => Some(CastKind::Optional),
        "as!" => Some(CastKind::Forced),
        _ => None,
    }
}

fn left_binding_power(token: &Token) -> u8 {
    if token.kind == TokenKind::Identifier {
        return match token.value.as_identifier().and_then(cast_kind_of) {
            Some(_) => BP_CAST,
            None => BP_NONE,
        };
    }
    *LBP.get(&token.kind).unwrap_or(&BP_NONE)
}

fn left_denotation(token: &Token) -> Option<LedFn> {
    if token.kind == TokenKind::Identifier {
        return match token.value.as_identifier().and_then(cast_kind_of) {
            Some(_) => Some(led_cast),
            None => None,
        };
    }
    LED.get(&token.kind).copied()
}

/// The expression-side Pratt driver (§4.3): read one null denotation,
/// then repeatedly extend it through left denotations whose binding
/// power exceeds `right_bp`.
pub fn parse_expression(ctx: &mut ParseContext, right_bp: u8) -> PResult<Expression> {
    ctx.skip_trivia_default();
    let token = ctx.current.clone();
    ctx.advance();
    let nud = NUD.get(&token.kind).copied().ok_or_else(|| {
        Signal::Error(ParseError::new(
            format!("expected an expression, found {:?}", token.kind),
            token.range,
        ))
    })?;
    let mut left = nud(ctx, token)?;

    loop {
        ctx.skip_trivia_default();
        let op = ctx.current.clone();
        let bp = left_binding_power(&op);
        if bp <= right_bp {
            return Ok(left);
        }
        ctx.advance();
        let led = left_denotation(&op)
            .expect("left_binding_power present without a left_denotation");
        left = led(ctx, left, op)?;
    }
}

fn led_binary(op: BinaryOp) -> LedFn {
    match op {
        BinaryOp::Equal => |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Equal, BP_EQUALITY),
        BinaryOp::NotEqual => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::NotEqual, BP_EQUALITY)
        }
        BinaryOp::LessEqual => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::LessEqual, BP_COMPARISON)
        }
        BinaryOp::Greater => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Greater, BP_COMPARISON)
        }
        BinaryOp::GreaterEqual => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::GreaterEqual, BP_COMPARISON)
        }
        BinaryOp::BitwiseOr => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::BitwiseOr, BP_BITWISE_OR)
        }
        BinaryOp::BitwiseXor => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::BitwiseXor, BP_BITWISE_XOR)
        }
        BinaryOp::Add => |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Add, BP_ADDITIVE),
        BinaryOp::Subtract => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Subtract, BP_ADDITIVE)
        }
        BinaryOp::BitwiseAnd => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::BitwiseAnd, BP_BITWISE_AND)
        }
        BinaryOp::Multiply => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Multiply, BP_MULTIPLICATIVE)
        }
        BinaryOp::Divide => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Divide, BP_MULTIPLICATIVE)
        }
        BinaryOp::Remainder => {
            |ctx, left, token| build_binary(ctx, left, token, BinaryOp::Remainder, BP_MULTIPLICATIVE)
        }
        BinaryOp::NilCoalesce | BinaryOp::Or | BinaryOp::And | BinaryOp::Less => {
            unreachable!("handled by a dedicated led_* function")
        }
    }
}

fn build_binary(
    ctx: &mut ParseContext,
    left: Expression,
    _token: Token,
    op: BinaryOp,
    bp: u8,
) -> PResult<Expression> {
    let right = parse_expression(ctx, bp)?;
    let range = left.range().join(&right.range());
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        range,
    })
}

/// Right-associative: recurse at `BP_NIL_COALESCE - 1` so a chain
/// `a ?? b ?? c` parses as `a ?? (b ?? c)`.
fn led_nil_coalesce(ctx: &mut ParseContext, left: Expression, _token: Token) -> PResult<Expression> {
    let right = parse_expression(ctx, BP_NIL_COALESCE - 1)?;
    let range = left.range().join(&right.range());
    Ok(Expression::Binary {
        op: BinaryOp::NilCoalesce,
        left: Box::new(left),
        right: Box::new(right),
        range,
    })
}

fn led_or(ctx: &mut ParseContext, left: Expression, _token: Token) -> PResult<Expression> {
    let right = parse_expression(ctx, BP_OR)?;
    let range = left.range().join(&right.range());
    Ok(Expression::Binary {
        op: BinaryOp::Or,
        left: Box::new(left),
        right: Box::new(right),
        range,
    })
}

fn led_and(ctx: &mut ParseContext, left: Expression, _token: Token) -> PResult<Expression> {
    let right = parse_expression(ctx, BP_AND)?;
    let range = left.range().join(&right.range());
    Ok(Expression::Binary {
        op: BinaryOp::And,
        left: Box::new(left),
        right: Box::new(right),
        range,
    })
}

/// §4.4's `<` ambiguity: buffer an attempt to read a full type-argument
/// list immediately followed by `(`; on success this is a generic
/// invocation, otherwise replay and treat `<` as relational less-than.
fn led_less(ctx: &mut ParseContext, left: Expression, token: Token) -> PResult<Expression> {
    ctx.start_buffering();
    match try_parse_generic_invocation(ctx, left.clone(), &token) {
        Ok(invocation) => {
            ctx.accept_buffered();
            Ok(invocation)
        }
        Err(Signal::Fatal(fatal)) => Err(Signal::Fatal(fatal)),
        Err(_) => {
            ctx.replay_buffered()?;
            build_binary(ctx, left, token, BinaryOp::Less, BP_COMPARISON)
        }
    }
}

fn try_parse_generic_invocation(
    ctx: &mut ParseContext,
    callee: Expression,
    _less: &Token,
) -> PResult<Expression> {
    let mut type_arguments = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::Greater {
        loop {
            type_arguments.push(super::types::parse_type(ctx, 0)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    ctx.expect(TokenKind::Greater)?;
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::LeftParen {
        return Err(Signal::Error(ParseError::new(
            "generic type-argument list must be followed by '(' to form an invocation",
            ctx.current_range(),
        )));
    }
    let arguments = super::helpers::parse_arguments(ctx)?;
    let end = arguments
        .last()
        .map(|a| a.range)
        .unwrap_or_else(|| ctx.current_range());
    let range = callee.range().join(&end);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Invocation {
        callee: Box::new(callee),
        type_arguments,
        arguments,
        range,
    })
}

/// `?` is shared between optional chaining (`?.`) and the ternary
/// conditional (`? then : else`), disambiguated by whether `.` follows
/// immediately.
fn led_question(ctx: &mut ParseContext, left: Expression, token: Token) -> PResult<Expression> {
    if ctx.current.kind == TokenKind::Dot {
        ctx.advance();
        ctx.skip_trivia_default();
        let name_token = ctx.expect(TokenKind::Identifier)?;
        let name = name_token
            .value
            .as_identifier()
            .expect("Identifier token always carries an identifier value")
            .to_string();
        let range = left.range().join(&name_token.range);
        ctx.meter(MemoryKind::Expression, 1)?;
        return Ok(Expression::Member {
            receiver: Box::new(left),
            name,
            optional: true,
            range,
        });
    }

    let then_branch = parse_expression(ctx, BP_CONDITIONAL)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    let else_branch = parse_expression(ctx, BP_CONDITIONAL - 1)?;
    let range = left.range().join(&else_branch.range());
    let _ = token;
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Conditional {
        test: Box::new(left),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
        range,
    })
}

fn led_member(ctx: &mut ParseContext, left: Expression, _token: Token) -> PResult<Expression> {
    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();
    let range = left.range().join(&name_token.range);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Member {
        receiver: Box::new(left),
        name,
        optional: false,
        range,
    })
}

fn led_invocation(ctx: &mut ParseContext, left: Expression, _start: Token) -> PResult<Expression> {
    let arguments = super::helpers::parse_arguments(ctx)?;
    let end = arguments
        .last()
        .map(|a| a.range)
        .unwrap_or_else(|| ctx.current_range());
    let range = left.range().join(&end);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Invocation {
        callee: Box::new(left),
        type_arguments: Vec::new(),
        arguments,
        range,
    })
}

fn led_index(ctx: &mut ParseContext, left: Expression, _start: Token) -> PResult<Expression> {
    let index = parse_expression(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBracket)?;
    let range = left.range().join(&end.range);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Index {
        target: Box::new(left),
        index: Box::new(index),
        range,
    })
}

fn led_force(_ctx: &mut ParseContext, left: Expression, token: Token) -> PResult<Expression> {
    let range = left.range().join(&token.range);
    Ok(Expression::Force {
        expression: Box::new(left),
        range,
    })
}

fn led_cast(ctx: &mut ParseContext, left: Expression, token: Token) -> PResult<Expression> {
    let kind = token
        .value
        .as_identifier()
        .and_then(cast_kind_of)
        .expect("led_cast only dispatched for cast-keyword spellings");
    let ty = super::types::parse_type_annotation(ctx)?;
    let range = left.range().join(&ty.range);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Cast {
        expression: Box::new(left),
        kind,
        ty: Box::new(ty),
        range,
        parent_declaration: std::cell::Cell::new(None),
    })
}

fn nud_identifier(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let name = token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    match name.as_str() {
        "true" => return Ok(Expression::Bool { value: true, range: token.range }),
        "false" => return Ok(Expression::Bool { value: false, range: token.range }),
        "nil" => return Ok(Expression::Nil { range: token.range }),
        "auth" if ctx.current.kind == TokenKind::Amp => {
            ctx.advance();
            let expression = parse_expression(ctx, BP_MULTIPLICATIVE)?;
            let range = token.range.join(&expression.range());
            ctx.meter(MemoryKind::Expression, 1)?;
            return Ok(Expression::Reference {
                auth: true,
                expression: Box::new(expression),
                range,
            });
        }
        "create" => {
            let invocation = parse_expression(ctx, BP_MULTIPLICATIVE)?;
            let range = token.range.join(&invocation.range());
            ctx.meter(MemoryKind::Expression, 1)?;
            return Ok(Expression::Create {
                invocation: Box::new(invocation),
                range,
            });
        }
        "destroy" => {
            let expression = parse_expression(ctx, BP_MULTIPLICATIVE)?;
            let range = token.range.join(&expression.range());
            ctx.meter(MemoryKind::Expression, 1)?;
            return Ok(Expression::Destroy {
                expression: Box::new(expression),
                range,
            });
        }
        "fun" => return nud_function_literal(ctx, token),
        _ => {}
    }

    ctx.meter(MemoryKind::Identifier, 1)?;
    Ok(Expression::Identifier {
        name,
        range: token.range,
    })
}

fn nud_function_literal(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let parameters: Vec<Parameter> = super::helpers::parse_parameters(ctx)?;
    ctx.skip_trivia_default();
    let return_type = if ctx.current.kind == TokenKind::Colon {
        ctx.advance();
        super::types::parse_type_annotation(ctx)?
    } else {
        TypeAnnotation::empty_at(ctx.current_range())
    };
    let block = super::helpers::parse_block(ctx)?;
    let range = token.range.join(&block.range);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Function {
        parameters,
        return_type: Box::new(return_type),
        body: block.statements,
        range,
    })
}

fn nud_integer(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let (text, value, base) = match token.value {
        TokenValue::Integer(lit) => (lit.text, lit.value, lit.base),
        _ => (String::new(), BigInt::from(0), crate::token::IntegerBase::Decimal),
    };
    ctx.meter(MemoryKind::BigInt, 1)?;
    Ok(Expression::Integer {
        text,
        value,
        base,
        range: token.range,
    })
}

fn nud_fixed_point(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let value = match token.value {
        TokenValue::FixedPoint(lit) => lit,
        _ => unreachable!("FixedPoint token always carries a FixedPoint value"),
    };
    ctx.meter(MemoryKind::BigInt, 1)?;
    Ok(Expression::FixedPoint {
        value,
        range: token.range,
    })
}

fn nud_string(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let value = token.value.as_string().unwrap_or_default().to_string();
    ctx.meter(MemoryKind::RawString, 1)?;
    Ok(Expression::String {
        value,
        range: token.range,
    })
}

fn nud_paren(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    ctx.skip_trivia_default();
    let inner = parse_expression(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightParen)?;
    let _ = token.range.join(&end.range);
    Ok(inner)
}

fn nud_array(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let mut elements = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::RightBracket {
        loop {
            elements.push(parse_expression(ctx, BP_NONE)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    let end = ctx.expect(TokenKind::RightBracket)?;
    let range = token.range.join(&end.range);
    ctx.meter(MemoryKind::Array, 1)?;
    Ok(Expression::Array { elements, range })
}

fn nud_dictionary(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let mut entries = Vec::new();
    ctx.skip_trivia_default();
    if ctx.current.kind != TokenKind::RightBrace {
        loop {
            entries.push(parse_dictionary_entry(ctx)?);
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
    let range = token.range.join(&end.range);
    ctx.meter(MemoryKind::Dictionary, 1)?;
    Ok(Expression::Dictionary { entries, range })
}

fn parse_dictionary_entry(ctx: &mut ParseContext) -> PResult<DictionaryEntry> {
    let key = parse_expression(ctx, BP_NONE)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    let value = parse_expression(ctx, BP_NONE)?;
    let range = key.range().join(&value.range());
    ctx.meter(MemoryKind::DictionaryEntry, 1)?;
    Ok(DictionaryEntry { key, value, range })
}

fn nud_path(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    ctx.skip_trivia_default();
    let domain_token = ctx.expect(TokenKind::Identifier)?;
    let domain = domain_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();
    ctx.expect(TokenKind::Slash)?;
    let identifier_token = ctx.expect(TokenKind::Identifier)?;
    let identifier = identifier_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();
    let range = token.range.join(&identifier_token.range);
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Path {
        domain,
        identifier,
        range,
    })
}

fn nud_unary_minus(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    build_unary(ctx, token, UnaryOp::Negate)
}

fn nud_unary_not(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    build_unary(ctx, token, UnaryOp::Not)
}

fn nud_unary_move(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    build_unary(ctx, token, UnaryOp::Move)
}

fn build_unary(ctx: &mut ParseContext, token: Token, op: UnaryOp) -> PResult<Expression> {
    let operand = parse_expression(ctx, BP_MULTIPLICATIVE)?;
    let range = token.range.join(&operand.range());
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Unary {
        op,
        operand: Box::new(operand),
        range,
    })
}

fn nud_reference(ctx: &mut ParseContext, token: Token) -> PResult<Expression> {
    let expression = parse_expression(ctx, BP_MULTIPLICATIVE)?;
    let range = token.range.join(&expression.range());
    ctx.meter(MemoryKind::Expression, 1)?;
    Ok(Expression::Reference {
        auth: false,
        expression: Box::new(expression),
        range,
    })
}

/// Transfer-operator parsing (`=`, `<-`, `<-!`) shared with variable
/// declarations and assignment statements.
pub fn parse_transfer(ctx: &mut ParseContext) -> PResult<TransferKind> {
    ctx.skip_trivia_default();
    match ctx.current.kind {
        TokenKind::Equal => {
            ctx.advance();
            Ok(TransferKind::Copy)
        }
        TokenKind::Arrow => {
            ctx.advance();
            Ok(TransferKind::Move)
        }
        TokenKind::ForceArrow => {
            ctx.advance();
            Ok(TransferKind::ForcedMove)
        }
        _ => Err(Signal::Error(ParseError::new(
            "expected '=', '<-', or '<-!'",
            ctx.current_range(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::NoopGauge;
    use crate::stream::lex;

    fn parse(input: &str) -> Expression {
        let mut ctx = ParseContext::new(lex(input), NoopGauge);
        parse_expression(&mut ctx, BP_NONE).expect("expression should parse")
    }

    #[test]
    fn integer_literal_keeps_original_text_and_value() {
        match parse("0x2A") {
            Expression::Integer { text, value, .. } => {
                assert_eq!(text, "0x2A");
                assert_eq!(value, BigInt::from(42));
            }
            other => panic!("expected integer literal, got {other:?}"),
        }
    }

    #[test]
    fn string_literal_decodes_escapes() {
        match parse("\"a\\nb\"") {
            Expression::String { value, .. } => assert_eq!(value, "a\nb"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_respects_precedence() {
        match parse("1 + 2 * 3") {
            Expression::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => match *right {
                Expression::Binary {
                    op: BinaryOp::Multiply,
                    ..
                } => {}
                other => panic!("expected nested multiply, got {other:?}"),
            },
            other => panic!("expected addition at the top, got {other:?}"),
        }
    }

    #[test]
    fn comparison_less_than_without_following_paren_stays_relational() {
        match parse("a < b") {
            Expression::Binary { op: BinaryOp::Less, .. } => {}
            other => panic!("expected relational less-than, got {other:?}"),
        }
    }

    #[test]
    fn less_than_followed_by_type_args_and_call_is_generic_invocation() {
        match parse("foo<Int>(1)") {
            Expression::Invocation {
                type_arguments,
                arguments,
                ..
            } => {
                assert_eq!(type_arguments.len(), 1);
                assert_eq!(arguments.len(), 1);
            }
            other => panic!("expected generic invocation, got {other:?}"),
        }
    }

    #[test]
    fn plain_invocation_has_no_type_arguments() {
        match parse("foo(1, bar: 2)") {
            Expression::Invocation {
                type_arguments,
                arguments,
                ..
            } => {
                assert!(type_arguments.is_empty());
                assert_eq!(arguments.len(), 2);
                assert_eq!(arguments[1].label.as_deref(), Some("bar"));
            }
            other => panic!("expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn optional_chaining_member_access() {
        match parse("a?.b") {
            Expression::Member { optional, name, .. } => {
                assert!(optional);
                assert_eq!(name, "b");
            }
            other => panic!("expected optional member access, got {other:?}"),
        }
    }

    #[test]
    fn ternary_conditional_without_dot_after_question() {
        match parse("a ? b : c") {
            Expression::Conditional { .. } => {}
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn cast_keywords_switch_into_the_type_engine() {
        match parse("x as? Int") {
            Expression::Cast { kind: CastKind::Optional, .. } => {}
            other => panic!("expected optional cast, got {other:?}"),
        }
    }

    #[test]
    fn cast_binds_looser_than_multiplicative_and_additive() {
        // `1 * 2 as Int` must parse as `(1 * 2) as Int`, not `1 * (2 as Int)`.
        match parse("1 * 2 as Int") {
            Expression::Cast { expression, kind: CastKind::Simple, .. } => match *expression {
                Expression::Binary { op: BinaryOp::Multiply, .. } => {}
                other => panic!("expected multiply under the cast, got {other:?}"),
            },
            other => panic!("expected a cast at the top, got {other:?}"),
        }

        // `1 + 2 as Int` must parse as `(1 + 2) as Int`.
        match parse("1 + 2 as Int") {
            Expression::Cast { expression, kind: CastKind::Simple, .. } => match *expression {
                Expression::Binary { op: BinaryOp::Add, .. } => {}
                other => panic!("expected addition under the cast, got {other:?}"),
            },
            other => panic!("expected a cast at the top, got {other:?}"),
        }
    }

    #[test]
    fn create_wraps_an_invocation() {
        match parse("create Vault(balance: 0)") {
            Expression::Create { invocation, .. } => match *invocation {
                Expression::Invocation { .. } => {}
                other => panic!("expected invocation inside create, got {other:?}"),
            },
            other => panic!("expected create expression, got {other:?}"),
        }
    }

    #[test]
    fn destroy_wraps_an_expression() {
        match parse("destroy vault") {
            Expression::Destroy { .. } => {}
            other => panic!("expected destroy expression, got {other:?}"),
        }
    }

    #[test]
    fn reference_without_auth() {
        match parse("&account") {
            Expression::Reference { auth, .. } => assert!(!auth),
            other => panic!("expected reference expression, got {other:?}"),
        }
    }

    #[test]
    fn auth_reference() {
        match parse("auth &account") {
            Expression::Reference { auth, .. } => assert!(auth),
            other => panic!("expected authorized reference expression, got {other:?}"),
        }
    }

    #[test]
    fn force_unwraps_an_optional_postfix() {
        match parse("maybeValue!") {
            Expression::Force { .. } => {}
            other => panic!("expected force expression, got {other:?}"),
        }
    }

    #[test]
    fn path_expression_has_domain_and_identifier() {
        match parse("/storage/vault") {
            Expression::Path { domain, identifier, .. } => {
                assert_eq!(domain, "storage");
                assert_eq!(identifier, "vault");
            }
            other => panic!("expected path expression, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_function_literal_parses_body() {
        match parse("fun (x: Int): Int { return x }") {
            Expression::Function { parameters, body, .. } => {
                assert_eq!(parameters.len(), 1);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected function literal, got {other:?}"),
        }
    }

    #[test]
    fn dictionary_literal_parses_entries() {
        match parse("{\"a\": 1, \"b\": 2}") {
            Expression::Dictionary { entries, .. } => assert_eq!(entries.len(), 2),
            other => panic!("expected dictionary literal, got {other:?}"),
        }
    }

    #[test]
    fn nil_coalesce_is_right_associative() {
        match parse("a ?? b ?? c") {
            Expression::Binary {
                op: BinaryOp::NilCoalesce,
                right,
                ..
            } => match *right {
                Expression::Binary {
                    op: BinaryOp::NilCoalesce,
                    ..
                } => {}
                other => panic!("expected right-nested nil-coalesce, got {other:?}"),
            },
            other => panic!("expected nil-coalesce, got {other:?}"),
        }
    }
}
