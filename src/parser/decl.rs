//! Top-level and composite-member declaration parsing (`spec.md` §4.5,
//! §4.6, §4.7).
//!
//! [`parse_declaration`] dispatches on the current identifier's spelling
//! per the table in `spec.md` §4.5; access modifiers (`priv`, `pub`,
//! `access(...)`) are consumed in a loop before the dispatch, erroring on
//! a second application or on a pragma/transaction, which may not carry
//! one at all.

use crate::ast::{
    Access, CompositeDeclaration, CompositeKind, Condition, Conditions, Declaration,
    EnumCaseDeclaration, FieldDeclaration, FunctionBlock, FunctionDeclaration, InterfaceDeclaration,
    PragmaDeclaration, SpecialFunctionDeclaration, SpecialFunctionKind, TransactionDeclaration,
};
use crate::context::{ParseContext, TriviaOptions};
use crate::error::{ParseError, PResult, Signal};
use crate::gauge::MemoryKind;
use crate::token::TokenKind;

/// Parses a full declaration list from the current position to `Eof`,
/// reporting and recovering from each declaration-level error rather than
/// aborting (`spec.md` §1, §7). Only a fatal error short-circuits.
pub fn parse_declarations(ctx: &mut ParseContext) -> PResult<Vec<Declaration>> {
    let mut declarations = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if ctx.current.kind == TokenKind::Eof {
            break;
        }
        match parse_declaration(ctx) {
            Ok(decl) => declarations.push(decl),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                super::helpers::recover_to_declaration_boundary(ctx);
            }
        }
    }
    Ok(declarations)
}

/// One top-level declaration (`spec.md` §4.5's dispatch table).
pub fn parse_declaration(ctx: &mut ParseContext) -> PResult<Declaration> {
    let (_, doc_string) = ctx.skip_trivia(TriviaOptions::skip_all().with_doc_strings());
    let (access, access_set) = parse_access_modifiers(ctx)?;

    if ctx.current.kind == TokenKind::Hash {
        if access_set {
            return Err(Signal::Error(ParseError::new(
                "invalid access modifier for pragma",
                ctx.current_range(),
            )));
        }
        return parse_pragma(ctx);
    }
    if ctx.at_keyword("let") || ctx.at_keyword("var") {
        let decl = super::stmt::parse_variable_declaration(ctx, access, doc_string)?;
        return Ok(Declaration::Variable(decl));
    }
    if ctx.at_keyword("fun") {
        let decl = parse_function_declaration(ctx, access, doc_string, true)?;
        return Ok(Declaration::Function(decl));
    }
    if ctx.at_keyword("import") {
        return super::import::parse_import(ctx);
    }
    if ctx.at_keyword("event") {
        return parse_event(ctx, access, doc_string);
    }
    if is_composite_kind_keyword(ctx) {
        return parse_composite_or_interface(ctx, access, doc_string);
    }
    if ctx.at_keyword("transaction") {
        if access_set {
            return Err(Signal::Error(ParseError::new(
                "invalid access modifier for transaction",
                ctx.current_range(),
            )));
        }
        return Ok(Declaration::Transaction(parse_transaction(ctx)?));
    }

    Err(Signal::Error(ParseError::new(
        format!("expected a declaration, found {:?}", ctx.current.kind),
        ctx.current_range(),
    )))
}

/// `priv | pub ('(' 'set' ')')? | access '(' ... ')'`, applied at most
/// once (`spec.md` §4.5: "Attempting to apply an access modifier twice
/// ... is a syntax error"). Returns whether a modifier was present at all
/// so callers can reject one on pragma/transaction.
fn parse_access_modifiers(ctx: &mut ParseContext) -> PResult<(Access, bool)> {
    let mut access = Access::NotSpecified;
    let mut access_set = false;
    loop {
        ctx.skip_trivia_default();
        if ctx.at_keyword("priv") || ctx.at_keyword("pub") || ctx.at_keyword("access") {
            if access_set {
                return Err(Signal::Error(ParseError::new(
                    "invalid second access modifier",
                    ctx.current_range(),
                )));
            }
            access = super::helpers::parse_access(ctx)?;
            access_set = true;
            continue;
        }
        break;
    }
    Ok((access, access_set))
}

fn is_composite_kind_keyword(ctx: &ParseContext) -> bool {
    ctx.at_keyword("struct") || ctx.at_keyword("resource") || ctx.at_keyword("contract") || ctx.at_keyword("enum")
}

fn parse_composite_kind(ctx: &mut ParseContext) -> PResult<CompositeKind> {
    if ctx.at_keyword("struct") {
        ctx.advance();
        Ok(CompositeKind::Struct)
    } else if ctx.at_keyword("resource") {
        ctx.advance();
        Ok(CompositeKind::Resource)
    } else if ctx.at_keyword("contract") {
        ctx.advance();
        Ok(CompositeKind::Contract)
    } else if ctx.at_keyword("enum") {
        ctx.advance();
        Ok(CompositeKind::Enum)
    } else {
        Err(Signal::Error(ParseError::new(
            "expected 'struct', 'resource', 'contract', or 'enum'",
            ctx.current_range(),
        )))
    }
}

fn parse_pragma(ctx: &mut ParseContext) -> PResult<Declaration> {
    let start = ctx.expect(TokenKind::Hash)?;
    let expression = super::expr::parse_expression(ctx, 0)?;
    let range = start.range.join(&expression.range());
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(Declaration::Pragma(PragmaDeclaration { expression, range }))
}

/// `fun name parameterList (':' typeAnn)? block?` (`spec.md` §4.7).
/// `body_required` is `false` only inside an interface member list, where
/// the block is optional.
pub fn parse_function_declaration(
    ctx: &mut ParseContext,
    access: Access,
    doc_string: Option<String>,
    body_required: bool,
) -> PResult<FunctionDeclaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "fun")?;
    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    let parameters = super::helpers::parse_parameters(ctx)?;
    ctx.skip_trivia_default();
    let return_type = if ctx.current.kind == TokenKind::Colon {
        ctx.advance();
        super::types::parse_type_annotation(ctx)?
    } else {
        crate::ast::TypeAnnotation::empty_at(ctx.current_range())
    };

    ctx.skip_trivia_default();
    let body = if ctx.current.kind == TokenKind::LeftBrace {
        Some(parse_function_block(ctx)?)
    } else if body_required {
        return Err(Signal::Error(ParseError::new(
            "expected a function body",
            ctx.current_range(),
        )));
    } else {
        None
    };

    let end = body.as_ref().map(|b| b.range).unwrap_or(return_type.range);
    let range = start.range.join(&end);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(FunctionDeclaration {
        access,
        name,
        parameters,
        return_type,
        body,
        doc_string,
        range,
    })
}

/// `'{' statement* ('pre' conditions)? ('post' conditions)? '}'`
/// (`spec.md` §4.7).
fn parse_function_block(ctx: &mut ParseContext) -> PResult<FunctionBlock> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();
    ctx.expect(TokenKind::LeftBrace)?;

    let mut statements = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if ctx.at_keyword("pre")
            || ctx.at_keyword("post")
            || matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof)
        {
            break;
        }
        match super::stmt::parse_statement(ctx) {
            Ok(stmt) => statements.push(stmt),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                super::helpers::recover_to_statement_boundary(ctx);
            }
        }
    }

    ctx.skip_trivia_default();
    let pre_conditions = if ctx.at_keyword("pre") {
        ctx.advance();
        Some(parse_conditions(ctx)?)
    } else {
        None
    };

    ctx.skip_trivia_default();
    let post_conditions = if ctx.at_keyword("post") {
        ctx.advance();
        Some(parse_conditions(ctx)?)
    } else {
        None
    };

    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.join(&end.range);
    ctx.meter(MemoryKind::Block, 1)?;
    Ok(FunctionBlock {
        statements,
        pre_conditions,
        post_conditions,
        range,
    })
}

/// `'{' (expression (':' expression)?)* '}'`; each condition is a boolean
/// test and an optional failure message (`spec.md` §3's `Condition`).
fn parse_conditions(ctx: &mut ParseContext) -> PResult<Conditions> {
    ctx.skip_trivia_default();
    let start = ctx.current_range();
    ctx.expect(TokenKind::LeftBrace)?;

    let mut conditions = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof) {
            break;
        }
        match parse_condition(ctx) {
            Ok(condition) => conditions.push(condition),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                super::helpers::recover_to_statement_boundary(ctx);
            }
        }
    }

    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.join(&end.range);
    ctx.meter(MemoryKind::Conditions, 1)?;
    Ok(Conditions { conditions, range })
}

fn parse_condition(ctx: &mut ParseContext) -> PResult<Condition> {
    let test = super::expr::parse_expression(ctx, 0)?;
    ctx.skip_trivia_default();
    let message = if ctx.current.kind == TokenKind::Colon {
        ctx.advance();
        Some(super::expr::parse_expression(ctx, 0)?)
    } else {
        None
    };
    let end = message.as_ref().map(|m| m.range()).unwrap_or_else(|| test.range());
    let range = test.range().join(&end);
    ctx.meter(MemoryKind::Condition, 1)?;
    Ok(Condition { test, message, range })
}

/// `struct|resource|contract|enum 'interface'? name (':' type (',' type)*)?
/// memberList` (`spec.md` §4.5). Per the Open Question resolution in
/// `spec.md` §9 and `SPEC_FULL.md` §9, an interface carrying a `:`
/// conformance list is rejected rather than silently parsed.
fn parse_composite_or_interface(
    ctx: &mut ParseContext,
    access: Access,
    doc_string: Option<String>,
) -> PResult<Declaration> {
    let start = ctx.current_range();
    let kind = parse_composite_kind(ctx)?;

    ctx.skip_trivia_default();
    let is_interface = ctx.at_keyword("interface");
    if is_interface {
        ctx.advance();
    }

    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    ctx.skip_trivia_default();
    if is_interface {
        if ctx.current.kind == TokenKind::Colon {
            return Err(Signal::Error(ParseError::new(
                "interface declarations may not declare conformances",
                ctx.current_range(),
            )));
        }
        let (members, end) = parse_member_list(ctx, false)?;
        let range = start.join(&end);
        ctx.meter(MemoryKind::Declaration, 1)?;
        return Ok(Declaration::Interface(InterfaceDeclaration {
            access,
            kind,
            name,
            members,
            doc_string,
            range,
        }));
    }

    let mut conformances = Vec::new();
    if ctx.current.kind == TokenKind::Colon {
        ctx.advance();
        loop {
            conformances.push(super::types::parse_type(ctx, 0)?);
            ctx.skip_trivia_default();
            if ctx.current.kind == TokenKind::Comma {
                ctx.advance();
                ctx.skip_trivia_default();
                continue;
            }
            break;
        }
    }
    let (members, end) = parse_member_list(ctx, true)?;
    let range = start.join(&end);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(Declaration::Composite(CompositeDeclaration {
        access,
        kind,
        name,
        conformances,
        members,
        doc_string,
        range,
    }))
}

/// A composite or interface body's `{` ... `}` member list (`spec.md`
/// §3: "may mix fields, functions, special functions, enum cases, and
/// nested composites/interfaces"). Returns the members plus the closing
/// brace's range, since the caller needs the latter to compute its own
/// declaration's range.
fn parse_member_list(
    ctx: &mut ParseContext,
    body_required: bool,
) -> PResult<(Vec<Declaration>, crate::position::Range)> {
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::LeftBrace)?;

    let mut members = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof) {
            break;
        }
        match parse_member(ctx, body_required) {
            Ok(member) => members.push(member),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                super::helpers::recover_to_declaration_boundary(ctx);
            }
        }
    }

    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    Ok((members, end.range))
}

/// One member of a composite or interface body.
fn parse_member(ctx: &mut ParseContext, body_required: bool) -> PResult<Declaration> {
    let (_, doc_string) = ctx.skip_trivia(TriviaOptions::skip_all().with_doc_strings());
    let (access, _) = parse_access_modifiers(ctx)?;

    if ctx.at_keyword("case") {
        return parse_enum_case(ctx, access, doc_string);
    }
    if ctx.at_keyword("let") || ctx.at_keyword("var") {
        return Ok(Declaration::Field(parse_field_declaration(ctx, access, doc_string)?));
    }
    if ctx.at_keyword("fun") {
        return Ok(Declaration::Function(parse_function_declaration(
            ctx,
            access,
            doc_string,
            body_required,
        )?));
    }
    if ctx.at_keyword("init") {
        return Ok(Declaration::SpecialFunction(parse_special_function(
            ctx,
            SpecialFunctionKind::Initializer,
            "init",
        )?));
    }
    if ctx.at_keyword("destroy") {
        return Ok(Declaration::SpecialFunction(parse_special_function(
            ctx,
            SpecialFunctionKind::Destructor,
            "destroy",
        )?));
    }
    if ctx.at_keyword("prepare") {
        return Ok(Declaration::SpecialFunction(parse_special_function(
            ctx,
            SpecialFunctionKind::Prepare,
            "prepare",
        )?));
    }
    if ctx.at_keyword("execute") {
        return Ok(Declaration::SpecialFunction(parse_special_function(
            ctx,
            SpecialFunctionKind::Execute,
            "execute",
        )?));
    }
    if is_composite_kind_keyword(ctx) {
        return parse_composite_or_interface(ctx, access, doc_string);
    }

    Err(Signal::Error(ParseError::new(
        format!("expected a composite member, found {:?}", ctx.current.kind),
        ctx.current_range(),
    )))
}

fn parse_enum_case(
    ctx: &mut ParseContext,
    access: Access,
    doc_string: Option<String>,
) -> PResult<Declaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "case")?;
    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();
    let range = start.range.join(&name_token.range);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(Declaration::EnumCase(EnumCaseDeclaration {
        access,
        name,
        doc_string,
        range,
    }))
}

/// A composite member field: `let|var name ':' typeAnn`, no initializer
/// (`spec.md` §3's `FieldDeclaration`, distinct from the statement/
/// top-level `VariableDeclaration`, which requires a transfer + value).
fn parse_field_declaration(
    ctx: &mut ParseContext,
    access: Access,
    doc_string: Option<String>,
) -> PResult<FieldDeclaration> {
    let start = ctx.current_range();
    let is_constant = ctx.at_keyword("let");
    if is_constant {
        ctx.expect_keyword(TokenKind::Identifier, "let")?;
    } else {
        ctx.expect_keyword(TokenKind::Identifier, "var")?;
    }

    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    ctx.skip_trivia_default();
    ctx.expect(TokenKind::Colon)?;
    let type_annotation = super::types::parse_type_annotation(ctx)?;
    let range = start.join(&type_annotation.range);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(FieldDeclaration {
        access,
        is_constant,
        name,
        type_annotation,
        doc_string,
        range,
    })
}

fn parse_special_function(
    ctx: &mut ParseContext,
    kind: SpecialFunctionKind,
    keyword: &str,
) -> PResult<SpecialFunctionDeclaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, keyword)?;
    ctx.skip_trivia_default();
    let parameters = super::helpers::parse_parameters(ctx)?;
    ctx.skip_trivia_default();
    let body = if ctx.current.kind == TokenKind::LeftBrace {
        Some(parse_function_block(ctx)?)
    } else {
        None
    };
    let end = body
        .as_ref()
        .map(|b| b.range)
        .or_else(|| parameters.last().map(|p| p.range))
        .unwrap_or(start.range);
    let range = start.range.join(&end);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(SpecialFunctionDeclaration {
        kind,
        parameters,
        body,
        range,
    })
}

/// `event name parameterList` desugars to a [`CompositeKind::Event`]
/// composite with a single synthetic initializer special function
/// (`spec.md` §4.5, §3).
fn parse_event(ctx: &mut ParseContext, access: Access, doc_string: Option<String>) -> PResult<Declaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "event")?;
    ctx.skip_trivia_default();
    let name_token = ctx.expect(TokenKind::Identifier)?;
    let name = name_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();

    let parameters = super::helpers::parse_parameters(ctx)?;
    let params_end = parameters.last().map(|p| p.range).unwrap_or(name_token.range);
    let initializer_range = name_token.range.join(&params_end);
    ctx.meter(MemoryKind::Declaration, 1)?;
    let initializer = SpecialFunctionDeclaration {
        kind: SpecialFunctionKind::Initializer,
        parameters,
        body: None,
        range: initializer_range,
    };

    let range = start.range.join(&initializer_range);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(Declaration::Composite(CompositeDeclaration {
        access,
        kind: CompositeKind::Event,
        name,
        conformances: Vec::new(),
        members: vec![Declaration::SpecialFunction(initializer)],
        doc_string,
        range,
    }))
}

/// `'transaction' parameterList? '{' field* prepare? preConditions?
/// (execute | execute postConditions | postConditions | postConditions
/// execute | ε) '}'` (`spec.md` §4.6's state machine).
fn parse_transaction(ctx: &mut ParseContext) -> PResult<TransactionDeclaration> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "transaction")?;
    ctx.skip_trivia_default();
    let parameters = if ctx.current.kind == TokenKind::LeftParen {
        super::helpers::parse_parameters(ctx)?
    } else {
        Vec::new()
    };

    ctx.skip_trivia_default();
    ctx.expect(TokenKind::LeftBrace)?;

    // S0: fields only.
    let mut fields = Vec::new();
    loop {
        ctx.skip_trivia_default();
        if !(ctx.at_keyword("let") || ctx.at_keyword("var")) {
            break;
        }
        match parse_field_declaration(ctx, Access::NotSpecified, None) {
            Ok(field) => fields.push(field),
            Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
            Err(Signal::Error(err)) => {
                ctx.report(err);
                super::helpers::recover_to_declaration_boundary(ctx);
            }
        }
    }

    // S1: optional prepare, or the first execute.
    let mut prepare = None;
    let mut execute = None;
    ctx.skip_trivia_default();
    if ctx.at_keyword("prepare") {
        prepare = Some(parse_special_function(ctx, SpecialFunctionKind::Prepare, "prepare")?);
    } else if ctx.at_keyword("execute") {
        execute = Some(parse_special_function(ctx, SpecialFunctionKind::Execute, "execute")?);
    }

    // S2: optional `pre { ... }`, only legal before any `execute`.
    let mut pre_conditions = None;
    ctx.skip_trivia_default();
    if ctx.at_keyword("pre") {
        ctx.advance();
        if execute.is_some() {
            ctx.report(ParseError::new(
                "'pre' conditions must appear before 'execute'",
                ctx.current_range(),
            ));
        }
        pre_conditions = Some(parse_conditions(ctx)?);
    }

    // Remainder: `execute` (if not already seen) and `post { ... }`, each
    // at most once, in either order.
    let mut post_conditions = None;
    loop {
        ctx.skip_trivia_default();
        if matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof) {
            break;
        }
        if ctx.at_keyword("execute") {
            let parsed = parse_special_function(ctx, SpecialFunctionKind::Execute, "execute")?;
            if execute.is_some() {
                ctx.report(ParseError::new(
                    "transaction may declare at most one 'execute' block",
                    parsed.range,
                ));
            } else {
                execute = Some(parsed);
            }
            continue;
        }
        if ctx.at_keyword("post") {
            ctx.advance();
            let parsed = parse_conditions(ctx)?;
            if post_conditions.is_some() {
                ctx.report(ParseError::new(
                    "transaction may declare at most one 'post' block",
                    parsed.range,
                ));
            } else {
                post_conditions = Some(parsed);
            }
            continue;
        }
        ctx.report(ParseError::new(
            "expected 'execute', 'post', or '}' in transaction body",
            ctx.current_range(),
        ));
        super::helpers::recover_to_declaration_boundary(ctx);
    }

    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.range.join(&end.range);
    ctx.meter(MemoryKind::Declaration, 1)?;
    Ok(TransactionDeclaration {
        parameters,
        fields,
        prepare,
        pre_conditions,
        execute,
        post_conditions,
        range,
    })
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
    fn variable_declaration_at_top_level() {
        let mut c = ctx("let x = 1");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Variable(decl) => assert_eq!(decl.name, "x"),
            other => panic!("expected variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn function_declaration_requires_a_body_at_top_level() {
        let mut c = ctx("fun foo(): Int");
        assert!(parse_declaration(&mut c).is_err());
    }

    #[test]
    fn function_declaration_parses_params_and_return_type() {
        let mut c = ctx("fun foo(): Int { return 1 }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Function(decl) => {
                assert_eq!(decl.name, "foo");
                assert!(decl.body.is_some());
            }
            other => panic!("expected function declaration, got {other:?}"),
        }
    }

    #[test]
    fn pragma_parses_hash_and_expression() {
        let mut c = ctx("#version(1)");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Pragma(_) => {}
            other => panic!("expected pragma declaration, got {other:?}"),
        }
    }

    #[test]
    fn pragma_rejects_access_modifier() {
        let mut c = ctx("pub #version(1)");
        assert!(parse_declaration(&mut c).is_err());
    }

    #[test]
    fn second_access_modifier_is_an_error() {
        let mut c = ctx("pub priv let x = 1");
        assert!(parse_declaration(&mut c).is_err());
    }

    #[test]
    fn event_desugars_to_composite_with_initializer() {
        let mut c = ctx("event Withdraw(amount: Int)");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Composite(decl) => {
                assert_eq!(decl.kind, CompositeKind::Event);
                assert_eq!(decl.members.len(), 1);
                assert!(matches!(decl.members[0], Declaration::SpecialFunction(_)));
            }
            other => panic!("expected composite declaration, got {other:?}"),
        }
    }

    #[test]
    fn struct_declaration_parses_conformances_and_members() {
        let mut c = ctx("struct Foo: Bar, Baz { let x: Int case unreachable }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Composite(decl) => {
                assert_eq!(decl.conformances.len(), 2);
                assert_eq!(decl.members.len(), 2);
            }
            other => panic!("expected composite declaration, got {other:?}"),
        }
    }

    #[test]
    fn interface_declaration_rejects_conformances() {
        let mut c = ctx("resource interface Receiver: Foo { }");
        assert!(parse_declaration(&mut c).is_err());
    }

    #[test]
    fn interface_member_function_body_is_optional() {
        let mut c = ctx("resource interface Receiver { fun deposit(amount: Int) }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Interface(decl) => match &decl.members[0] {
                Declaration::Function(f) => assert!(f.body.is_none()),
                other => panic!("expected function member, got {other:?}"),
            },
            other => panic!("expected interface declaration, got {other:?}"),
        }
    }

    #[test]
    fn enum_declaration_parses_cases() {
        let mut c = ctx("enum Direction { case up case down }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Composite(decl) => assert_eq!(decl.members.len(), 2),
            other => panic!("expected composite declaration, got {other:?}"),
        }
    }

    #[test]
    fn special_functions_parse_inside_a_resource() {
        let mut c = ctx("resource Vault { init(balance: Int) { } destroy() { } }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Composite(decl) => {
                assert_eq!(decl.members.len(), 2);
                assert!(decl
                    .members
                    .iter()
                    .any(|m| matches!(m, Declaration::SpecialFunction(f) if f.kind == SpecialFunctionKind::Initializer)));
            }
            other => panic!("expected composite declaration, got {other:?}"),
        }
    }

    #[test]
    fn transaction_with_fields_prepare_and_execute() {
        let mut c = ctx(
            "transaction(amount: Int) { let x: Int prepare(signer: AuthAccount) { } execute { } }",
        );
        let decl = parse_transaction(&mut c).unwrap();
        assert_eq!(decl.fields.len(), 1);
        assert!(decl.prepare.is_some());
        assert!(decl.execute.is_some());
    }

    #[test]
    fn transaction_allows_post_before_execute() {
        let mut c = ctx("transaction { post { true } execute { } }");
        let decl = parse_transaction(&mut c).unwrap();
        assert!(decl.post_conditions.is_some());
        assert!(decl.execute.is_some());
    }

    #[test]
    fn transaction_pre_after_execute_is_reported_but_recovers() {
        let mut c = ctx("transaction { execute { } pre { true } }");
        let decl = parse_transaction(&mut c);
        assert!(decl.is_ok());
        assert!(!c.errors.is_empty());
    }

    #[test]
    fn transaction_with_only_fields_is_legal() {
        let mut c = ctx("transaction { let x: Int }");
        let decl = parse_transaction(&mut c).unwrap();
        assert_eq!(decl.fields.len(), 1);
        assert!(decl.prepare.is_none());
        assert!(decl.execute.is_none());
    }

    #[test]
    fn doc_string_attaches_to_following_declaration() {
        let mut c = ctx("/// Transfers tokens.\nfun transfer() { }");
        match parse_declaration(&mut c).unwrap() {
            Declaration::Function(decl) => assert_eq!(decl.doc_string.as_deref(), Some("Transfers tokens.")),
            other => panic!("expected function declaration, got {other:?}"),
        }
    }
}
