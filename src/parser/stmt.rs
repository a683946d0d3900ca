//! Statement parsing (`spec.md` §3 "Statement" family, §4.5's `let`/`var`
//! production reused here for statement-position variable declarations).
//!
//! `fun` in statement position redispatches to
//! [`super::decl::parse_function_declaration`] (`spec.md` §3:
//! "FunctionDeclaration (also usable as statement)"); everything else is
//! parsed directly against [`Statement`].

use crate::ast::{
    Access, Block, ElseBranch, IfTest, Statement, SwitchCase, TransferKind, VariableDeclaration,
};
use crate::context::ParseContext;
use crate::error::{ParseError, PResult, Signal};
use crate::gauge::MemoryKind;
use crate::token::TokenKind;

/// Dispatches on the current token's spelling to the statement production
/// it starts (`spec.md` §3). Falls through to assignment/swap/expression
/// statement parsing when none of the keyword spellings match.
pub fn parse_statement(ctx: &mut ParseContext) -> PResult<Statement> {
    ctx.skip_trivia_default();

    if ctx.at_keyword("let") || ctx.at_keyword("var") {
        let decl = parse_variable_declaration(ctx, Access::NotSpecified, None)?;
        return Ok(Statement::VariableDeclaration(Box::new(decl)));
    }
    if ctx.at_keyword("return") {
        return parse_return(ctx);
    }
    if ctx.at_keyword("if") {
        return parse_if(ctx);
    }
    if ctx.at_keyword("while") {
        return parse_while(ctx);
    }
    if ctx.at_keyword("for") {
        return parse_for(ctx);
    }
    if ctx.at_keyword("emit") {
        return parse_emit(ctx);
    }
    if ctx.at_keyword("break") {
        let token = ctx.expect_keyword(TokenKind::Identifier, "break")?;
        ctx.meter(MemoryKind::Statement, 1)?;
        return Ok(Statement::Break { range: token.range });
    }
    if ctx.at_keyword("continue") {
        let token = ctx.expect_keyword(TokenKind::Identifier, "continue")?;
        ctx.meter(MemoryKind::Statement, 1)?;
        return Ok(Statement::Continue { range: token.range });
    }
    if ctx.at_keyword("switch") {
        return parse_switch(ctx);
    }
    if ctx.at_keyword("fun") {
        let decl = super::decl::parse_function_declaration(ctx, Access::NotSpecified, None, true)?;
        return Ok(Statement::FunctionDeclaration(Box::new(decl)));
    }

    parse_assignment_swap_or_expression(ctx)
}

/// `kind identifier (':' typeAnn)? transfer expression (transfer
/// expression)?` (`spec.md` §4.5). Shared between statement-position
/// variable declarations and `let`/`var` fields inside a `transaction`
/// body's S0 state; callers outside statement position (e.g. transaction
/// fields, which carry no initializer) use [`super::helpers`] instead.
pub fn parse_variable_declaration(
    ctx: &mut ParseContext,
    access: Access,
    doc_string: Option<String>,
) -> PResult<VariableDeclaration> {
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
    let type_annotation = if ctx.current.kind == TokenKind::Colon {
        ctx.advance();
        Some(super::types::parse_type_annotation(ctx)?)
    } else {
        None
    };

    let transfer = super::expr::parse_transfer(ctx)?;
    let value = super::expr::parse_expression(ctx, 0)?;

    ctx.skip_trivia_default();
    let (second_transfer, second_value) =
        if matches!(ctx.current.kind, TokenKind::Equal | TokenKind::Arrow | TokenKind::ForceArrow) {
            let second_transfer = super::expr::parse_transfer(ctx)?;
            let second_value = super::expr::parse_expression(ctx, 0)?;
            (Some(second_transfer), Some(second_value))
        } else {
            (None, None)
        };

    let end = second_value
        .as_ref()
        .map(|v| v.range())
        .unwrap_or_else(|| value.range());
    let range = start.join(&end);

    let id = ctx.next_node_id();
    ctx.meter(MemoryKind::Declaration, 1)?;
    let declaration = VariableDeclaration {
        id,
        access,
        is_constant,
        name,
        type_annotation,
        transfer,
        value,
        second_transfer,
        second_value,
        doc_string,
        parent_if: std::cell::Cell::new(None),
        range,
    };

    if let Some(cell) = declaration.value.as_cast() {
        cell.set(Some(id));
    }

    Ok(declaration)
}

fn parse_return(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "return")?;
    ctx.skip_trivia_default();
    let value = if matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof) {
        None
    } else {
        Some(super::expr::parse_expression(ctx, 0)?)
    };
    let range = value
        .as_ref()
        .map(|v| start.range.join(&v.range()))
        .unwrap_or(start.range);
    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::Return { value, range })
}

/// `if (expression | 'let'|'var' variableDeclaration) block ('else'
/// (if | block))?` (`spec.md` §3's "if-let" case). The back-reference
/// between the test's variable declaration and this statement is wired
/// after the statement is built, via
/// [`Statement::if_back_reference_target`].
fn parse_if(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "if")?;
    let id = ctx.next_node_id();

    ctx.skip_trivia_default();
    let test = if ctx.at_keyword("let") || ctx.at_keyword("var") {
        let decl = parse_variable_declaration(ctx, Access::NotSpecified, None)?;
        IfTest::VariableDeclaration(Box::new(decl))
    } else {
        IfTest::Expression(super::expr::parse_expression(ctx, 0)?)
    };

    let then_branch = super::helpers::parse_block(ctx)?;

    ctx.skip_trivia_default();
    let else_branch = if ctx.at_keyword("else") {
        ctx.advance();
        ctx.skip_trivia_default();
        if ctx.at_keyword("if") {
            Some(Box::new(ElseBranch::If(Box::new(parse_if(ctx)?))))
        } else {
            Some(Box::new(ElseBranch::Block(super::helpers::parse_block(ctx)?)))
        }
    } else {
        None
    };

    let end = match &else_branch {
        Some(branch) => match branch.as_ref() {
            ElseBranch::Block(block) => block.range,
            ElseBranch::If(stmt) => stmt.range(),
        },
        None => then_branch.range,
    };
    let range = start.range.join(&end);
    ctx.meter(MemoryKind::Statement, 1)?;

    let stmt = Statement::If {
        id,
        test,
        then_branch,
        else_branch,
        range,
    };
    if let Some(cell) = stmt.if_back_reference_target() {
        cell.set(Some(id));
    }
    Ok(stmt)
}

fn parse_while(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "while")?;
    let condition = super::expr::parse_expression(ctx, 0)?;
    let body = super::helpers::parse_block(ctx)?;
    let range = start.range.join(&body.range);
    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::While { condition, body, range })
}

/// `for identifier 'in' expression block`.
fn parse_for(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "for")?;
    ctx.skip_trivia_default();
    let identifier_token = ctx.expect(TokenKind::Identifier)?;
    let identifier = identifier_token
        .value
        .as_identifier()
        .expect("Identifier token always carries an identifier value")
        .to_string();
    ctx.skip_trivia_default();
    ctx.expect_keyword(TokenKind::Identifier, "in")?;
    let iterable = super::expr::parse_expression(ctx, 0)?;
    let body = super::helpers::parse_block(ctx)?;
    let range = start.range.join(&body.range);
    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::For {
        identifier,
        iterable,
        body,
        range,
    })
}

fn parse_emit(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "emit")?;
    let invocation = super::expr::parse_expression(ctx, 0)?;
    if !matches!(invocation, crate::ast::Expression::Invocation { .. }) {
        return Err(Signal::Error(ParseError::new(
            "expected an invocation after 'emit'",
            invocation.range(),
        )));
    }
    let range = start.range.join(&invocation.range());
    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::Emit { invocation, range })
}

/// `switch subject '{' ('case' expression ':' stmt* | 'default' ':'
/// stmt*)* '}'` (`spec.md` §3).
fn parse_switch(ctx: &mut ParseContext) -> PResult<Statement> {
    let start = ctx.expect_keyword(TokenKind::Identifier, "switch")?;
    let subject = super::expr::parse_expression(ctx, 0)?;
    ctx.skip_trivia_default();
    ctx.expect(TokenKind::LeftBrace)?;

    let mut cases = Vec::new();
    loop {
        ctx.skip_trivia_default();
        let case_start = ctx.current_range();
        let test = if ctx.at_keyword("case") {
            ctx.advance();
            Some(super::expr::parse_expression(ctx, 0)?)
        } else if ctx.at_keyword("default") {
            ctx.advance();
            None
        } else {
            break;
        };
        ctx.skip_trivia_default();
        ctx.expect(TokenKind::Colon)?;

        let mut body = Vec::new();
        loop {
            ctx.skip_trivia_default();
            if ctx.at_keyword("case")
                || ctx.at_keyword("default")
                || matches!(ctx.current.kind, TokenKind::RightBrace | TokenKind::Eof)
            {
                break;
            }
            match parse_statement(ctx) {
                Ok(stmt) => body.push(stmt),
                Err(Signal::Fatal(fatal)) => return Err(Signal::Fatal(fatal)),
                Err(Signal::Error(err)) => {
                    ctx.report(err);
                    super::helpers::recover_to_case_boundary(ctx);
                }
            }
        }
        let case_end = body
            .last()
            .map(|s| s.range())
            .unwrap_or_else(|| ctx.current_range());
        let range = case_start.join(&case_end);
        ctx.meter(MemoryKind::Statement, 1)?;
        cases.push(SwitchCase { test, body, range });
    }

    ctx.skip_trivia_default();
    let end = ctx.expect(TokenKind::RightBrace)?;
    let range = start.range.join(&end.range);
    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::Switch { subject, cases, range })
}

/// Anything not recognized by a leading keyword: parse an expression
/// first, then decide whether it's an assignment target, a swap operand,
/// or a bare expression statement by what follows (`spec.md` §4.5's
/// transfer operators, plus `<->`).
fn parse_assignment_swap_or_expression(ctx: &mut ParseContext) -> PResult<Statement> {
    let target = super::expr::parse_expression(ctx, 0)?;
    ctx.skip_trivia_default();

    if ctx.current.kind == TokenKind::Swap {
        ctx.advance();
        let right = super::expr::parse_expression(ctx, 0)?;
        let range = target.range().join(&right.range());
        ctx.meter(MemoryKind::Statement, 1)?;
        return Ok(Statement::Swap {
            left: target,
            right,
            range,
        });
    }

    if matches!(ctx.current.kind, TokenKind::Equal | TokenKind::Arrow | TokenKind::ForceArrow) {
        let transfer = transfer_from_kind(ctx.current.kind);
        ctx.advance();
        let value = super::expr::parse_expression(ctx, 0)?;
        let range = target.range().join(&value.range());
        ctx.meter(MemoryKind::Statement, 1)?;
        return Ok(Statement::Assignment {
            target,
            transfer,
            value,
            range,
        });
    }

    ctx.meter(MemoryKind::Statement, 1)?;
    Ok(Statement::Expression(target))
}

fn transfer_from_kind(kind: TokenKind) -> TransferKind {
    match kind {
        TokenKind::Equal => TransferKind::Copy,
        TokenKind::Arrow => TransferKind::Move,
        TokenKind::ForceArrow => TransferKind::ForcedMove,
        _ => unreachable!("only called for a transfer-operator token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::gauge::NoopGauge;
    use crate::stream::lex;

    fn ctx(input: &str) -> ParseContext<'static> {
        ParseContext::new(lex(input), NoopGauge)
    }

    #[test]
    fn variable_declaration_statement_parses_let() {
        let mut c = ctx("let x = 1");
        match parse_statement(&mut c).unwrap() {
            Statement::VariableDeclaration(decl) => {
                assert!(decl.is_constant);
                assert_eq!(decl.name, "x");
            }
            other => panic!("expected variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn variable_declaration_wires_cast_back_reference() {
        let mut c = ctx("let x = y as Int");
        match parse_statement(&mut c).unwrap() {
            Statement::VariableDeclaration(decl) => {
                let cell = decl.value.as_cast().expect("expected a cast expression");
                assert_eq!(cell.get(), Some(decl.id));
            }
            other => panic!("expected variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn if_let_wires_parent_if_back_reference() {
        let mut c = ctx("if let x <- y { } ");
        match parse_statement(&mut c).unwrap() {
            Statement::If { id, test, .. } => match test {
                IfTest::VariableDeclaration(decl) => assert_eq!(decl.parent_if.get(), Some(id)),
                other => panic!("expected if-let test, got {other:?}"),
            },
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn if_else_if_chains_through_else_branch() {
        let mut c = ctx("if true { } else if false { } else { }");
        match parse_statement(&mut c).unwrap() {
            Statement::If { else_branch, .. } => match else_branch.unwrap().as_ref() {
                ElseBranch::If(inner) => match inner.as_ref() {
                    Statement::If { else_branch, .. } => assert!(else_branch.is_some()),
                    other => panic!("expected nested if, got {other:?}"),
                },
                other => panic!("expected else-if, got {other:?}"),
            },
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn while_loop_parses_condition_and_body() {
        let mut c = ctx("while true { break }");
        match parse_statement(&mut c).unwrap() {
            Statement::While { body, .. } => assert_eq!(body.statements.len(), 1),
            other => panic!("expected while statement, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_parses_identifier_and_iterable() {
        let mut c = ctx("for item in items { }");
        match parse_statement(&mut c).unwrap() {
            Statement::For { identifier, .. } => assert_eq!(identifier, "item"),
            other => panic!("expected for statement, got {other:?}"),
        }
    }

    #[test]
    fn emit_requires_an_invocation() {
        let mut c = ctx("emit 1");
        assert!(parse_statement(&mut c).is_err());
    }

    #[test]
    fn emit_accepts_an_invocation() {
        let mut c = ctx("emit Withdraw(amount: 1)");
        match parse_statement(&mut c).unwrap() {
            Statement::Emit { .. } => {}
            other => panic!("expected emit statement, got {other:?}"),
        }
    }

    #[test]
    fn switch_parses_cases_and_default() {
        let mut c = ctx("switch x { case 1: break default: continue }");
        match parse_statement(&mut c).unwrap() {
            Statement::Switch { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(cases[0].test.is_some());
                assert!(cases[1].test.is_none());
            }
            other => panic!("expected switch statement, got {other:?}"),
        }
    }

    #[test]
    fn swap_statement_parses_both_operands() {
        let mut c = ctx("a <-> b");
        match parse_statement(&mut c).unwrap() {
            Statement::Swap { .. } => {}
            other => panic!("expected swap statement, got {other:?}"),
        }
    }

    #[test]
    fn assignment_statement_recognizes_move_transfer() {
        let mut c = ctx("a <- b");
        match parse_statement(&mut c).unwrap() {
            Statement::Assignment { transfer, .. } => assert_eq!(transfer, TransferKind::Move),
            other => panic!("expected assignment statement, got {other:?}"),
        }
    }

    #[test]
    fn bare_expression_statement_without_transfer() {
        let mut c = ctx("foo()");
        match parse_statement(&mut c).unwrap() {
            Statement::Expression(Expression::Invocation { .. }) => {}
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn return_without_value_at_closing_brace() {
        let mut c = ctx("return }");
        match parse_statement(&mut c).unwrap() {
            Statement::Return { value, .. } => assert!(value.is_none()),
            other => panic!("expected return statement, got {other:?}"),
        }
    }

    #[test]
    fn return_with_value() {
        let mut c = ctx("return 1 + 1");
        match parse_statement(&mut c).unwrap() {
            Statement::Return { value, .. } => assert!(value.is_some()),
            other => panic!("expected return statement, got {other:?}"),
        }
    }

    #[test]
    fn fun_in_statement_position_parses_as_function_declaration() {
        let mut c = ctx("fun helper(): Int { return 1 }");
        match parse_statement(&mut c).unwrap() {
            Statement::FunctionDeclaration(decl) => assert_eq!(decl.name, "helper"),
            other => panic!("expected function declaration statement, got {other:?}"),
        }
    }
}
