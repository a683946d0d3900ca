//! Statement AST nodes (`spec.md` §3 "Statement" family).

use std::cell::Cell;

use super::decl::{FunctionDeclaration, VariableDeclaration};
use super::expr::{Expression, TransferKind};
use super::node_id::NodeId;
use crate::position::Range;

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub range: Range,
}

/// An `if` statement's test is either a plain expression or an
/// "if-let" variable declaration (`spec.md` §3).
#[derive(Debug, Clone)]
pub enum IfTest {
    Expression(Expression),
    VariableDeclaration(Box<VariableDeclaration>),
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(Block),
    If(Box<Statement>),
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// `None` for the `default:` case.
    pub test: Option<Expression>,
    pub body: Vec<Statement>,
    pub range: Range,
}

#[derive(Debug, Clone)]
pub enum Statement {
    VariableDeclaration(Box<VariableDeclaration>),
    Return {
        value: Option<Expression>,
        range: Range,
    },
    If {
        id: NodeId,
        test: IfTest,
        then_branch: Block,
        else_branch: Option<Box<ElseBranch>>,
        range: Range,
    },
    While {
        condition: Expression,
        body: Block,
        range: Range,
    },
    For {
        identifier: String,
        iterable: Expression,
        body: Block,
        range: Range,
    },
    Emit {
        invocation: Expression,
        range: Range,
    },
    Break {
        range: Range,
    },
    Continue {
        range: Range,
    },
    Assignment {
        target: Expression,
        transfer: TransferKind,
        value: Expression,
        range: Range,
    },
    Swap {
        left: Expression,
        right: Expression,
        range: Range,
    },
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
        range: Range,
    },
    Expression(Expression),
    /// A function declaration used in statement position (`spec.md` §3:
    /// "FunctionDeclaration (also usable as statement)").
    FunctionDeclaration(Box<FunctionDeclaration>),
}

impl Statement {
    pub fn range(&self) -> Range {
        match self {
            Statement::VariableDeclaration(d) => d.range,
            Statement::Return { range, .. }
            | Statement::If { range, .. }
            | Statement::While { range, .. }
            | Statement::For { range, .. }
            | Statement::Emit { range, .. }
            | Statement::Break { range }
            | Statement::Continue { range }
            | Statement::Assignment { range, .. }
            | Statement::Swap { range, .. }
            | Statement::Switch { range, .. } => *range,
            Statement::Expression(expr) => expr.range(),
            Statement::FunctionDeclaration(d) => d.range,
        }
    }

    /// The [`Cell`] recording the back-reference wired up when this `if`
    /// statement's test is a variable declaration (`spec.md` §3, §9).
    pub fn if_back_reference_target(&self) -> Option<&Cell<Option<NodeId>>> {
        match self {
            Statement::If {
                test: IfTest::VariableDeclaration(decl),
                ..
            } => Some(&decl.parent_if),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn break_and_continue_carry_their_own_range() {
        let range = Range::empty_at(Position::new(2, 1, 2));
        let brk = Statement::Break { range };
        let cont = Statement::Continue { range };
        assert_eq!(brk.range(), range);
        assert_eq!(cont.range(), range);
    }

    #[test]
    fn expression_statement_range_delegates_to_expression() {
        let range = Range::empty_at(Position::new(9, 1, 9));
        let stmt = Statement::Expression(Expression::Nil { range });
        assert_eq!(stmt.range(), range);
    }
}
