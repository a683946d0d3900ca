//! Abstract Syntax Tree definitions for the Solstice language.
//!
//! This module defines the data structures the parser ([`crate::parser`])
//! produces for subsequent semantic analysis (out of scope for this
//! crate, per `spec.md` §1). The AST has four node families, mirroring
//! `spec.md` §3:
//!
//! - [`expr`] - Expressions ([`Expression`])
//! - [`types`] - Types ([`Type`], [`TypeAnnotation`])
//! - [`stmt`] - Statements ([`Statement`])
//! - [`decl`] - Declarations ([`Declaration`])
//!
//! plus [`node_id`] ([`NodeId`]), the identity scheme backing the two weak
//! back-references `spec.md` §3 and §9 describe, and [`program`]
//! ([`Program`]), the AST root.
//!
//! # See Also
//!
//! * [`crate::parser`] - produces these nodes
//! * [`crate::context`] - the node-construction helpers that charge the
//!   memory gauge before building each node

pub mod decl;
pub mod expr;
pub mod node_id;
pub mod program;
pub mod stmt;
pub mod types;


pub use decl::{
    Access, CompositeDeclaration, CompositeKind, Condition, Conditions, Declaration,
    EnumCaseDeclaration, FieldDeclaration, FunctionBlock, FunctionDeclaration, ImportDeclaration,
    InterfaceDeclaration, PragmaDeclaration, SpecialFunctionDeclaration, SpecialFunctionKind,
    TransactionDeclaration, VariableDeclaration,
};
pub use expr::{
    Argument, BinaryOp, CastKind, DictionaryEntry, Expression, Parameter, TransferKind, UnaryOp,
};
pub use node_id::NodeId;
pub use program::Program;
pub use stmt::{Block, ElseBranch, IfTest, Statement, SwitchCase};
pub use types::{Type, TypeAnnotation};
