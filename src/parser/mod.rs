//! Recursive-descent, Pratt-assisted parser for the language.
//!
//! # Module structure
//!
//! - `helpers` - token navigation, access modifiers, parameter lists,
//!   and error-recovery synchronization points shared across the other
//!   modules.
//! - `expr` - the expression Pratt engine (nud/led/binding-power tables)
//!   and the `<` comparison-vs-type-arguments disambiguation.
//! - `types` - the type Pratt engine and the `{` dictionary-vs-
//!   restriction-list disambiguation.
//! - `stmt` - statements and the statement-position subset of variable
//!   declarations (`let`/`var` with a transfer and a value).
//! - `decl` - top-level and composite-member declarations: functions,
//!   composites, interfaces, events, enum cases, pragmas, and
//!   transactions.
//! - `import` - import declarations and the `from` keyword-vs-identifier
//!   disambiguation.
//!
//! # See also
//!
//! * [`crate::context`] - the token cursor, buffering, and memory gauge
//!   every parsing routine here threads through.
//! * [`crate::ast`] - the node types these routines build.

mod decl;
mod expr;
mod helpers;
mod import;
mod stmt;
mod types;

pub use decl::{parse_declaration, parse_declarations};
pub use expr::parse_expression;
pub use helpers::parse_arguments as parse_argument_list;
pub(crate) use helpers::recover_to_statement_boundary;
pub use stmt::parse_statement;
pub use types::{parse_type, parse_type_annotation};
