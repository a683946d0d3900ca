//! A fault-tolerant parser for Solstice, a resource-oriented smart-contract
//! language.
//!
//! This crate covers the front half of a Solstice toolchain: lexing,
//! Pratt-style expression and type parsing, and declaration parsing,
//! through to a fully-formed AST. It does not type-check or generate code.
//!
//! # Modules
//!
//! - [`token`] - token kinds, literal values, and source location tracking
//! - [`lexer`] - lexical analysis (tokenization)
//! - [`position`] - byte-offset/line/column positions and source ranges
//! - [`stream`] - the token cursor the parser advances over
//! - [`gauge`] - the memory-gauge metering interface AST construction charges
//! - [`error`] - recoverable errors, fatal errors, and the non-local control
//!   transfer (`Signal`) that carries them out of parser functions
//! - [`context`] - the parse context: token cursor, speculative buffering,
//!   and memory gauge threaded through every parsing routine
//! - [`parser`] - the recursive-descent, Pratt-assisted parser
//! - [`ast`] - Abstract Syntax Tree definitions
//! - [`api`] - the external entry points built on all of the above
//!
//! # Example
//!
//! ```
//! use solstice_parser::api::parse_program;
//! use solstice_parser::gauge::NoopGauge;
//!
//! let source = r#"
//!     transaction {
//!         let amount: Int
//!
//!         prepare(signer: AuthAccount) {
//!             self.amount = 10
//!         }
//!
//!         execute {
//!             log(self.amount)
//!         }
//!     }
//! "#;
//!
//! let (program, err) = parse_program(source, NoopGauge);
//! println!("parsed {} declaration(s)", program.declarations.len());
//! if let Some(err) = err {
//!     eprintln!("{err}");
//! }
//! ```

pub mod api;
pub use api::{
    parse, parse_argument_list, parse_declarations, parse_expression, parse_program, parse_statements,
    parse_type,
};
pub mod ast;
pub mod context;
pub mod error;
pub mod gauge;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod stream;
pub mod token;
