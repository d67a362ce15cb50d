//! Vela parser: converts a token stream into an AST.
//!
//! Parsing never aborts. Every construct the parser cannot make sense of
//! records a [`vela_types::Diagnostic`] and is left out of the tree, so a
//! single pass reports every error it can still find.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser, Precedence};
