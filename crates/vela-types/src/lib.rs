//! Shared types for the Vela interpreter.
//!
//! This crate defines the token model, AST node types, source spans and
//! syntax diagnostics used across the lexer, parser and evaluator.

mod error;
mod span;
pub mod ast;
pub mod token;

pub use error::{Diagnostic, Diagnostics, ErrorCode};
pub use span::Span;
pub use token::{Token, TokenKind, ALL_KEYWORDS};
