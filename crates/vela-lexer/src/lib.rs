//! Vela lexer: converts source text into a token stream, one token per call.

pub mod lexer;

pub use lexer::{is_letter, is_space, Lexer};
pub use vela_types::{Span, Token, TokenKind, ALL_KEYWORDS};
