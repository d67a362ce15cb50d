//! Token types shared by the Vela lexer and parser.
//!
//! [`TokenKind`] is the closed set of lexical categories and [`Token`]
//! pairs a kind with its literal text and source [`Span`].

use crate::Span;
use serde::Serialize;
use std::fmt;

/// The reserved words of Vela, in lookup order.
pub const ALL_KEYWORDS: &[&str] = &["true", "false", "function", "var", "return", "if", "else"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
///
/// Equality compares `kind` and `literal` only; two tokens lexed from
/// different positions are equal when they spell the same thing.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token (empty for end of input).
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// The end-of-input token at `span`.
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    /// Short human-readable form used in diagnostics: `'5'`, `end of input`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.literal),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.literal == other.literal
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind.name(), self.literal)
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every lexical category in Vela.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Special ──────────────────────────────────────────────
    Eof,
    /// A character no rule accepts; the literal is that character.
    Illegal,

    // ── Identifiers & Literals ───────────────────────────────
    Ident,
    Int,
    String,

    // ── Operators ────────────────────────────────────────────
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Bang,
    Eq,
    NotEq,

    // ── Delimiters ───────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // ── Keywords ─────────────────────────────────────────────
    True,
    False,
    Function,
    Var,
    Return,
    If,
    Else,
}

impl TokenKind {
    /// Resolve an identifier-shaped word against the keyword table.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "function" => Some(TokenKind::Function),
            "var" => Some(TokenKind::Var),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::True
                | TokenKind::False
                | TokenKind::Function
                | TokenKind::Var
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Else
        )
    }

    /// Stable upper-case name used in token listings.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Ident => "IDENTIFIER",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Bang => "BANG",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Var => "VAR",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
        }
    }

    /// Fixed source text for operators, delimiters and keywords.
    pub fn fixed_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Eof | TokenKind::Illegal => return None,
            TokenKind::Ident | TokenKind::Int | TokenKind::String => return None,
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Bang => "!",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Function => "function",
            TokenKind::Var => "var",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Illegal => write!(f, "illegal character"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Int => write!(f, "integer"),
            TokenKind::String => write!(f, "string"),
            other => match other.fixed_text() {
                Some(text) => write!(f, "'{text}'"),
                None => write!(f, "{}", other.name()),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
