//! Core parser infrastructure: token cursor, precedence table, error reporting.

use tracing::debug;
use vela_lexer::Lexer;
use vela_types::ast::Program;
use vela_types::{Diagnostic, Diagnostics, ErrorCode, Span, Token, TokenKind};

/// Binding power of an operator, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// `-x`, `!x`
    Prefix,
    /// `f(x)`
    Call,
}

impl Precedence {
    /// Precedence of `kind` when it appears in infix position.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// The Vela parser.
///
/// Pulls tokens from the lexer on demand, keeping the current token and one
/// token of lookahead. Both are refreshed together by [`Parser::next_token`].
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    pub(crate) cur: Token,
    pub(crate) peek: Token,
    diagnostics: Diagnostics,
    /// Current expression nesting, including left-folded operator chains.
    pub(crate) depth: usize,
    /// Set once the nesting limit is hit; the rest of the input is skipped
    /// and no further diagnostics are recorded.
    pub(crate) abandoned: bool,
}

/// Result of parsing: the (possibly partial) program plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl<'src> Parser<'src> {
    /// Deepest expression nesting accepted before E103.
    pub const MAX_NESTING: usize = 256;

    /// Create a parser reading from `lexer`.
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            cur,
            peek,
            diagnostics: Diagnostics::empty(),
            depth: 0,
            abandoned: false,
        }
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> ParseResult {
        let mut program = Program::default();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }
        ParseResult {
            program,
            diagnostics: self.diagnostics,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Shift the lookahead into the current slot and pull a new lookahead.
    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    pub(crate) fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    /// Consume an optional `;` after a statement.
    pub(crate) fn eat_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// If the lookahead is `expected`, advance onto it and return it.
    /// Otherwise report an error and leave the cursor where it is.
    pub(crate) fn expect_peek(&mut self, expected: TokenKind) -> Option<Token> {
        if self.peek_is(expected) {
            self.next_token();
            Some(self.cur.clone())
        } else {
            let message = format!("expected {expected}, got {}", self.peek.describe());
            let span = self.peek.span;
            self.error_at(ErrorCode::UNEXPECTED_TOKEN, message, span);
            None
        }
    }

    // ── Nesting Limit ─────────────────────────────────────────────────────────

    /// Enter one more level of nesting. Past [`Parser::MAX_NESTING`], record
    /// E103, skip to end of input and return `None`.
    pub(crate) fn descend(&mut self) -> Option<()> {
        if self.abandoned {
            return None;
        }
        self.depth += 1;
        if self.depth <= Self::MAX_NESTING {
            return Some(());
        }
        let message = format!("expression nested deeper than {} levels", Self::MAX_NESTING);
        self.error_at_current(ErrorCode::NESTING_TOO_DEEP, message);
        self.abandoned = true;
        while !self.cur_is(TokenKind::Eof) {
            self.next_token();
        }
        None
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.cur.span;
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        if self.abandoned {
            return;
        }
        let diagnostic = Diagnostic::new(code, message, span);
        debug!(%diagnostic, "syntax error");
        self.diagnostics.push(diagnostic);
    }
}
