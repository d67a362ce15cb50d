//! Statement parsing.
//!
//! Every statement parser starts with the cursor on the statement's first
//! token and leaves it on the statement's last token (the optional `;`
//! included), so the caller's `next_token` moves to the next statement.

use tracing::trace;
use vela_types::ast::*;
use vela_types::TokenKind;

use crate::parser::{Parser, Precedence};

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        trace!(kind = self.cur.kind.name(), span = %self.cur.span, "statement");
        match self.cur.kind {
            TokenKind::Var => self.parse_let_stmt().map(Stmt::Let),
            TokenKind::Return => Some(Stmt::Return(self.parse_return_stmt())),
            _ => Some(Stmt::Expr(self.parse_expr_stmt())),
        }
    }

    /// `var name = value;`
    fn parse_let_stmt(&mut self) -> Option<LetStmt> {
        let token = self.cur.clone();
        let name = Ident::from_token(self.expect_peek(TokenKind::Ident)?);
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        self.eat_semicolon();
        Some(LetStmt { token, name, value })
    }

    /// `return value;`
    fn parse_return_stmt(&mut self) -> ReturnStmt {
        let token = self.cur.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        self.eat_semicolon();
        ReturnStmt { token, value }
    }

    /// An expression followed by an optional `;`.
    fn parse_expr_stmt(&mut self) -> ExprStmt {
        let token = self.cur.clone();
        let expr = self.parse_expression(Precedence::Lowest);
        self.eat_semicolon();
        ExprStmt { token, expr }
    }

    /// `{ stmts... }`, entered with the cursor on `{`.
    ///
    /// Stops at the matching `}` or at end of input; a missing `}` is not
    /// reported.
    pub(crate) fn parse_block(&mut self) -> Block {
        let token = self.cur.clone();
        let mut statements = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Block { token, statements }
    }
}
