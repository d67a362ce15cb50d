//! Expression parsing by precedence climbing.
//!
//! Precedence (lowest → highest):
//! 1. `==`, `!=`
//! 2. `<`, `>`
//! 3. `+`, `-`
//! 4. `*`, `/`
//! 5. unary `-`, `!`
//! 6. `()` (call)
//!
//! Each token kind may have a prefix handler (starts an expression) and an
//! infix handler (continues one, given the left operand). Handlers are
//! entered with the cursor on their first token and leave it on their last.

use std::rc::Rc;

use vela_types::ast::*;
use vela_types::{ErrorCode, TokenKind};

use crate::parser::{Parser, Precedence};

type PrefixFn<'src> = fn(&mut Parser<'src>) -> Option<Expr>;
type InfixFn<'src> = fn(&mut Parser<'src>, Expr) -> Option<Expr>;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Handler Tables
    // ══════════════════════════════════════════════════════════════════════════

    fn prefix_fn(kind: TokenKind) -> Option<PrefixFn<'src>> {
        let f: PrefixFn<'src> = match kind {
            TokenKind::Ident => Self::parse_identifier,
            TokenKind::Int => Self::parse_integer,
            TokenKind::String => Self::parse_string,
            TokenKind::True | TokenKind::False => Self::parse_boolean,
            TokenKind::Minus | TokenKind::Bang => Self::parse_prefix,
            TokenKind::LParen => Self::parse_grouped,
            TokenKind::If => Self::parse_if,
            TokenKind::Function => Self::parse_function,
            _ => return None,
        };
        Some(f)
    }

    fn infix_fn(kind: TokenKind) -> Option<InfixFn<'src>> {
        let f: InfixFn<'src> = match kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt => Self::parse_infix,
            TokenKind::LParen => Self::parse_call,
            _ => return None,
        };
        Some(f)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression whose operators all bind tighter than `precedence`.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let outer = self.depth;
        let expr = vela_stack::ensure_sufficient_stack(|| self.parse_nested(precedence));
        self.depth = outer;
        expr
    }

    fn parse_nested(&mut self, precedence: Precedence) -> Option<Expr> {
        self.descend()?;
        let Some(prefix) = Self::prefix_fn(self.cur.kind) else {
            let message = format!("unexpected token {}", self.cur.describe());
            self.error_at_current(ErrorCode::NO_PREFIX_PARSE, message);
            return None;
        };
        let mut left = prefix(self);

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = Self::infix_fn(self.peek.kind) else {
                return left;
            };
            let lhs = left?;
            // Each fold puts the tree so far one level deeper.
            self.descend()?;
            self.next_token();
            left = infix(self, lhs);
        }
        left
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Handlers
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_identifier(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        Some(Expr::new(ExprKind::Identifier(token.literal.clone()), token))
    }

    fn parse_integer(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::new(ExprKind::Integer(value), token)),
            Err(_) => {
                let message = format!("could not parse '{}' as an integer", token.literal);
                self.error_at(ErrorCode::INVALID_INTEGER, message, token.span);
                None
            }
        }
    }

    fn parse_string(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        Some(Expr::new(ExprKind::String(token.literal.clone()), token))
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        let value = token.kind == TokenKind::True;
        Some(Expr::new(ExprKind::Boolean(value), token))
    }

    /// `-x`, `!x`
    fn parse_prefix(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        let op = PrefixOp::from_token(token.kind)?;
        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix).map(Box::new);
        Some(Expr::new(ExprKind::Prefix { op, operand }, token))
    }

    /// `( expr )`
    fn parse_grouped(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::RParen)?;
        expr
    }

    /// `if (cond) { ... }` with an optional `else { ... }`.
    fn parse_if(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block();

        let mut alternative = None;
        if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            alternative = Some(self.parse_block());
        }

        let if_expr = IfExpr {
            condition,
            consequence,
            alternative,
        };
        Some(Expr::new(ExprKind::If(Box::new(if_expr)), token))
    }

    /// `function(a, b) { ... }`
    fn parse_function(&mut self) -> Option<Expr> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_function_params()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block();
        let literal = FunctionLiteral { params, body };
        Some(Expr::new(ExprKind::Function(Rc::new(literal)), token))
    }

    /// Comma-separated identifiers, entered on `(` and leaving on `)`.
    fn parse_function_params(&mut self) -> Option<Vec<Ident>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }
        params.push(Ident::from_token(self.expect_peek(TokenKind::Ident)?));
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            params.push(Ident::from_token(self.expect_peek(TokenKind::Ident)?));
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(params)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Infix Handlers
    // ══════════════════════════════════════════════════════════════════════════

    /// `left op right`; the right side binds at the operator's own level,
    /// which folds same-level chains to the left.
    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        let op = InfixOp::from_token(token.kind)?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence).map(Box::new);
        let kind = ExprKind::Infix {
            left: Box::new(left),
            op,
            right,
        };
        Some(Expr::new(kind, token))
    }

    /// `callee(args)`, entered on `(`.
    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let token = self.cur.clone();
        let args = self.parse_call_args()?;
        let kind = ExprKind::Call {
            callee: Box::new(callee),
            args,
        };
        Some(Expr::new(kind, token))
    }

    /// Comma-separated expressions up to `)`. Arguments that fail to parse
    /// are dropped after their diagnostic is recorded.
    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(args);
        }
        self.next_token();
        args.extend(self.parse_expression(Precedence::Lowest));
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            args.extend(self.parse_expression(Precedence::Lowest));
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(args)
    }
}
