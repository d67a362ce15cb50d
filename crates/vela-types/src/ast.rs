//! AST node types for the Vela language.
//!
//! Every node keeps the token it started at, so diagnostics can point back
//! into the source. Sub-expressions the parser could not build are stored
//! as `None` and render as nothing.
//!
//! `Display` on each node produces the canonical, fully parenthesised form:
//! `-a * b` renders as `((-a) * b)`.

use crate::{Span, Token, TokenKind};
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed program: statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

/// Any node the evaluator can be pointed at.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Block(&'a Block),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(p) => p.fmt(f),
            Node::Block(b) => b.fmt(f),
            Node::Stmt(s) => s.fmt(f),
            Node::Expr(e) => e.fmt(f),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// An identifier together with the token it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

impl Ident {
    pub fn from_token(token: Token) -> Self {
        let name = token.literal.clone();
        Self { token, name }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var name = value;`
    Let(LetStmt),
    /// `return value;`
    Return(ReturnStmt),
    /// An expression in statement position.
    Expr(ExprStmt),
}

impl Stmt {
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let(s) => &s.token,
            Stmt::Return(s) => &s.token,
            Stmt::Expr(s) => &s.token,
        }
    }

    pub fn span(&self) -> Span {
        self.token().span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub token: Token,
    pub name: Ident,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub token: Token,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub token: Token,
    pub expr: Option<Expr>,
}

/// `{ statements }`, the body of an `if` branch or a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The opening `{`.
    pub token: Token,
    pub statements: Vec<Stmt>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Self { kind, token }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    Identifier(String),
    Integer(i64),
    Boolean(bool),
    String(String),

    // ── Operators ──
    /// `-x`, `!x`
    Prefix {
        op: PrefixOp,
        operand: Option<Box<Expr>>,
    },
    /// `a + b`
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Option<Box<Expr>>,
    },

    // ── Control Flow ──
    /// `if (cond) { ... } else { ... }`
    If(Box<IfExpr>),

    // ── Functions ──
    /// `function(a, b) { ... }`
    ///
    /// Shared so a runtime function value can hold the literal without
    /// copying the body.
    Function(Rc<FunctionLiteral>),
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Option<Expr>,
    pub consequence: Block,
    pub alternative: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Ident>,
    pub body: Block,
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(PrefixOp::Neg),
            TokenKind::Bang => Some(PrefixOp::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    // Equality
    Eq,
    NotEq,
    // Relational
    Less,
    Greater,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl InfixOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(InfixOp::Eq),
            TokenKind::NotEq => Some(InfixOp::NotEq),
            TokenKind::Lt => Some(InfixOp::Less),
            TokenKind::Gt => Some(InfixOp::Greater),
            TokenKind::Plus => Some(InfixOp::Add),
            TokenKind::Minus => Some(InfixOp::Sub),
            TokenKind::Asterisk => Some(InfixOp::Mul),
            TokenKind::Slash => Some(InfixOp::Div),
            _ => None,
        }
    }

    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical rendering
// ══════════════════════════════════════════════════════════════════════════════

/// Writes `Some(x)` with its `Display`, and `None` as nothing.
struct Opt<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(inner) => inner.fmt(f),
            None => Ok(()),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|s| s.fmt(f))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|s| s.fmt(f))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(s) => write!(f, "{} {} = {};", s.token.literal, s.name, Opt(&s.value)),
            Stmt::Return(s) => write!(f, "{} {};", s.token.literal, Opt(&s.value)),
            Stmt::Expr(s) => Opt(&s.expr).fmt(f),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Integer(value) => write!(f, "{value}"),
            ExprKind::Boolean(_) | ExprKind::String(_) => f.write_str(&self.token.literal),
            ExprKind::Prefix { op, operand } => write!(f, "({op}{})", Opt(operand)),
            ExprKind::Infix { left, op, right } => write!(f, "({left} {op} {})", Opt(right)),
            ExprKind::If(if_expr) => {
                write!(f, "if {} {}", Opt(&if_expr.condition), if_expr.consequence)?;
                if let Some(alt) = &if_expr.alternative {
                    write!(f, "else {alt}")?;
                }
                Ok(())
            }
            ExprKind::Function(func) => {
                write!(f, "{}(", self.token.literal)?;
                write_joined(f, &func.params)?;
                write!(f, ") {}", func.body)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_joined(f, args)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Span::point(1, 1))
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.into()), tok(TokenKind::Ident, name))
    }

    #[test]
    fn test_let_statement_display() {
        let program = Program::new(vec![Stmt::Let(LetStmt {
            token: tok(TokenKind::Var, "var"),
            name: Ident::from_token(tok(TokenKind::Ident, "mi_var")),
            value: Some(ident("otra_variable")),
        })]);
        assert_eq!(program.to_string(), "var mi_var = otra_variable;");
    }

    #[test]
    fn test_return_statement_display() {
        let stmt = Stmt::Return(ReturnStmt {
            token: tok(TokenKind::Return, "return"),
            value: Some(Expr::new(ExprKind::Integer(5), tok(TokenKind::Int, "5"))),
        });
        assert_eq!(stmt.to_string(), "return 5;");
    }

    #[test]
    fn test_prefix_and_infix_display() {
        let neg = Expr::new(
            ExprKind::Prefix {
                op: PrefixOp::Neg,
                operand: Some(Box::new(ident("a"))),
            },
            tok(TokenKind::Minus, "-"),
        );
        let mul = Expr::new(
            ExprKind::Infix {
                left: Box::new(neg),
                op: InfixOp::Mul,
                right: Some(Box::new(ident("b"))),
            },
            tok(TokenKind::Asterisk, "*"),
        );
        assert_eq!(mul.to_string(), "((-a) * b)");
    }

    #[test]
    fn test_absent_operand_renders_empty() {
        let neg = Expr::new(
            ExprKind::Prefix {
                op: PrefixOp::Not,
                operand: None,
            },
            tok(TokenKind::Bang, "!"),
        );
        assert_eq!(neg.to_string(), "(!)");
    }

    #[test]
    fn test_call_display_joins_arguments() {
        let call = Expr::new(
            ExprKind::Call {
                callee: Box::new(ident("suma")),
                args: vec![ident("a"), ident("b")],
            },
            tok(TokenKind::LParen, "("),
        );
        assert_eq!(call.to_string(), "suma(a, b)");
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(InfixOp::from_token(TokenKind::Slash), Some(InfixOp::Div));
        assert_eq!(InfixOp::from_token(TokenKind::Assign), None);
        assert_eq!(PrefixOp::from_token(TokenKind::Bang), Some(PrefixOp::Not));
        assert_eq!(PrefixOp::from_token(TokenKind::Plus), None);
    }
}
