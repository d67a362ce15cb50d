//! Core expression and statement evaluator.
//!
//! Every `eval_*` method returns `Ok(None)` for "no result" (an empty
//! block, a `var` statement, an `if` whose branch was not taken), which is
//! distinct from `Ok(Some(Value::Null))`. Absence propagates: an operator
//! with an absent operand has no result, an absent argument is dropped,
//! `var` with an absent value binds nothing, and `return` with an absent
//! value has no result. Only an `if` condition reads absence as `null`.

use std::rc::Rc;

use tracing::{debug, trace};
use vela_types::ast::*;

use crate::builtins;
use crate::env::Env;
use crate::error::{EvalError, EvalResult, RuntimeError};
use crate::value::{Function, Value};

/// Evaluator limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest allowed nesting of user function calls.
    pub max_call_depth: usize,
}

impl EvalConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// The core evaluator: walks AST nodes and produces values.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    /// Current user function call nesting.
    depth: usize,
}

/// Bail out of the enclosing `eval_*` with the result of `$v` if it is a
/// return signal or an error; otherwise yield it as an `Option<Value>`.
macro_rules! propagate {
    ($v:expr) => {
        match $v {
            Some(v) if v.is_signal() => return Ok(Some(v)),
            other => other,
        }
    };
}

impl Evaluator {
    /// Create an evaluator with default limits.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Evaluate any node under `env`.
    pub fn eval(&mut self, node: Node<'_>, env: &Env) -> EvalResult<Option<Value>> {
        match node {
            Node::Program(program) => self.eval_program(program, env),
            Node::Block(block) => self.eval_block(block, env),
            Node::Stmt(stmt) => self.eval_stmt(stmt, env),
            Node::Expr(expr) => self.eval_expr(expr, env),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program, blocks & statements
    // ══════════════════════════════════════════════════════════════════════

    /// Run the statements in order. A `return` stops the program and yields
    /// its payload; an error stops the program and is the result.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> EvalResult<Option<Value>> {
        let mut result = None;
        for stmt in &program.statements {
            match self.eval_stmt(stmt, env)? {
                Some(Value::Return(inner)) => return Ok(Some(*inner)),
                Some(err @ Value::Error(_)) => return Ok(Some(err)),
                other => result = other,
            }
        }
        Ok(result)
    }

    /// Like [`Evaluator::eval_program`], but a `return` stays wrapped so the
    /// enclosing function call can see it.
    pub fn eval_block(&mut self, block: &Block, env: &Env) -> EvalResult<Option<Value>> {
        let mut result = None;
        for stmt in &block.statements {
            result = self.eval_stmt(stmt, env)?;
            if result.as_ref().is_some_and(Value::is_signal) {
                return Ok(result);
            }
        }
        Ok(result)
    }

    /// Execute a single statement.
    pub fn eval_stmt(&mut self, stmt: &Stmt, env: &Env) -> EvalResult<Option<Value>> {
        match stmt {
            Stmt::Let(let_stmt) => {
                if let Some(value) = propagate!(self.eval_operand(let_stmt.value.as_ref(), env)?) {
                    env.define(let_stmt.name.name.clone(), value);
                }
                Ok(None)
            }
            Stmt::Return(ret) => {
                let value = propagate!(self.eval_operand(ret.value.as_ref(), env)?);
                Ok(value.map(|v| Value::Return(Box::new(v))))
            }
            Stmt::Expr(expr_stmt) => match &expr_stmt.expr {
                Some(expr) => self.eval_expr(expr, env),
                None => Ok(None),
            },
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression. The native stack grows on demand, so nesting
    /// is bounded only by the parser and by `max_call_depth`.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult<Option<Value>> {
        vela_stack::ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Env) -> EvalResult<Option<Value>> {
        let value = match &expr.kind {
            ExprKind::Integer(n) => Value::Integer(*n),
            ExprKind::Boolean(b) => Value::Boolean(*b),
            ExprKind::String(s) => Value::String(s.clone()),
            ExprKind::Identifier(name) => self.eval_identifier(name, env),
            ExprKind::Prefix { op, operand } => {
                let Some(operand) = propagate!(self.eval_operand(operand.as_deref(), env)?) else {
                    return Ok(None);
                };
                self.eval_prefix(*op, operand)?
            }
            ExprKind::Infix { left, op, right } => {
                let lv = propagate!(self.eval_expr(left, env)?);
                let rv = propagate!(self.eval_operand(right.as_deref(), env)?);
                let (Some(lv), Some(rv)) = (lv, rv) else {
                    return Ok(None);
                };
                self.eval_infix(*op, lv, rv)?
            }
            ExprKind::If(if_expr) => return self.eval_if(if_expr, env),
            ExprKind::Function(literal) => Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: env.clone(),
            })),
            ExprKind::Call { callee, args } => {
                let Some(callee) = propagate!(self.eval_expr(callee, env)?) else {
                    return Ok(None);
                };
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    // Absent arguments are dropped, shifting later ones left.
                    values.extend(propagate!(self.eval_expr(arg, env)?));
                }
                return self.apply(callee, values);
            }
        };
        Ok(Some(value))
    }

    /// Evaluate an optional subexpression; a missing one has no result.
    fn eval_operand(&mut self, expr: Option<&Expr>, env: &Env) -> EvalResult<Option<Value>> {
        match expr {
            Some(expr) => self.eval_expr(expr, env),
            None => Ok(None),
        }
    }

    fn eval_identifier(&self, name: &str, env: &Env) -> Value {
        if let Some(value) = env.get(name) {
            return value;
        }
        match builtins::lookup(name) {
            Some(builtin) => Value::Builtin(builtin),
            None => self.error(RuntimeError::IdentifierNotFound(name.to_string())),
        }
    }

    fn eval_if(&mut self, if_expr: &IfExpr, env: &Env) -> EvalResult<Option<Value>> {
        let condition = propagate!(self.eval_operand(if_expr.condition.as_ref(), env)?);
        if condition.unwrap_or(Value::Null).is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(None)
        }
    }

    // ── Operators ─────────────────────────────────────────────────────────

    fn eval_prefix(&self, op: PrefixOp, operand: Value) -> EvalResult<Value> {
        match (op, operand) {
            (PrefixOp::Not, operand) => Ok(Value::Boolean(!operand.is_truthy())),
            (PrefixOp::Neg, Value::Integer(n)) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| EvalError::ArithmeticTrap(format!("integer overflow in -({n})"))),
            (PrefixOp::Neg, operand) => Ok(self.error(RuntimeError::UnknownPrefixOperator {
                op: op.as_str(),
                operand: operand.value_type(),
            })),
        }
    }

    fn eval_infix(&self, op: InfixOp, lv: Value, rv: Value) -> EvalResult<Value> {
        match (&lv, &rv) {
            (Value::Integer(a), Value::Integer(b)) => Self::eval_integer_infix(op, *a, *b),
            (Value::String(a), Value::String(b)) => Ok(match op {
                InfixOp::Add => Value::String(format!("{a}{b}")),
                InfixOp::Eq => Value::Boolean(a == b),
                InfixOp::NotEq => Value::Boolean(a != b),
                _ => self.error(RuntimeError::UnknownInfixOperator {
                    left: lv.value_type(),
                    op: op.as_str(),
                    right: rv.value_type(),
                }),
            }),
            _ => Ok(match op {
                InfixOp::Eq => Value::Boolean(lv.inspect() == rv.inspect()),
                InfixOp::NotEq => Value::Boolean(lv.inspect() != rv.inspect()),
                _ if lv.value_type() != rv.value_type() => {
                    self.error(RuntimeError::TypeMismatch {
                        left: lv.value_type(),
                        op: op.as_str(),
                        right: rv.value_type(),
                    })
                }
                _ => self.error(RuntimeError::UnknownInfixOperator {
                    left: lv.value_type(),
                    op: op.as_str(),
                    right: rv.value_type(),
                }),
            }),
        }
    }

    /// Integer arithmetic and comparison. Overflow and division by zero
    /// trap.
    fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> EvalResult<Value> {
        let arith = |result: Option<i64>| {
            result.map(Value::Integer).ok_or_else(|| {
                if op == InfixOp::Div && b == 0 {
                    EvalError::ArithmeticTrap("division by zero".into())
                } else {
                    EvalError::ArithmeticTrap(format!("integer overflow in {a} {op} {b}"))
                }
            })
        };
        match op {
            InfixOp::Add => arith(a.checked_add(b)),
            InfixOp::Sub => arith(a.checked_sub(b)),
            InfixOp::Mul => arith(a.checked_mul(b)),
            InfixOp::Div => arith(a.checked_div(b)),
            InfixOp::Less => Ok(Value::Boolean(a < b)),
            InfixOp::Greater => Ok(Value::Boolean(a > b)),
            InfixOp::Eq => Ok(Value::Boolean(a == b)),
            InfixOp::NotEq => Ok(Value::Boolean(a != b)),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    /// Apply an evaluated callee to evaluated arguments.
    pub fn apply(&mut self, callee: Value, args: Vec<Value>) -> EvalResult<Option<Value>> {
        match callee {
            Value::Function(func) => self.apply_function(&func, args),
            Value::Builtin(builtin) => {
                trace!(name = builtin.name(), args = args.len(), "apply builtin");
                let result = builtin.call(&args);
                if let Value::Error(err) = &result {
                    debug!(%err, "runtime error");
                }
                Ok(Some(result))
            }
            other => Ok(Some(self.error(RuntimeError::NotAFunction(other.value_type())))),
        }
    }

    /// Bind parameters by position in a child of the captured environment.
    /// Extra arguments are ignored; missing ones leave the parameter unbound.
    fn apply_function(&mut self, func: &Function, args: Vec<Value>) -> EvalResult<Option<Value>> {
        if self.depth >= self.config.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.config.max_call_depth));
        }
        trace!(
            params = func.literal.params.len(),
            args = args.len(),
            depth = self.depth,
            "apply function"
        );

        let call_env = Env::enclosed(&func.env);
        for (param, arg) in func.literal.params.iter().zip(args) {
            call_env.define(param.name.clone(), arg);
        }

        self.depth += 1;
        let result = self.eval_block(&func.literal.body, &call_env);
        self.depth -= 1;

        Ok(match result? {
            Some(Value::Return(inner)) => Some(*inner),
            other => other,
        })
    }

    fn error(&self, err: RuntimeError) -> Value {
        debug!(%err, "runtime error");
        Value::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_types::{Span, Token, TokenKind};

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Span::point(1, 1))
    }

    fn int(n: i64) -> Expr {
        Expr::new(ExprKind::Integer(n), tok(TokenKind::Int, &n.to_string()))
    }

    #[test]
    fn test_absent_expression_statement_has_no_result() {
        let stmt = Stmt::Expr(ExprStmt {
            token: tok(TokenKind::Illegal, "@"),
            expr: None,
        });
        let result = Evaluator::new().eval(Node::Stmt(&stmt), &Env::new()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_absent_operand_has_no_result() {
        let neg = Expr::new(
            ExprKind::Prefix {
                op: PrefixOp::Neg,
                operand: None,
            },
            tok(TokenKind::Minus, "-"),
        );
        let result = Evaluator::new().eval(Node::Expr(&neg), &Env::new()).unwrap();
        assert_eq!(result, None);

        let sum = Expr::new(
            ExprKind::Infix {
                left: Box::new(int(1)),
                op: InfixOp::Add,
                right: None,
            },
            tok(TokenKind::Plus, "+"),
        );
        let result = Evaluator::new().eval(Node::Expr(&sum), &Env::new()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_return_without_value_has_no_result() {
        let ret = Stmt::Return(ReturnStmt {
            token: tok(TokenKind::Return, "return"),
            value: None,
        });
        let result = Evaluator::new().eval(Node::Stmt(&ret), &Env::new()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_infix_on_literals() {
        let sum = Expr::new(
            ExprKind::Infix {
                left: Box::new(int(2)),
                op: InfixOp::Mul,
                right: Some(Box::new(int(21))),
            },
            tok(TokenKind::Asterisk, "*"),
        );
        let result = Evaluator::new().eval(Node::Expr(&sum), &Env::new()).unwrap();
        assert_eq!(result, Some(Value::Integer(42)));
    }

    #[test]
    fn test_integer_traps() {
        assert_eq!(
            Evaluator::eval_integer_infix(InfixOp::Div, 1, 0),
            Err(EvalError::ArithmeticTrap("division by zero".into()))
        );
        assert!(matches!(
            Evaluator::eval_integer_infix(InfixOp::Add, i64::MAX, 1),
            Err(EvalError::ArithmeticTrap(_))
        ));
        assert!(matches!(
            Evaluator::eval_integer_infix(InfixOp::Div, i64::MIN, -1),
            Err(EvalError::ArithmeticTrap(_))
        ));
        assert_eq!(
            Evaluator::eval_integer_infix(InfixOp::Div, -7, 2),
            Ok(Value::Integer(-3))
        );
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            Evaluator::new().config().max_call_depth,
            EvalConfig::DEFAULT_MAX_CALL_DEPTH
        );
    }
}
