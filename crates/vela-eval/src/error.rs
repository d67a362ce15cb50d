//! Runtime error types for the Vela evaluator.

use crate::value::ValueType;

/// A language-level runtime error.
///
/// These never abort evaluation from the host's point of view: they travel
/// as [`crate::Value::Error`] and short-circuit every enclosing block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: ValueType,
        op: &'static str,
        right: ValueType,
    },
    #[error("unknown operator: {op} {operand}")]
    UnknownPrefixOperator { op: &'static str, operand: ValueType },
    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: ValueType,
        op: &'static str,
        right: ValueType,
    },
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("not a function: {0}")]
    NotAFunction(ValueType),
    #[error("incorrect number of arguments to `{name}`: got {got}, want {want}")]
    WrongArgumentCount {
        name: &'static str,
        got: usize,
        want: usize,
    },
    #[error("argument not supported by `{name}`: got {got}")]
    UnsupportedArgument { name: &'static str, got: ValueType },
}

/// Host-level evaluation failure. Aborts the whole evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Division by zero or 64-bit integer overflow.
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),
    /// Nested function calls went deeper than the configured limit.
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
