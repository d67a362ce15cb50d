//! Runtime values.

use std::fmt;
use std::rc::Rc;

use vela_types::ast::FunctionLiteral;

use crate::builtins::Builtin;
use crate::env::Env;
use crate::error::RuntimeError;

/// The type tag of a [`Value`], as printed in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Boolean,
    String,
    Null,
    Return,
    Error,
    Function,
    Builtin,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "INTEGER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::String => "STRING",
            ValueType::Null => "NULL",
            ValueType::Return => "RETURN",
            ValueType::Error => "ERROR",
            ValueType::Function => "FUNCTION",
            ValueType::Builtin => "BUILTIN",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined function closed over its defining environment.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    /// Carries an early `return` out of nested blocks. Unwrapped by the
    /// nearest function call or by the program.
    Return(Box<Value>),
    Error(RuntimeError),
    Function(Rc<Function>),
    Builtin(Builtin),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Boolean(_) => ValueType::Boolean,
            Value::String(_) => ValueType::String,
            Value::Null => ValueType::Null,
            Value::Return(_) => ValueType::Return,
            Value::Error(_) => ValueType::Error,
            Value::Function(_) => ValueType::Function,
            Value::Builtin(_) => ValueType::Builtin,
        }
    }

    /// `null` and `false` are falsy; everything else, `0` and `""` included,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `true` for values that stop a statement sequence: return signals and
    /// errors.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Return(_) | Value::Error(_))
    }

    /// Printable form shown to the host.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
            Value::Return(inner) => inner.fmt(f),
            Value::Error(err) => write!(f, "Error {err}"),
            Value::Function(func) => {
                let params: Vec<&str> = func.literal.params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "function({}) {{\n{}\n}}", params.join(", "), func.literal.body)
            }
            Value::Builtin(_) => f.write_str("builtin function"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Null => f.write_str("Null"),
            Value::Return(inner) => f.debug_tuple("Return").field(inner).finish(),
            Value::Error(err) => f.debug_tuple("Error").field(err).finish(),
            // The captured environment may contain this very function.
            Value::Function(_) => write!(f, "Function({self})"),
            Value::Builtin(b) => f.debug_tuple("Builtin").field(&b.name()).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<RuntimeError> for Value {
    fn from(err: RuntimeError) -> Self {
        Value::Error(err)
    }
}
