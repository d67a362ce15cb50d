//! Vela tree-walking evaluator.
//!
//! Executes programs directly from the AST. Language-level failures are
//! ordinary [`Value::Error`] values; only host-level traps surface as
//! [`EvalError`].

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod value;

pub use builtins::Builtin;
pub use env::Env;
pub use error::{EvalError, EvalResult, RuntimeError};
pub use evaluator::{EvalConfig, Evaluator};
pub use value::{Function, Value, ValueType};
