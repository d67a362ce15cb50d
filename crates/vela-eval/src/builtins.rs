//! Host-provided functions reachable by name.
//!
//! The table is consulted only after a name misses in the environment
//! chain, so user bindings shadow built-ins.

use crate::error::RuntimeError;
use crate::value::Value;

/// A built-in function.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: fn(&[Value]) -> Value,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the built-in with already-evaluated arguments.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

const BUILTINS: &[Builtin] = &[Builtin {
    name: "length",
    func: length,
}];

/// Find a built-in by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

/// Names of every built-in, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

/// `length(s)`: number of characters in a string.
fn length(args: &[Value]) -> Value {
    let [arg] = args else {
        return RuntimeError::WrongArgumentCount {
            name: "length",
            got: args.len(),
            want: 1,
        }
        .into();
    };
    match arg {
        Value::String(s) => Value::Integer(s.chars().count() as i64),
        other => RuntimeError::UnsupportedArgument {
            name: "length",
            got: other.value_type(),
        }
        .into(),
    }
}
