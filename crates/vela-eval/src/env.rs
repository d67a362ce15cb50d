//! Lexically scoped variable environment.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// A single scope level with a link to the scope it is nested in.
struct Scope {
    bindings: BTreeMap<String, Value>,
    outer: Option<Env>,
}

/// A shared handle to a scope.
///
/// Cloning the handle shares the scope, which is how function values keep
/// their defining environment alive. Lookups walk outward through the
/// chain; `define` always writes to the innermost scope.
///
/// A function bound in the scope it captured (`var f = function...`) forms
/// an `Rc` cycle. Hosts call [`Env::clear`] on the top-level scope once a
/// run is finished to release it. Cycles formed inside call scopes are not
/// reclaimed.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// Create a top-level environment.
    pub fn new() -> Self {
        Self::with_outer(None)
    }

    /// Create a child scope of `outer`.
    pub fn enclosed(outer: &Env) -> Self {
        Self::with_outer(Some(outer.clone()))
    }

    fn with_outer(outer: Option<Env>) -> Self {
        Env(Rc::new(RefCell::new(Scope {
            bindings: BTreeMap::new(),
            outer,
        })))
    }

    /// Look up a variable, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Drop every binding in this scope.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut self.0.borrow_mut().bindings);
        drop(bindings);
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Env")
            .field("names", &scope.bindings.keys().collect::<Vec<_>>())
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Function;
    use vela_types::ast::{Block, FunctionLiteral};
    use vela_types::{Span, Token, TokenKind};

    #[test]
    fn test_define_and_get() {
        let env = Env::new();
        env.define("x", Value::Integer(5));
        assert_eq!(env.get("x"), Some(Value::Integer(5)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_lookup_walks_outward() {
        let outer = Env::new();
        outer.define("x", Value::Integer(1));
        let inner = Env::enclosed(&outer);
        inner.define("y", Value::Integer(2));
        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
        assert_eq!(inner.get("y"), Some(Value::Integer(2)));
        assert_eq!(outer.get("y"), None);
    }

    #[test]
    fn test_define_shadows_in_innermost_scope() {
        let outer = Env::new();
        outer.define("x", Value::Integer(1));
        let inner = Env::enclosed(&outer);
        inner.define("x", Value::Integer(2));
        assert_eq!(inner.get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_clones_share_scope() {
        let env = Env::new();
        let alias = env.clone();
        alias.define("z", Value::Boolean(true));
        assert_eq!(env.get("z"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_clear_releases_self_captured_function() {
        let env = Env::new();
        let literal = FunctionLiteral {
            params: Vec::new(),
            body: Block {
                token: Token::new(TokenKind::LBrace, "{", Span::point(1, 1)),
                statements: Vec::new(),
            },
        };
        let func = Function {
            literal: Rc::new(literal),
            env: env.clone(),
        };
        env.define("f", Value::Function(Rc::new(func)));

        let scope = Rc::downgrade(&env.0);
        env.clear();
        assert_eq!(env.get("f"), None);
        drop(env);
        assert!(scope.upgrade().is_none());
    }
}
