//! The lexically-nested name -> value environment that backs variable
//! lookup, assignment, and closures (§3, §4.4).

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::token::Token;
use crate::value::Value;

struct EnvironmentData {
    values: RefCell<AHashMap<String, Value>>,
    parent: Option<Scope>,
}

/// A shared handle to one environment frame. Cloning a `Scope` clones the
/// `Rc`, not the bindings — this is what lets a closure and the scope it
/// was captured from observe each other's later mutations (scenario #2 in
/// §8).
#[derive(Clone)]
pub struct Scope(Rc<EnvironmentData>);

impl Scope {
    /// Create a fresh root environment with no parent — used once for the
    /// interpreter's global scope.
    pub fn new_global() -> Self {
        Self(Rc::new(EnvironmentData {
            values: RefCell::new(AHashMap::default()),
            parent: None,
        }))
    }

    /// Create a fresh child of `self`. Used for block bodies, `for` loop
    /// bodies, and function call activation records.
    pub fn child(&self) -> Self {
        Self(Rc::new(EnvironmentData {
            values: RefCell::new(AHashMap::default()),
            parent: Some(self.clone()),
        }))
    }

    /// Unconditionally bind `name` in this scope, shadowing any existing
    /// binding of the same name in this scope (§4.4).
    pub fn define(&self, name: &str, value: Value) {
        self.0.values.borrow_mut().insert(name.to_owned(), value);
    }

    /// Look up `name_token`'s lexeme, walking outward through enclosing
    /// scopes. Fails with `未定义的变量 'name'` attributed to the token.
    pub fn get(&self, name_token: &Token) -> Result<Value, RuntimeError> {
        let mut env = self;
        let owned;
        loop {
            if let Some(value) = env.0.values.borrow().get(&name_token.lexeme) {
                return Ok(value.clone());
            }
            match &env.0.parent {
                Some(parent) => {
                    owned = parent.clone();
                    env = &owned;
                }
                None => {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::UndefinedVariable(name_token.lexeme.clone()),
                        name_token.position,
                    ));
                }
            }
        }
    }

    /// Overwrite the nearest enclosing binding of `name_token`'s lexeme.
    /// Never creates a new binding (§4.4); fails the same way as [`get`].
    ///
    /// [`get`]: Scope::get
    pub fn assign(&self, name_token: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut env = self;
        let owned;
        loop {
            let mut values = env.0.values.borrow_mut();
            if values.contains_key(&name_token.lexeme) {
                values.insert(name_token.lexeme.clone(), value);
                return Ok(());
            }
            drop(values);
            match &env.0.parent {
                Some(parent) => {
                    owned = parent.clone();
                    env = &owned;
                }
                None => {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::UndefinedVariable(name_token.lexeme.clone()),
                        name_token.position,
                    ));
                }
            }
        }
    }
}
