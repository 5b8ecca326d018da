//! Lexically-scoped variable bindings.
//!
//! Each `Environment` is one scope. Only a function call creates a new scope
//! enclosing the one it was defined in; `if` and `while` bodies evaluate
//! directly against the caller's environment, so a `let` inside one of those
//! bodies binds into the surrounding scope rather than a throwaway child.
//! Lookups walk outward through `outer` until a binding is found or every
//! scope is exhausted. Wrapping each scope in `Rc<RefCell<_>>` is what lets a
//! `Function` value capture its defining scope by reference and keep it
//! alive after the enclosing call returns. That's how closures work.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Rc<Object>>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            outer: None,
        }))
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        match self.store.get(name) {
            Some(value) => Some(Rc::clone(value)),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: Rc<Object>) {
        self.store.insert(name.into(), value);
    }
}
