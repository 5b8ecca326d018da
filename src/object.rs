//! Runtime value model.
//!
//! `Object` is Gorilla's only runtime value type. Every evaluation result,
//! including control-flow sentinels (`ReturnValue`, `Error`), is an `Object`
//! so they can travel through the same return slot as ordinary values;
//! `Eval` never reaches for `Result` to signal them (see `evaluator.rs`).
//!
//! Values are shared via `Rc`, not `Arc`. A single evaluation never spans
//! more than one thread, so atomic refcounting would only cost performance
//! for no benefit.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::BlockStatement;
use crate::builtins::BuiltinFn;
use crate::environment::Environment;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Rc<Object>>),
    /// Keyed by the derived `HashKey`; each entry also keeps the original
    /// key `Object` around so `inspect()` can render it back out.
    Hash(HashMap<HashKey, (Rc<Object>, Rc<Object>)>),
    Function {
        parameters: Vec<String>,
        body: Rc<BlockStatement>,
        env: Rc<RefCell<Environment>>,
    },
    Builtin(BuiltinFn),
    /// Wraps the value produced by a `return` statement so it can unwind
    /// through nested blocks without being unwrapped early; see
    /// `evaluator::eval_block_statement`.
    ReturnValue(Rc<Object>),
    Error(String),
}

impl Object {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function { .. } => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    /// Derive this value's `HashKey`, or `None` if it can't be used as one.
    /// Only integers, booleans, and strings are hashable, matching the set
    /// of values that have stable, content-based equality.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(n) => Some(HashKey::Integer(*n)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(n) => n.to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::String(s) => s.clone(),
            Object::Null => "null".to_string(),
            Object::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.inspect()).collect();
                format!("[{}]", items.join(", "))
            }
            Object::Hash(pairs) => {
                let mut items: Vec<String> = pairs
                    .values()
                    .map(|(key, value)| format!("{}: {}", key.inspect(), value.inspect()))
                    .collect();
                items.sort();
                format!("{{{}}}", items.join(", "))
            }
            Object::Function { parameters, body, .. } => {
                format!("fn({}) {{\n{}\n}}", parameters.join(", "), render_block(body))
            }
            Object::Builtin(_) => "builtin function".to_string(),
            Object::ReturnValue(value) => value.inspect(),
            Object::Error(message) => format!("ERROR: {message}"),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// Debug-style rendering of a function body for `inspect()`; Gorilla has no
/// canonical pretty-printer for the AST, so this is deliberately rough.
fn render_block(block: &BlockStatement) -> String {
    format!("{:?}", block.statements)
}

pub fn new_error(message: impl Into<String>) -> Rc<Object> {
    Rc::new(Object::Error(message.into()))
}

thread_local! {
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
    static NULL: Rc<Object> = Rc::new(Object::Null);
}

/// The canonical `true`/`false` instance. `==`/`!=` between anything that
/// isn't a pair of integers or a pair of strings is decided by `Rc`
/// identity (see `evaluator::eval_infix_expression`), so every `Boolean`
/// the evaluator produces MUST come from here rather than a fresh
/// `Rc::new(Object::Boolean(_))`, otherwise two `true`s built at different
/// call sites would compare unequal.
pub fn singleton_bool(value: bool) -> Rc<Object> {
    if value {
        TRUE.with(Rc::clone)
    } else {
        FALSE.with(Rc::clone)
    }
}

/// The canonical `null` instance, for the same identity-comparison reason
/// as [`singleton_bool`].
pub fn singleton_null() -> Rc<Object> {
    NULL.with(Rc::clone)
}
