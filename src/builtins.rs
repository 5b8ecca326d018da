//! Builtin functions and the registry that exposes them to the evaluator.
//!
//! Builtins are looked up by name through a `BuiltinsRegistry` rather than
//! hard-coded into `eval_call_expression`, so embedders can add or replace
//! builtins without touching the evaluator. `puts` writes through an
//! injected `OutputSink` instead of directly to stdout, which is what makes
//! it possible to capture and assert on its output in tests.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::object::{self, new_error, Object};

/// Where builtins that produce output (currently just `puts`) send it.
pub trait OutputSink {
    fn write_line(&mut self, line: &str);
}

/// Writes to the process's standard output; used by the REPL and file driver.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Captures lines in memory; used by tests and embedders that want to
/// inspect a script's output instead of letting it hit the terminal.
#[derive(Debug, Default)]
pub struct CapturingSink {
    pub lines: Vec<String>,
}

impl OutputSink for CapturingSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

type BuiltinImpl = dyn Fn(&[Rc<Object>], &mut dyn OutputSink) -> Rc<Object>;

/// A callable builtin. Wraps an `Rc<dyn Fn>` so `Object::Builtin` can be
/// cheaply cloned like every other `Object` variant.
#[derive(Clone)]
pub struct BuiltinFn(Rc<BuiltinImpl>);

impl BuiltinFn {
    pub fn new(f: impl Fn(&[Rc<Object>], &mut dyn OutputSink) -> Rc<Object> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[Rc<Object>], sink: &mut dyn OutputSink) -> Rc<Object> {
        (self.0)(args, sink)
    }
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<builtin function>")
    }
}

/// Something that contributes builtins to a `BuiltinsRegistry`. Splitting
/// this out from the registry itself lets an embedder define its own
/// domain-specific builtins (see `demos/`) and register them alongside the
/// core set without forking the registry type.
pub trait BuiltinsProvider {
    fn builtins(&self) -> Vec<(&'static str, BuiltinFn)>;
}

/// The core builtins every Gorilla program gets for free: `len`, `first`,
/// `last`, `rest`, `push`, and `puts`.
pub struct CoreBuiltinsProvider;

fn arity_error(got: usize, want: usize) -> Rc<Object> {
    new_error(format!("wrong number of arguments. got={got}, want={want}"))
}

impl BuiltinsProvider for CoreBuiltinsProvider {
    fn builtins(&self) -> Vec<(&'static str, BuiltinFn)> {
        vec![
            ("len", BuiltinFn::new(builtin_len)),
            ("first", BuiltinFn::new(builtin_first)),
            ("last", BuiltinFn::new(builtin_last)),
            ("rest", BuiltinFn::new(builtin_rest)),
            ("push", BuiltinFn::new(builtin_push)),
            ("puts", BuiltinFn::new(builtin_puts)),
        ]
    }
}

fn builtin_len(args: &[Rc<Object>], _sink: &mut dyn OutputSink) -> Rc<Object> {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match args[0].as_ref() {
        Object::String(s) => Rc::new(Object::Integer(s.len() as i64)),
        Object::Array(elements) => Rc::new(Object::Integer(elements.len() as i64)),
        other => new_error(format!("argument to `len` not supported, got {}", other.type_tag())),
    }
}

fn builtin_first(args: &[Rc<Object>], _sink: &mut dyn OutputSink) -> Rc<Object> {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match args[0].as_ref() {
        Object::Array(elements) => elements.first().cloned().unwrap_or_else(object::singleton_null),
        other => new_error(format!("argument to `first` must be ARRAY, got {}", other.type_tag())),
    }
}

fn builtin_last(args: &[Rc<Object>], _sink: &mut dyn OutputSink) -> Rc<Object> {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match args[0].as_ref() {
        Object::Array(elements) => elements.last().cloned().unwrap_or_else(object::singleton_null),
        other => new_error(format!("argument to `last` must be ARRAY, got {}", other.type_tag())),
    }
}

fn builtin_rest(args: &[Rc<Object>], _sink: &mut dyn OutputSink) -> Rc<Object> {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match args[0].as_ref() {
        Object::Array(elements) => {
            if elements.is_empty() {
                object::singleton_null()
            } else {
                Rc::new(Object::Array(elements[1..].to_vec()))
            }
        }
        other => new_error(format!("argument to `rest` must be ARRAY, got {}", other.type_tag())),
    }
}

fn builtin_push(args: &[Rc<Object>], _sink: &mut dyn OutputSink) -> Rc<Object> {
    if args.len() != 2 {
        return arity_error(args.len(), 2);
    }
    match args[0].as_ref() {
        Object::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.push(Rc::clone(&args[1]));
            Rc::new(Object::Array(new_elements))
        }
        other => new_error(format!("argument to `push` must be ARRAY, got {}", other.type_tag())),
    }
}

fn builtin_puts(args: &[Rc<Object>], sink: &mut dyn OutputSink) -> Rc<Object> {
    for arg in args {
        sink.write_line(&arg.inspect());
    }
    object::singleton_null()
}

/// Name-to-builtin lookup table used by the evaluator when a called
/// identifier doesn't resolve to a user-defined function.
#[derive(Default)]
pub struct BuiltinsRegistry {
    builtins: HashMap<&'static str, BuiltinFn>,
}

impl BuiltinsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with `CoreBuiltinsProvider`'s builtins.
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        registry.register_provider(&CoreBuiltinsProvider);
        registry
    }

    pub fn register_provider(&mut self, provider: &dyn BuiltinsProvider) {
        for (name, f) in provider.builtins() {
            self.builtins.insert(name, f);
        }
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinFn> {
        self.builtins.get(name)
    }
}
