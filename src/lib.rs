//! Gorilla: a small dynamically-typed scripting language.
//!
//! The crate is organized as a conventional interpreter pipeline:
//! [`lexer`] turns source text into [`token`]s, [`parser`] turns tokens into
//! an [`ast`], and [`evaluator`] walks the AST against an [`environment`] and
//! a [`builtins`] registry to produce [`object::Object`] values. [`run`] and
//! [`run_with_env`] wire the pipeline together for callers that just want
//! to execute a script.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use std::cell::RefCell;
use std::rc::Rc;

pub use environment::Environment;
pub use error::ParseError;
pub use object::Object;

use builtins::{BuiltinsRegistry, OutputSink, StdoutSink};
use parser::Parser;

/// The outcome of running a script: either it parsed and evaluated to an
/// `Object` (which may itself be `Object::Error` if evaluation failed), or
/// it never got that far because parsing rejected the source text.
#[derive(Debug)]
pub enum RunOutcome {
    Evaluated(Rc<Object>),
    ParseFailed(Vec<ParseError>),
}

/// Parse and evaluate `source` against a fresh global environment and the
/// core builtins, writing any `puts` output to stdout.
pub fn run(source: &str) -> RunOutcome {
    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = StdoutSink;
    run_with_env(source, &env, &registry, &mut sink)
}

/// Like [`run`], but lets the caller supply the environment, builtin
/// registry, and output sink. The REPL uses this to keep one environment
/// alive across lines; embedders use it to capture output or expose
/// custom builtins.
pub fn run_with_env(
    source: &str,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> RunOutcome {
    match Parser::from_source(source).parse_program() {
        Ok(program) => RunOutcome::Evaluated(evaluator::eval_program(&program, env, registry, sink)),
        Err(errors) => RunOutcome::ParseFailed(errors),
    }
}
