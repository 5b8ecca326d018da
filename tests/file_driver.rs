//! Exercises the same pipeline the `gorilla` binary's file mode drives,
//! reading a script from disk through a temp file rather than a string
//! literal — the thing a real invocation of `gorilla script.gor` does.

use std::io::Write;

use gorilla::builtins::{BuiltinsRegistry, CapturingSink};
use gorilla::{run_with_env, Environment, RunOutcome};

#[test]
fn runs_a_script_loaded_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        r#"
        let greet = fn(name) {{ "Hello, " + name + "!" }};
        greet("Gorilla")
        "#
    )
    .expect("write script");

    let source = std::fs::read_to_string(file.path()).expect("read script back");

    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = CapturingSink::default();

    match run_with_env(&source, &env, &registry, &mut sink) {
        RunOutcome::Evaluated(result) => assert_eq!(result.inspect(), "Hello, Gorilla!"),
        RunOutcome::ParseFailed(errors) => panic!("unexpected parse errors: {errors:?}"),
    }
}

#[test]
fn a_script_with_a_runtime_error_yields_an_error_object_not_a_panic() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(file, "let x = 5; x()").expect("write script");

    let source = std::fs::read_to_string(file.path()).expect("read script back");

    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = CapturingSink::default();

    match run_with_env(&source, &env, &registry, &mut sink) {
        RunOutcome::Evaluated(result) => assert_eq!(result.inspect(), "ERROR: not a function: INTEGER"),
        RunOutcome::ParseFailed(errors) => panic!("unexpected parse errors: {errors:?}"),
    }
}
