//! `gorilla`: run a script file, or start an interactive REPL if none is given.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use tracing::{debug, info};

use gorilla::builtins::{BuiltinsRegistry, StdoutSink};
use gorilla::{run_with_env, Environment, RunOutcome};

const GORILLA_FACE: &str = "🦍";

#[derive(ClapParser)]
#[command(name = "gorilla")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gorilla programming language: run a script or start a REPL", long_about = None)]
struct Args {
    /// Script file to run. Starts an interactive REPL when omitted.
    file: Option<PathBuf>,

    /// Emit tracing diagnostics (set RUST_LOG to control verbosity further).
    #[arg(long)]
    trace: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.trace);

    let exit_code = match args.file {
        Some(path) => run_file(&path),
        None => run_repl(),
    };

    process::exit(exit_code);
}

fn init_tracing(trace: bool) {
    let default_level = if trace { "gorilla=trace" } else { "gorilla=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_file(path: &PathBuf) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{GORILLA_FACE} couldn't read {}: {err}", path.display());
            return 1;
        }
    };

    info!(file = %path.display(), "running script");

    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = StdoutSink;

    match run_with_env(&source, &env, &registry, &mut sink) {
        RunOutcome::Evaluated(result) => {
            debug!(result = %result.inspect(), "script finished");
            if result.is_error() {
                eprintln!("{}", result.inspect());
                1
            } else {
                0
            }
        }
        RunOutcome::ParseFailed(errors) => {
            print_parser_errors(&errors);
            1
        }
    }
}

fn run_repl() -> i32 {
    println!("{GORILLA_FACE} Welcome to the Gorilla programming language!");
    println!("Feel free to type in commands.");

    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = StdoutSink;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!(">> ");
        if stdout.flush().is_err() {
            return 1;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return 0, // EOF (Ctrl-D)
            Ok(_) => {}
            Err(err) => {
                eprintln!("error reading input: {err}");
                return 1;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match run_with_env(&line, &env, &registry, &mut sink) {
            RunOutcome::Evaluated(result) => println!("{}", result.inspect()),
            RunOutcome::ParseFailed(errors) => print_parser_errors(&errors),
        }
    }
}

fn print_parser_errors(errors: &[gorilla::ParseError]) {
    eprintln!("{GORILLA_FACE}");
    eprintln!("Woops! We ran into some gorilla business here!");
    eprintln!(" parser errors:");
    for err in errors {
        eprintln!("\t{err}");
    }
}
