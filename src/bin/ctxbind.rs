//! CLI wrapper for the ctxbind snippet engine.
//!
//! Usage:
//!   ctxbind <file.js>              # Execute a snippet file
//!   ctxbind -e "code"              # Evaluate a snippet
//!   ctxbind                        # Start REPL (interactive mode)

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::thread;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ctxbind::runner::api::Engine;
use ctxbind::runner::ds::value::JsValue;
use ctxbind::runner::plugin::config::{EngineConfig, ReceiverPolicy};
use ctxbind::runner::std_lib::console::inspect;

/// Stack for the evaluation thread, enough for `MAX_CALL_DEPTH_LIMIT` frames.
const EVAL_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "ctxbind")]
#[command(about = "Run snippets that explore call, apply and bind")]
struct Args {
    /// Snippet file to execute
    file: Option<PathBuf>,

    /// Evaluate CODE and print its value
    #[arg(short, long, value_name = "CODE", conflicts_with = "file")]
    eval: Option<String>,

    /// Engine configuration (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// What to do when no receiver is supplied
    #[arg(long, value_enum)]
    receiver_policy: Option<ReceiverPolicy>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(policy) = args.receiver_policy {
        config = config.with_receiver_policy(policy);
    }

    let worker = thread::Builder::new()
        .name("ctxbind-eval".to_string())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(move || {
            let mut engine = Engine::new(config);
            match (&args.file, &args.eval) {
                (Some(file), _) => run_file(&mut engine, file),
                (None, Some(code)) => eval_code(&mut engine, code),
                (None, None) => run_repl(&mut engine),
            }
        });
    match worker {
        Ok(handle) => {
            if handle.join().is_err() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to start evaluation thread: {}", e);
            process::exit(1);
        }
    }
}

fn run_file(engine: &mut Engine, filename: &PathBuf) {
    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename.display(), e);
            process::exit(1);
        }
    };
    if let Err(e) = engine.eval(&source) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn eval_code(engine: &mut Engine, code: &str) {
    match engine.eval(code) {
        Ok(JsValue::Undefined) => {}
        Ok(value) => println!("{}", inspect(&value)),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run_repl(engine: &mut Engine) {
    println!("ctxbind v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a snippet and press Enter. Type .exit to quit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => break, // EOF
        };

        let input = input.trim();
        if input == ".exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match engine.eval(input) {
            Ok(JsValue::Undefined) => {}
            Ok(value) => println!("{}", inspect(&value)),
            Err(e) => eprintln!("{}", e),
        }
    }
}
