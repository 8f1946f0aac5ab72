//! The CLI/REPL front-end (§6). Deliberately thin: it owns process exit
//! codes, file/stdin I/O, and diagnostic coloring, and delegates all
//! language semantics to [`vscript::run`].

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use vscript::interpreter::Interpreter;

/// A tree-walking interpreter for VScript.
#[derive(Parser)]
#[command(name = "vscript", version)]
struct Cli {
    /// Script file to run. Omit to start an interactive REPL.
    path: Option<PathBuf>,
}

const EXIT_USAGE: u8 = 64;
const EXIT_IO: u8 = 70;

fn main() -> ExitCode {
    init_logging();

    // §6: "Two or more [arguments] → print usage and exit 64." `clap`
    // itself rejects extra positionals; we only need to map that rejection
    // onto the spec's bit-exact exit code instead of clap's own usage exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match cli.path {
        Some(path) => run_file(&path),
        None => {
            run_repl();
            ExitCode::SUCCESS
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_file(path: &PathBuf) -> ExitCode {
    // §6: a file read failure is its own exit code (70), distinct from a
    // language error (non-zero via `ExitCode::FAILURE`) and from a startup
    // panic (1). `anyhow::Context` only carries the message through to the
    // `report_io_error` branch below — it does not change which branch fires.
    let source = match std::fs::read_to_string(path)
        .with_context(|| format!("无法读取文件 '{}'", path.display()))
    {
        Ok(source) => source,
        Err(err) => {
            report_io_error(&err);
            return ExitCode::from(EXIT_IO);
        }
    };

    let interpreter = Interpreter::new();
    match vscript::run(&interpreter, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_io_error(err: &anyhow::Error) {
    eprintln!("{}", format!("{err:#}").red());
}

const REPL_QUIT: &str = ".退出";

fn run_repl() {
    let interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF (Ctrl-D)
            Ok(_) => {}
            Err(_) => break,
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == REPL_QUIT {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        if let Err(err) = vscript::run(&interpreter, trimmed) {
            report(&err);
        }
    }
}

fn report(err: &vscript::VScriptError) {
    eprintln!("{}", err.to_string().red());
}
