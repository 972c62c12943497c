//! gpm - developer toolchain wrapper.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Run the configuration startup sequence (env files, documents, resolver).
//! - Execute the requested command and map failures to exit codes.
//!
//! Does NOT handle:
//! - Setting resolution rules (see `crates/config`).
//!
//! Invariants:
//! - Env files are loaded before any document is parsed; the resolver is built
//!   only after both documents are available.
//! - Logging goes to stderr so command output on stdout stays scriptable.

mod args;
mod commands;
mod context;
mod dispatch;
mod error;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = match context::bootstrap(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    };

    let exit_code = match run_command(cli, &ctx) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
