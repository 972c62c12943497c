//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse the global startup options (environment, env files, document paths).
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load env files or documents (see `context` module).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gpm_config::constants::{ACTIVE_ENV_VAR, SETTINGS_PATH_VAR};

use crate::commands;

#[derive(Parser)]
#[command(name = "gpm")]
#[command(about = "gpm - developer toolchain wrapper", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  gpm config get ai.model\n  gpm --env prod config explain ai.chat.temperature\n  gpm --env-file ci.env config get install.path\n  gpm config vars\n"
)]
pub struct Cli {
    /// Active environment; selects `.env.<ENV>` files and `settings:<ENV>` sections
    #[arg(short, long, global = true, env = ACTIVE_ENV_VAR, value_name = "ENV")]
    pub env: Option<String>,

    /// Extra env file to load after the standard cascade (repeatable, must exist)
    #[arg(long = "env-file", global = true, value_name = "FILE")]
    pub env_files: Vec<PathBuf>,

    /// Path to the project document (defaults to ./gpm.yaml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Path to the global settings file (overrides the default location)
    #[arg(long, global = true, env = SETTINGS_PATH_VAR, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The active environment name; empty when none was selected.
    pub fn environment(&self) -> &str {
        self.env.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect how settings are resolved
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommand,
    },
}
