//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `context` module).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::context::CommandContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli, ctx: &CommandContext) -> Result<()> {
    match cli.command {
        Commands::Config { command } => commands::config::run(command, ctx, cli.output),
    }
}
