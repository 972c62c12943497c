//! Startup sequence for command execution.
//!
//! Responsibilities:
//! - Load the env-file cascade into the process environment.
//! - Parse the project document and the global settings file.
//! - Build the `SettingResolver` every command consults.
//!
//! Does NOT handle:
//! - CLI argument definitions (see `args` module).
//! - Rendering command output (see `commands`).
//!
//! Invariants:
//! - Env files are loaded before any document is parsed and before the
//!   resolver exists; this order must not change.
//! - The process environment is only written here, before any thread exists.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use gpm_config::constants::PROJECT_FILE_NAME;
use gpm_config::{
    ConfigDocument, EnvFile, EnvFileLoader, GlobalSettings, ProcessEnv, SettingResolver, paths,
};

use crate::args::Cli;

/// Everything a command needs after startup.
pub(crate) struct CommandContext {
    pub resolver: SettingResolver,
    /// Candidate env files, in load order.
    pub env_files: Vec<EnvFile>,
    /// Env files that were actually applied.
    pub loaded_env_files: Vec<PathBuf>,
    pub settings_path: Option<PathBuf>,
}

/// Run the startup sequence for `cli`.
pub(crate) fn bootstrap(cli: &Cli) -> Result<CommandContext> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let environment = cli.environment().to_string();

    let project_root = project_root(cli.project.as_deref(), &cwd);
    let mut loader = EnvFileLoader::new(&project_root)
        .with_environment(environment.clone())
        .with_overrides(cli.env_files.iter().cloned());
    match paths::user_config_dir() {
        Ok(dir) => loader = loader.with_home_base(dir),
        Err(e) => tracing::warn!(error = %e, "No user config directory, skipping home .env"),
    }

    let loaded_env_files = loader
        .load(&mut ProcessEnv)
        .context("Failed to load env files")?;

    let project = match &cli.project {
        Some(path) => Some(ConfigDocument::load(path).context("Failed to load project document")?),
        None => ConfigDocument::discover(&cwd).context("Failed to load project document")?,
    };

    let settings_path = match &cli.settings {
        Some(path) => Some(path.clone()),
        None => match paths::default_settings_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "No user config directory, skipping global settings");
                None
            }
        },
    };
    let global = match &settings_path {
        Some(path) => GlobalSettings::load(path).context("Failed to load global settings")?,
        None => GlobalSettings::default(),
    };

    tracing::debug!(
        environment = %environment,
        env_files = loaded_env_files.len(),
        project = project.is_some(),
        "Configuration loaded"
    );

    let resolver = SettingResolver::new()
        .with_project(project)
        .with_global(global)
        .with_environment(environment);

    Ok(CommandContext {
        resolver,
        env_files: loader.candidates(),
        loaded_env_files,
        settings_path,
    })
}

/// `.env` files live next to the project document, or in the working directory.
fn project_root(project: Option<&Path>, cwd: &Path) -> PathBuf {
    match project.and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}

/// Default project document location, for messages.
pub(crate) fn default_project_path(cwd: &Path) -> PathBuf {
    cwd.join(PROJECT_FILE_NAME)
}
