//! Path helpers for user-level configuration locations.
//!
//! Responsibilities:
//! - Determine the user configuration directory and the settings file path.
//! - Use `directories` crate for platform-appropriate paths.
//! - Expand a leading `~` in user-supplied paths.
//!
//! Does NOT handle:
//! - File I/O operations.

use std::path::PathBuf;

use crate::constants::{APP_NAME, SETTINGS_FILE_NAME};
use crate::loader::ConfigError;

/// Returns the user configuration directory for gpm.
///
/// - Linux: `~/.config/gpm`
/// - macOS: `~/Library/Application Support/gpm`
/// - Windows: `%AppData%\gpm\config`
///
/// This directory holds both the global settings file and the user-wide `.env`.
pub fn user_config_dir() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
        ConfigError::ConfigDirUnavailable("no home directory for the current user".to_string())
    })?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Returns the documented path of the global settings file.
pub fn default_settings_path() -> Result<PathBuf, anyhow::Error> {
    Ok(user_config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Expand `~` and `~/...` against the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory can be
/// determined, are returned unchanged.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some("") => "",
        Some(rest) => match rest.strip_prefix(['/', '\\']) {
            Some(rest) => rest,
            // `~user` is not expanded
            None => return PathBuf::from(raw),
        },
        None => return PathBuf::from(raw),
    };

    match directories::BaseDirs::new() {
        Some(base) if rest.is_empty() => base.home_dir().to_path_buf(),
        Some(base) => base.home_dir().join(rest),
        None => PathBuf::from(raw),
    }
}
