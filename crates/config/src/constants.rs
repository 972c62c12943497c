//! Centralized constants for the gpm configuration engine.
//!
//! This module contains names and file locations shared across crates so the
//! user-facing contract (env var prefix, file names) lives in one place.

// =============================================================================
// Naming
// =============================================================================

/// Prefix prepended to every mangled setting name (`GPM_AI_MODEL`).
///
/// Changing this value renames every documented environment variable and is a
/// breaking change for users.
pub const ENV_PREFIX: &str = "GPM";

/// Application name used for platform configuration directories.
pub const APP_NAME: &str = "gpm";

/// Environment variable selecting the active environment (`dev`, `prod`, ...).
pub const ACTIVE_ENV_VAR: &str = "GPM_ENV";

/// Environment variable overriding the global settings file location.
pub const SETTINGS_PATH_VAR: &str = "GPM_SETTINGS_PATH";

/// Environment variable that disables the optional dotenv cascade when `1`/`true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Files
// =============================================================================

/// Project document file name, resolved relative to the working directory.
pub const PROJECT_FILE_NAME: &str = "gpm.yaml";

/// Global settings file name inside the user configuration directory.
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Base dotenv file name.
pub const DOTENV_FILE_NAME: &str = ".env";

/// Suffix appended to dotenv names for machine-local overrides.
pub const DOTENV_LOCAL_SUFFIX: &str = ".local";

// =============================================================================
// Scoped sections
// =============================================================================

/// Key of the unscoped file pattern list in the project document.
pub const FILES_KEY: &str = "files";

/// Key of the unscoped settings map in the project document.
pub const SETTINGS_KEY: &str = "settings";

/// Separator between a section key and the environment name (`settings:prod`).
pub const SCOPE_SEPARATOR: char = ':';
