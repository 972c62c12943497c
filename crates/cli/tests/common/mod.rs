//! Shared test utilities for gpm integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory rooted in a temporary directory.
//!
//! Invariants / Assumptions:
//! - The user config directory and the global settings file point inside the
//!   temporary directory, so the host's `~/.config/gpm` is never read.
//! - Every documented `GPM_*` variable is cleared before the test adds its own.

use assert_cmd::Command;
use gpm_config::catalog::KNOWN_SETTINGS;
use gpm_config::constants::{ACTIVE_ENV_VAR, DOTENV_DISABLED_VAR, SETTINGS_PATH_VAR};
use std::path::Path;

/// Returns a hermetic `gpm` command running in `dir`.
///
/// Dotenv loading stays enabled; tests that need it off set
/// `DOTENV_DISABLED` themselves.
pub fn gpm_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gpm");
    cmd.current_dir(dir);

    let home = dir.join("home");
    cmd.env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env(SETTINGS_PATH_VAR, dir.join("settings.yaml"));

    cmd.env_remove(ACTIVE_ENV_VAR)
        .env_remove(DOTENV_DISABLED_VAR)
        .env_remove("RUST_LOG");
    for setting in KNOWN_SETTINGS {
        cmd.env_remove(setting.env_var());
    }

    cmd
}
