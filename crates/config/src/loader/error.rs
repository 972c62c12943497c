//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for env-file and document loading failures.
//!
//! Does NOT handle:
//! - Setting resolution failures: resolution never fails, it falls back to
//!   the caller's default (see `resolver`).
//! - Dot-path type mismatches (see `types::node::TypeMismatch`).
//!
//! Invariants:
//! - All error variants include the offending path.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading env files and documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An env file passed explicitly with `--env-file` does not exist.
    #[error("Env file not found: {}", path.display())]
    EnvFileNotFound { path: PathBuf },

    /// Failed to parse a `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse env file {} at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip optional .env loading",
        path.display()
    )]
    DotenvParse { path: PathBuf, error_index: usize },

    /// Failed to read a `.env` file due to an I/O error.
    #[error("Failed to read env file {}: {kind}", path.display())]
    DotenvIo { path: PathBuf, kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load env file {}", path.display())]
    DotenvUnknown { path: PathBuf },

    #[error("Failed to read config document at {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config document at {}: {source}", path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),
}

impl ConfigError {
    /// Attach a path to a dotenvy error without carrying any line content.
    pub(crate) fn from_dotenv(path: PathBuf, error: dotenvy::Error) -> Self {
        match error {
            dotenvy::Error::LineParse(_, error_index) => {
                ConfigError::DotenvParse { path, error_index }
            }
            dotenvy::Error::Io(io_err) if io_err.kind() == ErrorKind::NotFound => {
                ConfigError::EnvFileNotFound { path }
            }
            dotenvy::Error::Io(io_err) => ConfigError::DotenvIo {
                path,
                kind: io_err.kind(),
            },
            _ => ConfigError::DotenvUnknown { path },
        }
    }

    /// Returns true if this error means a file was simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::EnvFileNotFound { .. })
    }
}
