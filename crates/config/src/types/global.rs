//! The user-wide settings document.

use std::path::{Path, PathBuf};

use super::node::{Mapping, Node, lookup};
use crate::loader::ConfigError;

/// Free-form nested settings shared by every project of the user.
///
/// Consulted after the project document and before hard-coded defaults; it
/// has no environment scoping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalSettings {
    path: Option<PathBuf>,
    settings: Mapping,
}

impl GlobalSettings {
    pub fn new(settings: Mapping) -> Self {
        Self {
            path: None,
            settings,
        }
    }

    /// Parse settings from raw YAML. An empty document yields no settings.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, serde_yaml::Error> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let settings = match serde_yaml::from_slice::<Node>(raw)? {
            Node::Map(map) => map,
            Node::Null => Mapping::new(),
            other => {
                tracing::warn!(
                    kind = other.kind(),
                    "Global settings document is not a mapping, ignoring it"
                );
                Mapping::new()
            }
        };
        Ok(Self::new(settings))
    }

    /// Load settings from `path`. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// `ConfigError::DocumentRead` for I/O failures other than "not found",
    /// `ConfigError::DocumentParse` for invalid YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No global settings file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::DocumentRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut settings =
            Self::from_bytes(&raw).map_err(|source| ConfigError::DocumentParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), keys = settings.settings.len(), "Loaded global settings");
        Ok(settings)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn settings(&self) -> &Mapping {
        &self.settings
    }

    /// Dot-path lookup; type mismatches read as absent.
    pub fn get(&self, name: &str) -> Option<&Node> {
        lookup(&self.settings, name)
    }
}
