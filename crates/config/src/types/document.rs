//! The project document (`gpm.yaml`).
//!
//! Responsibilities:
//! - Parse the statically known fields (name, files, scripts, settings).
//! - Keep the raw bytes and a generic `Node` tree built once from them, so
//!   environment-scoped sections (`files:<env>`, `settings:<env>`) can be
//!   looked up by a name the schema cannot know in advance.
//!
//! Does NOT handle:
//! - Precedence between documents and other layers (see `resolver`).
//! - Writing the document back to disk.
//!
//! Invariants:
//! - The tree is parsed from the raw bytes exactly once, at construction.
//! - A scoped section that is missing or has the wrong shape falls back to
//!   the unscoped field; it never produces an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::node::{Mapping, Node, lookup};
use crate::constants::{FILES_KEY, PROJECT_FILE_NAME, SCOPE_SEPARATOR, SETTINGS_KEY};
use crate::loader::ConfigError;

/// Statically typed view of the project document.
///
/// A key that is present but null (`settings: ~`) reads as empty, the same
/// as a missing key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ProjectFile {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    files: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    scripts: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    settings: Mapping,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A parsed project document.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    path: Option<PathBuf>,
    raw: Vec<u8>,
    parsed: ProjectFile,
    tree: Mapping,
}

impl ConfigDocument {
    /// Parse a document from its raw YAML bytes.
    ///
    /// An empty (or whitespace-only) document is valid and has no fields set.
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Result<Self, serde_yaml::Error> {
        let raw = raw.into();
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                raw,
                ..Self::default()
            });
        }

        let parsed: ProjectFile = serde_yaml::from_slice(&raw)?;
        let tree = match serde_yaml::from_slice::<Node>(&raw)? {
            Node::Map(map) => map,
            // the static parse above already rejected non-mapping documents
            _ => Mapping::new(),
        };

        Ok(Self {
            path: None,
            raw,
            parsed,
            tree,
        })
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// `ConfigError::DocumentRead` if the file cannot be read and
    /// `ConfigError::DocumentParse` if it is not a valid project document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read(path).map_err(|source| ConfigError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::from_bytes(raw).map_err(|source| ConfigError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;
        document.path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            name = %document.name(),
            environments = document.environments().len(),
            "Loaded project document"
        );
        Ok(document)
    }

    /// Load `gpm.yaml` from `dir`, returning `Ok(None)` when it does not exist.
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(PROJECT_FILE_NAME);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No project document");
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Path the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.parsed.name
    }

    /// Unscoped file patterns, in declaration order.
    pub fn files(&self) -> &[String] {
        &self.parsed.files
    }

    pub fn scripts(&self) -> &BTreeMap<String, String> {
        &self.parsed.scripts
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.parsed.scripts.get(name).map(String::as_str)
    }

    /// Unscoped settings map.
    pub fn settings(&self) -> &Mapping {
        &self.parsed.settings
    }

    /// File patterns for `env`: the `files:<env>` section when it exists and
    /// is a list of strings, otherwise the unscoped `files`.
    pub fn effective_files(&self, env: &str) -> Vec<String> {
        if let Some(node) = self.scoped(FILES_KEY, env) {
            match node.as_string_list() {
                Some(files) => return files,
                None => tracing::debug!(
                    env,
                    kind = node.kind(),
                    "Scoped files section is not a list of strings, using unscoped files"
                ),
            }
        }
        self.parsed.files.clone()
    }

    /// Settings for `env`: the `settings:<env>` section when it exists and is
    /// a mapping, otherwise the unscoped `settings`.
    pub fn effective_settings(&self, env: &str) -> &Mapping {
        if let Some(node) = self.scoped(SETTINGS_KEY, env) {
            match node.as_map() {
                Some(map) => return map,
                None => tracing::debug!(
                    env,
                    kind = node.kind(),
                    "Scoped settings section is not a mapping, using unscoped settings"
                ),
            }
        }
        &self.parsed.settings
    }

    /// Every environment name that has a scoped `files:` or `settings:` section.
    pub fn environments(&self) -> BTreeSet<&str> {
        self.tree
            .keys()
            .filter_map(|key| {
                let (section, env) = key.split_once(SCOPE_SEPARATOR)?;
                (matches!(section, FILES_KEY | SETTINGS_KEY) && !env.is_empty()).then_some(env)
            })
            .collect()
    }

    fn scoped(&self, section: &str, env: &str) -> Option<&Node> {
        if env.is_empty() {
            return None;
        }
        lookup(&self.tree, &scoped_key(section, env))
    }
}

/// `files` + `prod` -> `files:prod`.
fn scoped_key(section: &str, env: &str) -> String {
    format!("{section}{SCOPE_SEPARATOR}{env}")
}
