//! Cascading `.env` file loading.
//!
//! Responsibilities:
//! - Compute the ordered, duplicate-free list of candidate env files.
//! - Apply each file's `KEY=VALUE` pairs to an `EnvSource`, later files
//!   overwriting earlier values and values already set by the OS.
//!
//! Does NOT handle:
//! - Deciding the active environment name (the caller passes it in).
//! - Parsing project or global documents (see `types`).
//!
//! Invariants:
//! - Order: home `.env`, project `.env`, `.env.<env>`, `.env.local`,
//!   `.env.<env>.local`, then explicit overrides in the order given.
//! - `${VAR}` references resolve against the OS environment first, then any
//!   earlier line of the cascade (same file or an earlier file). Nothing is
//!   written to the `EnvSource` until every file has parsed, so the result
//!   does not depend on which `EnvSource` is loaded into.
//! - A path is loaded at most once; duplicates collapse to the first position.
//! - Cascade files are optional; explicit overrides are required.
//! - `DOTENV_DISABLED=1|true` skips the optional cascade but never overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::env::EnvSource;
use super::error::ConfigError;
use crate::constants::{DOTENV_DISABLED_VAR, DOTENV_FILE_NAME, DOTENV_LOCAL_SUFFIX};

/// A candidate env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    /// Required files must exist; they were named explicitly by the user.
    pub required: bool,
}

impl EnvFile {
    fn optional(path: PathBuf) -> Self {
        Self {
            path,
            required: false,
        }
    }

    fn required(path: PathBuf) -> Self {
        Self {
            path,
            required: true,
        }
    }
}

/// Builder for the startup env-file cascade.
#[derive(Debug, Clone, Default)]
pub struct EnvFileLoader {
    home_base: Option<PathBuf>,
    project_root: PathBuf,
    environment: String,
    overrides: Vec<PathBuf>,
}

impl EnvFileLoader {
    /// Create a loader for the given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Directory holding the user-wide `.env` (loaded first).
    pub fn with_home_base(mut self, home_base: impl Into<PathBuf>) -> Self {
        self.home_base = Some(home_base.into());
        self
    }

    /// Active environment name; empty means no environment-specific files.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Explicit env files, loaded last and required to exist.
    pub fn with_overrides<I, P>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.overrides.extend(overrides.into_iter().map(Into::into));
        self
    }

    /// The ordered, de-duplicated list of files `load` will consider.
    pub fn candidates(&self) -> Vec<EnvFile> {
        let suffix = if self.environment.is_empty() {
            String::new()
        } else {
            format!(".{}", self.environment)
        };

        let mut ordered: Vec<EnvFile> = Vec::new();
        if let Some(home) = &self.home_base {
            ordered.push(EnvFile::optional(home.join(DOTENV_FILE_NAME)));
        }
        let project = &self.project_root;
        ordered.push(EnvFile::optional(project.join(DOTENV_FILE_NAME)));
        ordered.push(EnvFile::optional(
            project.join(format!("{DOTENV_FILE_NAME}{suffix}")),
        ));
        ordered.push(EnvFile::optional(
            project.join(format!("{DOTENV_FILE_NAME}{DOTENV_LOCAL_SUFFIX}")),
        ));
        ordered.push(EnvFile::optional(project.join(format!(
            "{DOTENV_FILE_NAME}{suffix}{DOTENV_LOCAL_SUFFIX}"
        ))));
        ordered.extend(self.overrides.iter().cloned().map(EnvFile::required));

        dedup_first(ordered)
    }

    /// Load every candidate into `env`, in order.
    ///
    /// Returns the files that were actually applied.
    ///
    /// # Errors
    ///
    /// - `ConfigError::EnvFileNotFound` if an explicit override is missing.
    /// - `ConfigError::DotenvParse` / `ConfigError::DotenvIo` if an existing
    ///   file cannot be read or parsed. Messages never include line content.
    pub fn load<E: EnvSource>(&self, env: &mut E) -> Result<Vec<PathBuf>, ConfigError> {
        let skip_optional = dotenv_disabled(env);
        if skip_optional {
            tracing::debug!("{DOTENV_DISABLED_VAR} is set, skipping optional env files");
        }

        let mut files = Vec::new();
        for file in self.candidates() {
            if skip_optional && !file.required {
                continue;
            }
            match EnvFileContents::read(&file.path) {
                Ok(contents) => files.push(contents),
                Err(e) if e.is_not_found() && !file.required => {
                    tracing::trace!(path = %file.path.display(), "Optional env file absent");
                }
                Err(e) => return Err(e),
            }
        }

        for (key, value) in parse_cascade(&files)? {
            env.set_var(&key, &value);
        }

        Ok(files
            .into_iter()
            .map(|file| {
                tracing::debug!(path = %file.path.display(), vars = file.pairs, "Loaded env file");
                file.path
            })
            .collect())
    }
}

/// One env file read into memory and checked on its own.
struct EnvFileContents {
    path: PathBuf,
    raw: Vec<u8>,
    pairs: usize,
}

impl EnvFileContents {
    /// Read `path` and parse it alone, so errors carry the right path.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read(path).map_err(|e| {
            ConfigError::from_dotenv(path.to_path_buf(), dotenvy::Error::Io(e))
        })?;

        let mut pairs = 0;
        for item in dotenvy::from_read_iter(raw.as_slice()) {
            item.map_err(|e| ConfigError::from_dotenv(path.to_path_buf(), e))?;
            pairs += 1;
        }

        Ok(Self {
            path: path.to_path_buf(),
            raw,
            pairs,
        })
    }
}

/// Parse all files as one stream so `${VAR}` can see earlier files.
///
/// Returns the pairs in load order; later duplicates overwrite when applied.
fn parse_cascade(files: &[EnvFileContents]) -> Result<Vec<(String, String)>, ConfigError> {
    let mut joined = Vec::with_capacity(files.iter().map(|f| f.raw.len() + 1).sum());
    for file in files {
        joined.extend_from_slice(&file.raw);
        joined.push(b'\n');
    }

    let mut owners = files
        .iter()
        .flat_map(|file| std::iter::repeat_n(&file.path, file.pairs));
    dotenvy::from_read_iter(joined.as_slice())
        .map(|item| {
            let owner = owners.next();
            item.map_err(|e| ConfigError::from_dotenv(owner.cloned().unwrap_or_default(), e))
        })
        .collect()
}

/// Collapse duplicate paths to their first position.
///
/// A duplicate that is required upgrades the surviving entry, so an explicit
/// `--env-file .env` still fails loudly when the file is missing.
fn dedup_first(files: Vec<EnvFile>) -> Vec<EnvFile> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut out: Vec<EnvFile> = Vec::with_capacity(files.len());
    for file in files {
        match index.get(&file.path) {
            Some(&i) => out[i].required |= file.required,
            None => {
                index.insert(file.path.clone(), out.len());
                out.push(file);
            }
        }
    }
    out
}

fn dotenv_disabled<E: EnvSource>(env: &E) -> bool {
    matches!(
        env.var(DOTENV_DISABLED_VAR).as_deref(),
        Some("true") | Some("1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[EnvFile]) -> Vec<PathBuf> {
        files.iter().map(|f| f.path.clone()).collect()
    }

    #[test]
    fn test_candidates_fixed_order_with_environment() {
        let loader = EnvFileLoader::new("/proj")
            .with_home_base("/home/u/.config/gpm")
            .with_environment("prod")
            .with_overrides(["/tmp/extra.env"]);

        assert_eq!(
            paths(&loader.candidates()),
            vec![
                PathBuf::from("/home/u/.config/gpm/.env"),
                PathBuf::from("/proj/.env"),
                PathBuf::from("/proj/.env.prod"),
                PathBuf::from("/proj/.env.local"),
                PathBuf::from("/proj/.env.prod.local"),
                PathBuf::from("/tmp/extra.env"),
            ]
        );
    }

    #[test]
    fn test_candidates_without_environment_collapse_duplicates() {
        let loader = EnvFileLoader::new("/proj").with_home_base("/home/u");

        assert_eq!(
            paths(&loader.candidates()),
            vec![
                PathBuf::from("/home/u/.env"),
                PathBuf::from("/proj/.env"),
                PathBuf::from("/proj/.env.local"),
            ]
        );
    }

    #[test]
    fn test_candidates_home_equal_to_project_loads_once() {
        let loader = EnvFileLoader::new("/same").with_home_base("/same");
        let candidates = loader.candidates();
        assert_eq!(candidates[0].path, PathBuf::from("/same/.env"));
        assert_eq!(
            candidates
                .iter()
                .filter(|f| f.path == Path::new("/same/.env"))
                .count(),
            1
        );
    }

    #[test]
    fn test_override_duplicate_of_cascade_becomes_required_in_place() {
        let loader = EnvFileLoader::new("/proj").with_overrides(["/proj/.env", "/b.env", "/b.env"]);
        let candidates = loader.candidates();

        assert_eq!(
            paths(&candidates),
            vec![
                PathBuf::from("/proj/.env"),
                PathBuf::from("/proj/.env.local"),
                PathBuf::from("/b.env"),
            ]
        );
        assert!(candidates[0].required);
        assert!(!candidates[1].required);
        assert!(candidates[2].required);
    }

    #[test]
    fn test_cascade_files_are_optional_overrides_required() {
        let loader = EnvFileLoader::new("/proj")
            .with_environment("dev")
            .with_overrides(["/x.env"]);
        let candidates = loader.candidates();
        let (required, optional): (Vec<_>, Vec<_>) =
            candidates.iter().partition(|f| f.required);
        assert_eq!(required.len(), 1);
        assert_eq!(optional.len(), 4);
    }
}
