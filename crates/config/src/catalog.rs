//! Catalog of documented settings.
//!
//! Every entry's environment variable name is derived with [`mangle`] and is
//! part of the stable, user-facing interface: renaming a setting renames its
//! variable.

use std::fmt;
use std::path::PathBuf;

use crate::loader::{EnvSource, mangle};
use crate::resolver::{Resolved, SettingResolver, SettingValue};

/// The value type a setting is resolved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Text,
    Float,
    Integer,
    Bool,
    Path,
    List,
}

impl SettingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKind::Text => "text",
            SettingKind::Float => "float",
            SettingKind::Integer => "integer",
            SettingKind::Bool => "bool",
            SettingKind::Path => "path",
            SettingKind::List => "list",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented setting with its hard-coded default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownSetting {
    pub name: &'static str,
    pub kind: SettingKind,
    /// Default spelled as it would appear in an env var.
    pub default: &'static str,
    pub description: &'static str,
}

impl KnownSetting {
    pub fn env_var(&self) -> String {
        mangle(self.name)
    }

    /// Resolve this setting with its catalog default, rendered as text.
    pub fn resolve<E: EnvSource>(
        &self,
        resolver: &SettingResolver<E>,
        flag: Option<&str>,
    ) -> Resolved<String> {
        resolve_rendered(resolver, self.name, self.kind, flag, self.default)
    }
}

pub const KNOWN_SETTINGS: &[KnownSetting] = &[
    KnownSetting {
        name: "ai.provider",
        kind: SettingKind::Text,
        default: "openai",
        description: "AI chat backend used by assistant commands",
    },
    KnownSetting {
        name: "ai.model",
        kind: SettingKind::Text,
        default: "gpt-4o-mini",
        description: "Model requested from the AI chat backend",
    },
    KnownSetting {
        name: "ai.endpoint",
        kind: SettingKind::Text,
        default: "",
        description: "Override for the AI backend base URL",
    },
    KnownSetting {
        name: "ai.chat.temperature",
        kind: SettingKind::Float,
        default: "0.7",
        description: "Sampling temperature for chat completions",
    },
    KnownSetting {
        name: "ai.chat.timeout",
        kind: SettingKind::Integer,
        default: "60",
        description: "Chat request timeout in seconds",
    },
    KnownSetting {
        name: "install.path",
        kind: SettingKind::Path,
        default: "~/go/bin",
        description: "Directory built binaries are installed into",
    },
    KnownSetting {
        name: "build.output",
        kind: SettingKind::Path,
        default: "bin",
        description: "Build output directory, relative to the project",
    },
    KnownSetting {
        name: "format.tool",
        kind: SettingKind::Text,
        default: "gofmt",
        description: "Formatter invoked by the format command",
    },
    KnownSetting {
        name: "lint.tool",
        kind: SettingKind::Text,
        default: "golangci-lint",
        description: "Linter invoked by the lint command",
    },
    KnownSetting {
        name: "git.remote",
        kind: SettingKind::Text,
        default: "origin",
        description: "Remote used by release and sync commands",
    },
    KnownSetting {
        name: "docker.compose",
        kind: SettingKind::Text,
        default: "docker compose",
        description: "Compose command used for container workflows",
    },
    KnownSetting {
        name: "package.exclude",
        kind: SettingKind::List,
        default: ".git,node_modules",
        description: "Comma-separated patterns left out of packaged archives",
    },
    KnownSetting {
        name: "verbose",
        kind: SettingKind::Bool,
        default: "false",
        description: "Print the commands gpm runs",
    },
];

/// Look up a documented setting by name.
pub fn find(name: &str) -> Option<&'static KnownSetting> {
    KNOWN_SETTINGS.iter().find(|setting| setting.name == name)
}

/// Resolve `name` as `kind` and render the typed result as text.
///
/// `flag` and `default` are spelled as strings (like env vars); they are
/// converted to the setting's type before resolution, so `--flag 0.70` and a
/// default of `0.7` compare equal for a float setting.
pub fn resolve_rendered<E: EnvSource>(
    resolver: &SettingResolver<E>,
    name: &str,
    kind: SettingKind,
    flag: Option<&str>,
    default: &str,
) -> Resolved<String> {
    match kind {
        SettingKind::Text => typed::<String, E, _>(resolver, name, flag, default, String::clone),
        SettingKind::Float => typed::<f64, E, _>(resolver, name, flag, default, f64::to_string),
        SettingKind::Integer => typed::<i64, E, _>(resolver, name, flag, default, i64::to_string),
        SettingKind::Bool => typed::<bool, E, _>(resolver, name, flag, default, bool::to_string),
        SettingKind::Path => typed::<PathBuf, E, _>(resolver, name, flag, default, |p| {
            p.display().to_string()
        }),
        SettingKind::List => {
            typed::<Vec<String>, E, _>(resolver, name, flag, default, |items| items.join(","))
        }
    }
}

fn typed<T, E, R>(
    resolver: &SettingResolver<E>,
    name: &str,
    flag: Option<&str>,
    default: &str,
    render: R,
) -> Resolved<String>
where
    T: SettingValue + Default,
    E: EnvSource,
    R: Fn(&T) -> String,
{
    let default = T::convert_str(default, T::default());
    let flag = flag.map_or_else(
        || default.clone(),
        |raw| T::convert_str(raw, default.clone()),
    );
    resolver
        .resolve_traced(name, flag, default)
        .map(|value| render(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryEnv;
    use crate::resolver::Layer;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for setting in KNOWN_SETTINGS {
            assert!(seen.insert(setting.name), "duplicate setting {}", setting.name);
            assert!(
                setting
                    .name
                    .split('.')
                    .all(|seg| !seg.is_empty()
                        && seg.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())),
                "malformed setting name {}",
                setting.name
            );
        }
    }

    #[test]
    fn test_documented_env_var_names() {
        assert_eq!(find("ai.chat.temperature").unwrap().env_var(), "GPM_AI_CHAT_TEMPERATURE");
        assert_eq!(find("install.path").unwrap().env_var(), "GPM_INSTALL_PATH");
        assert!(find("no.such.setting").is_none());
    }

    #[test]
    fn test_known_setting_resolves_default() {
        let r = SettingResolver::with_env(MemoryEnv::new());
        let got = find("format.tool").unwrap().resolve(&r, None);
        assert_eq!(got, Resolved { value: "gofmt".to_string(), layer: Layer::Default });
    }

    #[test]
    fn test_known_setting_float_flag_equal_to_default_is_not_explicit() {
        let r = SettingResolver::with_env(MemoryEnv::new().with_var("GPM_AI_CHAT_TEMPERATURE", "0.2"));
        let got = find("ai.chat.temperature").unwrap().resolve(&r, Some("0.70"));
        assert_eq!(got, Resolved { value: "0.2".to_string(), layer: Layer::Environment });
    }

    #[test]
    fn test_resolve_rendered_flag_and_list() {
        let r = SettingResolver::with_env(MemoryEnv::new());
        let got = resolve_rendered(&r, "package.exclude", SettingKind::List, Some("dist, .git"), "");
        assert_eq!(got, Resolved { value: "dist,.git".to_string(), layer: Layer::Flag });
    }

    #[test]
    fn test_resolve_rendered_bool_from_env() {
        let r = SettingResolver::with_env(MemoryEnv::new().with_var("GPM_VERBOSE", "1"));
        let got = find("verbose").unwrap().resolve(&r, None);
        assert_eq!(got, Resolved { value: "true".to_string(), layer: Layer::Environment });
    }
}
