//! Setting resolution across the precedence layers.
//!
//! Responsibilities:
//! - Resolve a named setting to a typed value from, in order: the explicit
//!   flag, the process environment, the project document (environment-scoped
//!   section, else unscoped), the global settings document, the default.
//! - Report which layer supplied the value, and what each layer holds.
//!
//! Does NOT handle:
//! - Loading env files or documents; those must be loaded before the
//!   resolver is built (see `loader` and `types`).
//!
//! Invariants / Assumptions:
//! - A flag counts as explicitly set only when it differs from the default.
//!   A flag deliberately set to the default value falls through to the next
//!   layers, exactly like an unset flag.
//! - Each layer's raw value is converted before it is compared with the
//!   default; a layer wins only if its converted value differs from it.
//! - Resolution never fails. Absent, mistyped or unparsable values fall
//!   through to the next layer and ultimately to the default.

mod convert;


use std::fmt;

pub use convert::SettingValue;

use crate::loader::{EnvSource, ProcessEnv, mangle};
use crate::types::{ConfigDocument, GlobalSettings, Node, lookup};

/// The source a resolved value came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Flag,
    Environment,
    Project,
    Global,
    Default,
}

impl Layer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Layer::Flag => "flag",
            Layer::Environment => "environment",
            Layer::Project => "project",
            Layer::Global => "global",
            Layer::Default => "default",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved value and the layer that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub layer: Layer,
}

impl<T> Resolved<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            layer: self.layer,
        }
    }
}

/// Raw per-layer observations for one setting, before conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerReport {
    pub name: String,
    pub env_var: String,
    pub env_value: Option<String>,
    /// Active environment used for the project lookup.
    pub environment: String,
    pub project: Option<Node>,
    pub global: Option<Node>,
}

/// Resolves settings against a loaded environment and documents.
#[derive(Debug, Clone, Default)]
pub struct SettingResolver<E: EnvSource = ProcessEnv> {
    env: E,
    project: Option<ConfigDocument>,
    global: GlobalSettings,
    environment: String,
}

impl SettingResolver<ProcessEnv> {
    /// A resolver reading the real process environment.
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl<E: EnvSource> SettingResolver<E> {
    /// A resolver reading `env` instead of the process environment.
    pub fn with_env(env: E) -> Self {
        Self {
            env,
            project: None,
            global: GlobalSettings::default(),
            environment: String::new(),
        }
    }

    pub fn with_project(mut self, project: impl Into<Option<ConfigDocument>>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_global(mut self, global: GlobalSettings) -> Self {
        self.global = global;
        self
    }

    /// Active environment; selects `settings:<env>` in the project document.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn project(&self) -> Option<&ConfigDocument> {
        self.project.as_ref()
    }

    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    /// Resolve `name` to a `T`.
    pub fn resolve<T: SettingValue>(&self, name: &str, flag: T, default: T) -> T {
        self.resolve_traced(name, flag, default).value
    }

    /// Resolve `name` and report the layer that supplied the value.
    pub fn resolve_traced<T: SettingValue>(&self, name: &str, flag: T, default: T) -> Resolved<T> {
        self.resolve_traced_with(name, flag, default, T::convert)
    }

    /// Resolve `name` with an explicit converter instead of [`SettingValue`].
    pub fn resolve_with<T, F>(&self, name: &str, flag: T, default: T, convert: F) -> T
    where
        T: Clone + PartialEq,
        F: Fn(&Node, T) -> T,
    {
        self.resolve_traced_with(name, flag, default, convert).value
    }

    pub fn resolve_traced_with<T, F>(
        &self,
        name: &str,
        flag: T,
        default: T,
        convert: F,
    ) -> Resolved<T>
    where
        T: Clone + PartialEq,
        F: Fn(&Node, T) -> T,
    {
        if flag != default {
            return hit(name, flag, Layer::Flag);
        }

        let env_var = mangle(name);
        if let Some(raw) = self.env.var(&env_var) {
            let value = convert(&Node::String(raw), default.clone());
            if value != default {
                return hit(name, value, Layer::Environment);
            }
            tracing::debug!(setting = name, env_var = %env_var, "Environment value did not override the default");
        }

        if let Some(node) = self.project_node(name) {
            let value = convert(node, default.clone());
            if value != default {
                return hit(name, value, Layer::Project);
            }
            tracing::debug!(setting = name, kind = node.kind(), "Project value did not override the default");
        }

        if let Some(node) = self.global.get(name) {
            let value = convert(node, default.clone());
            if value != default {
                return hit(name, value, Layer::Global);
            }
            tracing::debug!(setting = name, kind = node.kind(), "Global value did not override the default");
        }

        hit(name, default, Layer::Default)
    }

    /// Collect what every layer holds for `name` without converting anything.
    pub fn explain(&self, name: &str) -> LayerReport {
        let env_var = mangle(name);
        LayerReport {
            name: name.to_string(),
            env_value: self.env.var(&env_var),
            env_var,
            environment: self.environment.clone(),
            project: self.project_node(name).cloned(),
            global: self.global.get(name).cloned(),
        }
    }

    fn project_node(&self, name: &str) -> Option<&Node> {
        let project = self.project.as_ref()?;
        lookup(project.effective_settings(&self.environment), name)
    }
}

fn hit<T>(name: &str, value: T, layer: Layer) -> Resolved<T> {
    tracing::trace!(setting = name, layer = %layer, "Resolved setting");
    Resolved { value, layer }
}
