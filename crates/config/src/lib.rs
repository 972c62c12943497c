//! Configuration resolution engine for gpm.
//!
//! This crate decides the effective value of every named setting by merging
//! command-line flags, the process environment, environment-scoped sections
//! of the project document (`gpm.yaml`) and the user-wide settings file. It
//! also seeds the process environment from the cascading `.env` files.

pub mod catalog;
pub mod constants;
mod loader;
pub mod paths;
pub mod resolver;
pub mod types;

pub use catalog::{KnownSetting, SettingKind};
pub use loader::{
    ConfigError, EnvFile, EnvFileLoader, EnvSource, MemoryEnv, ProcessEnv,
    mangle,
};
pub use resolver::{Layer, LayerReport, Resolved, SettingResolver, SettingValue};
pub use types::{ConfigDocument, GlobalSettings, Mapping, Node, TypeMismatch};
