//! Process environment access and setting name mangling.
//!
//! Responsibilities:
//! - Derive the environment variable name for a dotted setting name.
//! - Provide the `EnvSource` get/set seam over the process environment.
//! - Provide an in-memory `EnvSource` for tests and embedding.
//!
//! Does NOT handle:
//! - Reading `.env` files (see dotenv.rs).
//! - Type conversion of raw values (see `resolver::convert`).
//!
//! Invariants:
//! - `mangle` is pure: upper-case, `.` -> `_`, `GPM_` prefix, nothing else.
//! - `ProcessEnv::set_var` is only called during startup, before any
//!   resolution and before other threads exist.

use std::collections::HashMap;

use crate::constants::ENV_PREFIX;

/// Derive the environment variable name for a setting.
///
/// `ai.chat.temperature` becomes `GPM_AI_CHAT_TEMPERATURE`. Callers guarantee
/// segments are ASCII letters or digits; no other normalization happens.
pub fn mangle(name: &str) -> String {
    let mut out = String::with_capacity(ENV_PREFIX.len() + 1 + name.len());
    out.push_str(ENV_PREFIX);
    out.push('_');
    for ch in name.chars() {
        if ch == '.' {
            out.push('_');
        } else {
            out.extend(ch.to_uppercase());
        }
    }
    out
}

/// Narrow read/write view of an environment.
///
/// Production code binds this to the real process environment; tests use
/// [`MemoryEnv`] so precedence checks never touch global state.
pub trait EnvSource {
    /// Returns the raw value of `key`, or `None` when unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set_var(&mut self, key: &str, value: &str);
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        // SAFETY: the process environment is only written while loading env
        // files at startup, before any other thread is spawned.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// An isolated in-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}
