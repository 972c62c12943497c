//! Startup loading: env files into the process environment.
//!
//! Responsibilities:
//! - Load the cascading `.env` files in their fixed order.
//! - Provide the `EnvSource` seam and the setting name mangler.
//! - Define the error type shared by env-file and document loading.
//!
//! Does NOT handle:
//! - Resolving setting values (see `resolver`).
//! - Parsing project or global documents (see `types`).
//!
//! Invariants / Assumptions:
//! - Env files are loaded before documents are parsed and before any setting
//!   is resolved; callers must not reorder these steps.
//! - Later env files overwrite earlier values, including OS-provided ones.

mod dotenv;
mod env;
mod error;

#[cfg(test)]
mod tests;

pub use dotenv::{EnvFile, EnvFileLoader};
pub use env::{EnvSource, MemoryEnv, ProcessEnv, mangle};
pub use error::ConfigError;
