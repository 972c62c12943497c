//! Configuration documents.
//!
//! This module contains the parsed project document, the user-wide settings
//! document and the schema-less `Node` tree they share.

mod document;
mod global;
pub mod node;

pub use document::ConfigDocument;
pub use global::GlobalSettings;
pub use node::{Mapping, Node, TypeMismatch, lookup, resolve};
