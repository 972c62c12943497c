//! Schema-less document values and dot-path lookup.
//!
//! Responsibilities:
//! - Model parsed YAML as a small recursive sum type (`Node`).
//! - Walk nested mappings by dot-separated path.
//!
//! Does NOT handle:
//! - Converting nodes into typed setting values (see `resolver::convert`).
//!
//! Invariants:
//! - `resolve` distinguishes "absent" (`Ok(None)`) from a stored null
//!   (`Ok(Some(Node::Null))`) and from a type mismatch (`Err`).
//! - `lookup` treats a type mismatch exactly like "absent".

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// A string-keyed mapping of nodes.
pub type Mapping = BTreeMap<String, Node>;

/// A parsed document value.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(from = "serde_yaml::Value")]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(Mapping),
}

impl Node {
    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::List(_) => "list",
            Node::Map(_) => "mapping",
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// The node as a list of strings, if every element is a string.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        match self {
            Node::List(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }

    /// Scalar rendering (no quotes); `None` for null and collections.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Node::Bool(b) => Some(b.to_string()),
            Node::Integer(i) => Some(i.to_string()),
            Node::Float(f) => Some(f.to_string()),
            Node::String(s) => Some(s.clone()),
            Node::Null | Node::List(_) | Node::Map(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{b}"),
            Node::Integer(i) => write!(f, "{i}"),
            Node::Float(x) => write!(f, "{x}"),
            Node::String(s) => write!(f, "{s:?}"),
            Node::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Node::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Integer(i)
                } else {
                    // u64 beyond i64::MAX and true floats both land here.
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Map(
                map.into_iter()
                    .filter_map(|(key, value)| mapping_key(key).map(|k| (k, Node::from(value))))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Mapping keys become strings; keys without a scalar spelling are dropped.
fn mapping_key(key: serde_yaml::Value) -> Option<String> {
    match Node::from(key) {
        Node::String(s) => Some(s),
        other => {
            let rendered = other.scalar_string();
            if rendered.is_none() {
                tracing::trace!(kind = other.kind(), "Dropping non-scalar mapping key");
            }
            rendered
        }
    }
}

/// A dot-path segment was reached through a value that is not a mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot look up '{segment}' in {found} value at '{path}'")]
pub struct TypeMismatch {
    /// The full path being resolved.
    pub path: String,
    /// The segment that could not be looked up.
    pub segment: String,
    /// Kind of the value found where a mapping was expected.
    pub found: &'static str,
}

/// Walk `map` along the dot-separated `path`.
///
/// Returns `Ok(None)` when a segment is missing and `Err(TypeMismatch)` when an
/// intermediate value is not a mapping.
pub fn resolve<'a>(map: &'a Mapping, path: &str) -> Result<Option<&'a Node>, TypeMismatch> {
    let mut segments = path.split('.');
    // split always yields at least one item
    let first = segments.next().unwrap_or_default();
    let Some(mut current) = map.get(first) else {
        return Ok(None);
    };

    for segment in segments {
        let Node::Map(inner) = current else {
            return Err(TypeMismatch {
                path: path.to_string(),
                segment: segment.to_string(),
                found: current.kind(),
            });
        };
        match inner.get(segment) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Like [`resolve`], but a type mismatch is reported as absent.
pub fn lookup<'a>(map: &'a Mapping, path: &str) -> Option<&'a Node> {
    match resolve(map, path) {
        Ok(found) => found,
        Err(mismatch) => {
            tracing::trace!(%mismatch, "Treating dot-path type mismatch as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Mapping {
        match serde_yaml::from_str::<Node>(yaml).unwrap() {
            Node::Map(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_node_from_yaml_scalars_and_collections() {
        let map = parse(
            "name: demo\ncount: 3\nratio: 0.5\nenabled: true\nnothing: ~\nlist: [a, 1]\n",
        );
        assert_eq!(map["name"], Node::String("demo".into()));
        assert_eq!(map["count"], Node::Integer(3));
        assert_eq!(map["ratio"], Node::Float(0.5));
        assert_eq!(map["enabled"], Node::Bool(true));
        assert_eq!(map["nothing"], Node::Null);
        assert_eq!(
            map["list"],
            Node::List(vec![Node::String("a".into()), Node::Integer(1)])
        );
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let map = parse("1: one\ntrue: yes\n");
        assert_eq!(map["1"], Node::String("one".into()));
        assert_eq!(map["true"], Node::String("yes".into()));
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let map = parse("model: !custom gpt\n");
        assert_eq!(map["model"], Node::String("gpt".into()));
    }

    #[test]
    fn test_resolve_nested_path() {
        let map = parse("ai:\n  chat:\n    temperature: 0.2\n");
        assert_eq!(
            resolve(&map, "ai.chat.temperature"),
            Ok(Some(&Node::Float(0.2)))
        );
        assert_eq!(
            resolve(&map, "ai.chat").unwrap().and_then(Node::as_map).map(|m| m.len()),
            Some(1)
        );
    }

    #[test]
    fn test_resolve_missing_segment_is_absent() {
        let map = parse("ai:\n  chat: {}\n");
        assert_eq!(resolve(&map, "ai.model"), Ok(None));
        assert_eq!(resolve(&map, "other"), Ok(None));
        assert_eq!(resolve(&map, "ai.chat.temperature"), Ok(None));
    }

    #[test]
    fn test_resolve_stored_null_is_present() {
        let map = parse("ai:\n  model: null\n");
        assert_eq!(resolve(&map, "ai.model"), Ok(Some(&Node::Null)));
    }

    #[test]
    fn test_resolve_past_leaf_is_type_mismatch() {
        let map = parse("ai:\n  model: gpt\n");
        let err = resolve(&map, "ai.model.version").unwrap_err();
        assert_eq!(err.segment, "version");
        assert_eq!(err.found, "string");
        assert!(lookup(&map, "ai.model.version").is_none());
    }

    #[test]
    fn test_resolve_through_list_is_type_mismatch() {
        let map = parse("files: [a, b]\n");
        assert!(resolve(&map, "files.0").is_err());
        assert!(lookup(&map, "files.0").is_none());
    }

    #[test]
    fn test_scoped_keys_are_single_segments() {
        let map = parse("settings:prod:\n  retries: 9\n");
        let section = lookup(&map, "settings:prod").and_then(Node::as_map).unwrap();
        assert_eq!(section["retries"], Node::Integer(9));
    }

    #[test]
    fn test_as_string_list_requires_all_strings() {
        assert_eq!(
            Node::List(vec![Node::String("a".into()), Node::String("b".into())]).as_string_list(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            Node::List(vec![Node::String("a".into()), Node::Integer(1)]).as_string_list(),
            None
        );
        assert_eq!(Node::String("a".into()).as_string_list(), None);
    }

    #[test]
    fn test_display_is_compact() {
        let node = Node::List(vec![Node::Integer(1), Node::String("x".into())]);
        assert_eq!(node.to_string(), r#"[1, "x"]"#);
    }
}
