//! Typed conversion of raw setting values.
//!
//! Responsibilities:
//! - Convert a raw `Node` (document value, or env var wrapped as a string)
//!   into a concrete setting type.
//!
//! Does NOT handle:
//! - Choosing which layer's raw value to convert (see `resolver`).
//!
//! Invariants:
//! - Conversion never fails: empty, absent-shaped or unparsable input
//!   returns the caller's fallback unchanged.

use std::path::PathBuf;

use crate::paths::expand_tilde;
use crate::types::Node;

/// A type that can be resolved through the precedence chain.
pub trait SettingValue: Clone + PartialEq {
    /// Convert `raw` into `Self`, returning `fallback` when it cannot.
    fn convert(raw: &Node, fallback: Self) -> Self;

    /// Convert a raw string (an env var or a flag spelling).
    fn convert_str(raw: &str, fallback: Self) -> Self {
        Self::convert(&Node::String(raw.to_string()), fallback)
    }
}

impl SettingValue for String {
    fn convert(raw: &Node, fallback: Self) -> Self {
        match raw.scalar_string() {
            Some(s) if !s.is_empty() => s,
            _ => fallback,
        }
    }
}

/// Accepts the spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl SettingValue for bool {
    fn convert(raw: &Node, fallback: Self) -> Self {
        match raw {
            Node::Bool(b) => *b,
            Node::String(s) => parse_bool(s.trim()).unwrap_or(fallback),
            _ => fallback,
        }
    }
}

macro_rules! impl_integer_setting {
    ($($t:ty),* $(,)?) => {
        $(
            impl SettingValue for $t {
                fn convert(raw: &Node, fallback: Self) -> Self {
                    match raw {
                        Node::Integer(i) => <$t>::try_from(*i).unwrap_or(fallback),
                        Node::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                            <$t>::try_from(*f as i128).unwrap_or(fallback)
                        }
                        Node::String(s) => s.trim().parse().unwrap_or(fallback),
                        _ => fallback,
                    }
                }
            }
        )*
    };
}

impl_integer_setting!(i32, i64, u16, u32, u64, usize);

macro_rules! impl_float_setting {
    ($($t:ty),* $(,)?) => {
        $(
            impl SettingValue for $t {
                fn convert(raw: &Node, fallback: Self) -> Self {
                    let value = match raw {
                        Node::Integer(i) => *i as $t,
                        Node::Float(f) => *f as $t,
                        Node::String(s) => match s.trim().parse::<$t>() {
                            Ok(v) => v,
                            Err(_) => return fallback,
                        },
                        _ => return fallback,
                    };
                    if value.is_finite() { value } else { fallback }
                }
            }
        )*
    };
}

impl_float_setting!(f32, f64);

impl SettingValue for PathBuf {
    fn convert(raw: &Node, fallback: Self) -> Self {
        match raw.scalar_string() {
            Some(s) if !s.trim().is_empty() => expand_tilde(s.trim()),
            _ => fallback,
        }
    }
}

/// Lists come from document sequences of scalars or comma-separated strings.
impl SettingValue for Vec<String> {
    fn convert(raw: &Node, fallback: Self) -> Self {
        match raw {
            Node::List(items) => items
                .iter()
                .map(Node::scalar_string)
                .collect::<Option<Vec<_>>>()
                .unwrap_or(fallback),
            Node::String(s) => {
                let items: Vec<String> = s
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() { fallback } else { items }
            }
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(raw: &str) -> Node {
        Node::String(raw.to_string())
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(String::convert(&s("gpt"), "d".into()), "gpt");
        assert_eq!(String::convert(&s(""), "d".into()), "d");
        assert_eq!(String::convert(&Node::Integer(4), "d".into()), "4");
        assert_eq!(String::convert(&Node::Bool(true), "d".into()), "true");
        assert_eq!(String::convert(&Node::Null, "d".into()), "d");
        assert_eq!(String::convert(&Node::List(vec![]), "d".into()), "d");
    }

    #[test]
    fn test_bool_conversion() {
        for raw in ["1", "t", "T", "TRUE", "true", "True", " true "] {
            assert!(bool::convert(&s(raw), false), "{raw:?} should be true");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!bool::convert(&s(raw), true), "{raw:?} should be false");
        }
        assert!(bool::convert(&s("yes"), true));
        assert!(!bool::convert(&s(""), false));
        assert!(bool::convert(&Node::Bool(true), false));
        assert!(bool::convert(&Node::Integer(0), true));
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(i64::convert(&s(" 42 "), 0), 42);
        assert_eq!(i64::convert(&s("4.2"), 7), 7);
        assert_eq!(i64::convert(&Node::Integer(-3), 0), -3);
        assert_eq!(i64::convert(&Node::Float(3.0), 0), 3);
        assert_eq!(i64::convert(&Node::Float(3.5), 9), 9);
        assert_eq!(u32::convert(&Node::Integer(-1), 5), 5);
        assert_eq!(u16::convert(&Node::Integer(70_000), 5), 5);
        assert_eq!(usize::convert(&Node::Bool(true), 1), 1);
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(f32::convert(&s("0.25"), 0.7), 0.25);
        assert_eq!(f32::convert(&Node::Float(0.5), 0.7), 0.5);
        assert_eq!(f32::convert(&Node::Integer(1), 0.7), 1.0);
        assert_eq!(f32::convert(&s("warm"), 0.7), 0.7);
        assert_eq!(f32::convert(&s("NaN"), 0.7), 0.7);
        assert_eq!(f64::convert(&s("inf"), 1.5), 1.5);
        assert_eq!(f64::convert(&s(""), 1.5), 1.5);
    }

    #[test]
    fn test_path_conversion() {
        assert_eq!(
            PathBuf::convert(&s("/opt/bin"), PathBuf::from("bin")),
            PathBuf::from("/opt/bin")
        );
        assert_eq!(PathBuf::convert(&s("  "), PathBuf::from("bin")), PathBuf::from("bin"));
    }

    #[test]
    fn test_list_conversion() {
        assert_eq!(
            Vec::<String>::convert(&s("a, b,,c "), vec![]),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(
            Vec::<String>::convert(&Node::List(vec![s("x"), Node::Integer(2)]), vec![]),
            vec!["x".to_string(), "2".to_string()]
        );
        assert_eq!(
            Vec::<String>::convert(&Node::List(vec![Node::Map(Default::default())]), vec!["d".into()]),
            vec!["d".to_string()]
        );
        assert_eq!(Vec::<String>::convert(&s(" , "), vec!["d".into()]), vec!["d".to_string()]);
    }

    #[test]
    fn test_convert_str_wraps_string() {
        assert_eq!(u64::convert_str("12", 0), 12);
        assert_eq!(String::convert_str("", "fallback".into()), "fallback");
    }
}
