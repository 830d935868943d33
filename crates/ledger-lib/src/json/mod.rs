//! Thin wrapper over `serde_json`: deterministic pretty-printing of nested
//! structures and typed deserialization.
//!
//! Pretty output is indented JSON. Map keys keep their insertion order
//! (`serde_json` is built with `preserve_order`) unless sorting is requested,
//! so the same input always produces byte-identical text.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::errors::{LedgerError, Result};

/// Formatting knobs for [`pretty_print_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Emit map keys in lexicographic order instead of insertion order.
    pub sort_keys: bool,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            sort_keys: false,
            indent: 4,
        }
    }
}

/// Pretty-print a value with the default options.
pub fn pretty_print<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    pretty_print_with(value, &PrettyOptions::default())
}

/// Pretty-print a value.
///
/// Fails with `UnsupportedType` if the value does not map onto scalars,
/// sequences and string-keyed maps (e.g. a map keyed by tuples), or if it
/// holds a NaN or infinite float.
pub fn pretty_print_with<T: Serialize + ?Sized>(
    value: &T,
    opts: &PrettyOptions,
) -> Result<String> {
    let mut json =
        serde_json::to_value(value).map_err(|e| LedgerError::UnsupportedType(e.to_string()))?;
    // serde_json writes non-finite floats as null; the YAML model keeps them.
    if contains_null(&json) {
        if let Ok(yaml) = serde_yaml::to_value(value) {
            if has_non_finite(&yaml) {
                return Err(LedgerError::UnsupportedType(
                    "non-finite float has no JSON form".to_string(),
                ));
            }
        }
    }
    if opts.sort_keys {
        sort_keys(&mut json);
    }

    let indent = vec![b' '; opts.indent];
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(&indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| LedgerError::UnsupportedType(e.to_string()))
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

fn has_non_finite(value: &serde_yaml::Value) -> bool {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Number(n) => n.as_f64().is_some_and(|f| !f.is_finite()),
        Yaml::Sequence(items) => items.iter().any(has_non_finite),
        Yaml::Mapping(map) => map.iter().any(|(k, v)| has_non_finite(k) || has_non_finite(v)),
        Yaml::Tagged(tagged) => has_non_finite(&tagged.value),
        _ => false,
    }
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Deserialize a JSON string into a value.
pub fn deserialize<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_nested_sequence_is_indented_deeper() {
        let out = pretty_print(&json!({"a": 1, "b": [1, 2]})).unwrap();
        assert_eq!(
            out,
            "{\n    \"a\": 1,\n    \"b\": [\n        1,\n        2\n    ]\n}"
        );
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let out = pretty_print(&json!({"zeta": 1, "alpha": 2})).unwrap();
        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_sorted_keys_recurse() {
        let opts = PrettyOptions {
            sort_keys: true,
            ..PrettyOptions::default()
        };
        let out = pretty_print_with(&json!({"b": {"y": 1, "x": 2}, "a": [{"d": 0, "c": 0}]}), &opts)
            .unwrap();
        let pos = |k: &str| out.find(k).unwrap();
        assert!(pos("\"a\"") < pos("\"b\""));
        assert!(pos("\"c\"") < pos("\"d\""));
        assert!(pos("\"x\"") < pos("\"y\""));
    }

    #[test]
    fn test_custom_indent() {
        let opts = PrettyOptions {
            indent: 2,
            ..PrettyOptions::default()
        };
        let out = pretty_print_with(&json!({"a": [1]}), &opts).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(pretty_print(&json!(null)).unwrap(), "null");
        assert_eq!(pretty_print(&true).unwrap(), "true");
        assert_eq!(pretty_print("full").unwrap(), "\"full\"");
        assert_eq!(pretty_print(&Vec::<u32>::new()).unwrap(), "[]");
    }

    #[test]
    fn test_output_is_deterministic() {
        let value = json!({
            "info": {"build_version": "0.30.1", "peers": 21, "complete_ledgers": "1-5"}
        });
        let first = pretty_print(&value).unwrap();
        for _ in 0..10 {
            assert_eq!(pretty_print(&value).unwrap(), first);
        }
    }

    #[test]
    fn test_non_string_keys_are_unsupported() {
        let mut map: HashMap<(u32, u32), u32> = HashMap::new();
        map.insert((1, 2), 3);
        let err = pretty_print(&map).unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedType(_)));
    }

    #[test]
    fn test_non_finite_floats_are_unsupported() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = pretty_print(&vec![bad]).unwrap_err();
            assert!(matches!(err, LedgerError::UnsupportedType(_)));
        }

        let mut nested: HashMap<String, Vec<f64>> = HashMap::new();
        nested.insert("load".into(), vec![1.5, f64::NAN]);
        assert!(matches!(
            pretty_print(&nested),
            Err(LedgerError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_real_nulls_still_print() {
        let out = pretty_print(&vec![Some(1.5), None]).unwrap();
        assert_eq!(out, "[\n    1.5,\n    null\n]");
    }

    #[test]
    fn test_deserialize() {
        let v: HashMap<String, u32> = deserialize(r#"{"peers": 21}"#).unwrap();
        assert_eq!(v["peers"], 21);
        assert!(deserialize::<HashMap<String, u32>>("not json").is_err());
    }
}
