//! Deep merging of configuration trees.
//!
//! Configuration layers (environment defaults, imported environments, kard
//! meta, command-line overrides) are plain YAML mappings. This module combines
//! them with the following rules, applied key by key from the source layer:
//!
//! - Mappings merge recursively.
//! - Sequences concatenate (destination first) and are deduplicated keeping
//!   the first occurrence. When an element is itself a mapping or sequence,
//!   deduplication is skipped and the source elements are simply appended.
//! - Scalars replace the destination value when `overwrite` is set, otherwise
//!   they only fill keys the destination lacks.
//!
//! With `overwrite` set, a destination value of the wrong shape is replaced by
//! an empty mapping or sequence before merging. Without it, the destination
//! value wins and the source entry is ignored.

use std::collections::HashSet;

use serde_yaml::{Mapping, Value};

use crate::config::loader::ConfigSource;

/// Merges configuration trees according to precedence rules.
///
/// # Examples
///
/// ```
/// use kard::config::ConfigMerger;
/// use serde_yaml::Mapping;
///
/// let low: Mapping = serde_yaml::from_str("a: 1\nb: 1").unwrap();
/// let high: Mapping = serde_yaml::from_str("a: 2").unwrap();
///
/// let merged = ConfigMerger::merge(&high, &low, true);
/// assert_eq!(merged, serde_yaml::from_str::<Mapping>("a: 2\nb: 1").unwrap());
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge `source` over a copy of `destination` and return the result.
    ///
    /// Neither input is modified; callers decide which layer to keep.
    #[must_use]
    pub fn merge(source: &Mapping, destination: &Mapping, overwrite: bool) -> Mapping {
        let mut result = destination.clone();
        Self::merge_into(&mut result, source, overwrite);
        result
    }

    /// Merge arbitrary values, treating non-mapping inputs as absent.
    ///
    /// A source that is not a mapping (including `null`) leaves the
    /// destination unchanged; a destination that is not a mapping is treated
    /// as an empty one.
    #[must_use]
    pub fn merge_values(source: &Value, destination: &Value, overwrite: bool) -> Value {
        let Value::Mapping(source) = source else {
            return destination.clone();
        };
        let destination = match destination {
            Value::Mapping(map) => map.clone(),
            _ => Mapping::new(),
        };
        let mut result = destination;
        Self::merge_into(&mut result, source, overwrite);
        Value::Mapping(result)
    }

    /// Merge multiple configuration sources into one tree.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge_layers(sources: Vec<ConfigSource>) -> Mapping {
        let mut sources = sources;
        sources.sort_by_key(|s| s.precedence);

        let mut result = Mapping::new();
        for source in sources {
            Self::merge_into(&mut result, &source.tree, true);
        }
        result
    }

    /// Merge `source` into `target` in place.
    pub fn merge_into(target: &mut Mapping, source: &Mapping, overwrite: bool) {
        for (key, value) in source {
            match value {
                Value::Mapping(source_map) => {
                    Self::merge_mapping_entry(target, key, source_map, overwrite);
                }
                Value::Sequence(source_seq) => {
                    Self::merge_sequence_entry(target, key, source_seq, overwrite);
                }
                _ => {
                    if overwrite || !target.contains_key(key) {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }

    fn merge_mapping_entry(target: &mut Mapping, key: &Value, source: &Mapping, overwrite: bool) {
        if let Some(Value::Mapping(node)) = target.get_mut(key) {
            Self::merge_into(node, source, overwrite);
            return;
        }
        if target.contains_key(key) && !overwrite {
            return;
        }

        let mut node = Mapping::new();
        Self::merge_into(&mut node, source, overwrite);
        target.insert(key.clone(), Value::Mapping(node));
    }

    fn merge_sequence_entry(target: &mut Mapping, key: &Value, source: &[Value], overwrite: bool) {
        if let Some(Value::Sequence(existing)) = target.get_mut(key) {
            let mut combined = std::mem::take(existing);
            combined.extend(source.iter().cloned());
            *existing = dedup_sequence(combined);
            return;
        }
        if target.contains_key(key) && !overwrite {
            return;
        }

        target.insert(key.clone(), Value::Sequence(dedup_sequence(source.to_vec())));
    }
}

/// Drop repeated scalars, keeping first occurrences in order.
///
/// Sequences holding mappings or sequences are returned untouched.
fn dedup_sequence(items: Vec<Value>) -> Vec<Value> {
    if !items.iter().all(is_scalar) {
        return items;
    }

    let mut seen = HashSet::with_capacity(items.len());
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            result.push(item);
        }
    }
    result
}

fn is_scalar(value: &Value) -> bool {
    !matches!(
        value,
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn yaml(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_scalar_overwrite() {
        let first = ConfigMerger::merge(&yaml("a: 1"), &Mapping::new(), true);
        let second = ConfigMerger::merge(&yaml("a: 2"), &first, true);
        assert_eq!(second, yaml("a: 2"));
    }

    #[test]
    fn test_scalar_no_overwrite() {
        let first = ConfigMerger::merge(&yaml("a: 1"), &Mapping::new(), false);
        let second = ConfigMerger::merge(&yaml("a: 2"), &first, false);
        assert_eq!(second, yaml("a: 1"));
    }

    #[test]
    fn test_no_overwrite_fills_missing_keys() {
        let merged = ConfigMerger::merge(&yaml("a: 2\nb: 3"), &yaml("a: 1"), false);
        assert_eq!(merged, yaml("a: 1\nb: 3"));
    }

    #[test]
    fn test_empty_source_returns_destination() {
        let destination = yaml("a: 1\nnested: {b: 2}");
        assert_eq!(
            ConfigMerger::merge(&Mapping::new(), &destination, true),
            destination
        );
    }

    #[test]
    fn test_merge_values_null_source() {
        let destination = Value::Mapping(yaml("a: 1"));
        assert_eq!(
            ConfigMerger::merge_values(&Value::Null, &destination, true),
            destination
        );
    }

    #[test]
    fn test_merge_values_null_destination() {
        let source = Value::Mapping(yaml("a: 1"));
        assert_eq!(
            ConfigMerger::merge_values(&source, &Value::Null, true),
            source
        );
    }

    #[test]
    fn test_list_dedup_order() {
        let merged = ConfigMerger::merge(&yaml("l: [1, 2]"), &yaml("l: [2, 3]"), true);
        assert_eq!(merged, yaml("l: [2, 3, 1]"));
    }

    #[test]
    fn test_list_of_mappings_appends() {
        let merged = ConfigMerger::merge(
            &yaml("l: [{a: 1}]"),
            &yaml("l: [{a: 1}, {b: 2}]"),
            true,
        );
        assert_eq!(merged, yaml("l: [{a: 1}, {b: 2}, {a: 1}]"));
    }

    #[test]
    fn test_list_into_absent_key() {
        let merged = ConfigMerger::merge(&yaml("l: [x, y, x]"), &Mapping::new(), false);
        assert_eq!(merged, yaml("l: [x, y]"));
    }

    #[test]
    fn test_list_replaces_scalar_with_overwrite() {
        let merged = ConfigMerger::merge(&yaml("l: [1]"), &yaml("l: foo"), true);
        assert_eq!(merged, yaml("l: [1]"));
    }

    #[test]
    fn test_list_keeps_scalar_without_overwrite() {
        let merged = ConfigMerger::merge(&yaml("l: [1]"), &yaml("l: foo"), false);
        assert_eq!(merged, yaml("l: foo"));
    }

    #[test]
    fn test_nested_merge() {
        let merged = ConfigMerger::merge(
            &yaml("db: {port: 5432, opts: [ssl]}"),
            &yaml("db: {host: x, port: 1, opts: [fast]}"),
            true,
        );
        assert_eq!(
            merged,
            yaml("db: {host: x, port: 5432, opts: [fast, ssl]}")
        );
    }

    #[test]
    fn test_mapping_replaces_scalar_with_overwrite() {
        let merged = ConfigMerger::merge(&yaml("db: {host: x}"), &yaml("db: none"), true);
        assert_eq!(merged, yaml("db: {host: x}"));
    }

    #[test]
    fn test_mapping_keeps_scalar_without_overwrite() {
        let merged = ConfigMerger::merge(&yaml("db: {host: x}"), &yaml("db: none"), false);
        assert_eq!(merged, yaml("db: none"));
    }

    #[test]
    fn test_merge_does_not_touch_source() {
        let source = yaml("db: {host: x}\nl: [1]");
        let snapshot = source.clone();
        let _ = ConfigMerger::merge(&source, &yaml("db: {port: 1}\nl: [2]"), true);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_null_scalar_overwrites() {
        let merged = ConfigMerger::merge(&yaml("a: null"), &yaml("a: 1"), true);
        assert_eq!(merged, yaml("a: null"));
    }

    #[test]
    fn test_merge_layers_by_precedence() {
        let sources = vec![
            ConfigSource {
                path: PathBuf::from("kard/dev/meta.yml"),
                precedence: 2,
                tree: yaml("name: kard\ntags: [b]"),
            },
            ConfigSource {
                path: PathBuf::from("env/dev/env.yml"),
                precedence: 1,
                tree: yaml("name: env\nport: 80\ntags: [a]"),
            },
        ];

        let merged = ConfigMerger::merge_layers(sources);
        assert_eq!(merged, yaml("name: kard\nport: 80\ntags: [a, b]"));
    }
}
