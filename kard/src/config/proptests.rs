//! Property-based tests for the configuration tree engine.

use super::diff::diff;
use super::merger::ConfigMerger;
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

// Scalars only; keeps equality and dedup semantics easy to state.
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,8}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn tree_strategy() -> impl Strategy<Value = Mapping> {
    let leaf = prop_oneof![
        scalar_strategy(),
        prop::collection::vec(scalar_strategy(), 0..5).prop_map(Value::Sequence),
    ];
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-e]", inner, 0..4).prop_map(|entries| {
            Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), v))
                    .collect(),
            )
        })
    });
    prop::collection::btree_map("[a-h]", value, 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, v)| (Value::String(k), v))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    // Merging an empty source is the identity
    #[test]
    fn merge_empty_source_is_identity(destination in tree_strategy(), overwrite in any::<bool>()) {
        prop_assert_eq!(
            ConfigMerger::merge(&Mapping::new(), &destination, overwrite),
            destination
        );
    }

    // Merging into an empty destination keeps every source key
    #[test]
    fn merge_into_empty_keeps_source_keys(source in tree_strategy()) {
        let merged = ConfigMerger::merge(&source, &Mapping::new(), true);
        for key in source.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    // With overwrite, top-level scalars from the source always win
    #[test]
    fn merge_overwrite_source_scalars_win(source in tree_strategy(), destination in tree_strategy()) {
        let merged = ConfigMerger::merge(&source, &destination, true);
        for (key, value) in &source {
            if !value.is_mapping() && !value.is_sequence() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    // Without overwrite, existing top-level scalars are preserved
    #[test]
    fn merge_without_overwrite_preserves_scalars(source in tree_strategy(), destination in tree_strategy()) {
        let merged = ConfigMerger::merge(&source, &destination, false);
        for (key, value) in &destination {
            if !value.is_mapping() && !value.is_sequence() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    // Merging is idempotent for a tree merged with itself
    #[test]
    fn merge_self_is_stable(tree in tree_strategy()) {
        let once = ConfigMerger::merge(&tree, &Mapping::new(), true);
        let twice = ConfigMerger::merge(&once, &once, true);
        prop_assert_eq!(once, twice);
    }

    // A tree never differs from itself
    #[test]
    fn diff_self_is_empty(tree in tree_strategy()) {
        prop_assert!(diff(&tree, &tree).is_empty());
    }

    // Everything diff reports is present in the current tree
    #[test]
    fn diff_keys_come_from_current(previous in tree_strategy(), current in tree_strategy()) {
        let changes = diff(&previous, &current);
        for key in changes.keys() {
            prop_assert!(current.contains_key(key));
        }
    }

    // Against an empty previous tree, the diff is the current tree
    #[test]
    fn diff_against_empty_is_current(current in tree_strategy()) {
        prop_assert_eq!(diff(&Mapping::new(), &current), current);
    }
}
