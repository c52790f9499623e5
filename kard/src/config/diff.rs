//! Additive differences between configuration trees.
//!
//! [`diff`] reports what `current` adds or changes relative to `previous`.
//! Removed keys and removed sequence elements are not reported: the result is
//! additive-only, and callers relying on it must not treat an empty diff as
//! proof that two trees are equal.

use serde_yaml::{Mapping, Value};

/// Return the entries of `current` that are new or changed relative to `previous`.
///
/// - Keys absent from `previous` (or `null` there) are included wholesale.
/// - Mappings present on both sides recurse and are included when the nested
///   diff is non-empty.
/// - Sequences present on both sides contribute the elements of `current`
///   missing from `previous`, in their original order.
/// - Any other value is included when it differs.
///
/// # Examples
///
/// ```
/// use kard::config::diff;
/// use serde_yaml::Mapping;
///
/// let previous: Mapping = serde_yaml::from_str("a: 1").unwrap();
/// let current: Mapping = serde_yaml::from_str("a: 1\nb: 2").unwrap();
///
/// assert_eq!(diff(&previous, &current), serde_yaml::from_str::<Mapping>("b: 2").unwrap());
/// assert!(diff(&current, &previous).is_empty());
/// ```
#[must_use]
pub fn diff(previous: &Mapping, current: &Mapping) -> Mapping {
    let mut result = Mapping::new();

    for (key, value) in current {
        let previous_value = match previous.get(key) {
            None | Some(Value::Null) => {
                result.insert(key.clone(), value.clone());
                continue;
            }
            Some(previous_value) => previous_value,
        };

        match (value, previous_value) {
            (Value::Mapping(current_map), Value::Mapping(previous_map)) => {
                let nested = diff(previous_map, current_map);
                if !nested.is_empty() {
                    result.insert(key.clone(), Value::Mapping(nested));
                }
            }
            (Value::Sequence(current_seq), Value::Sequence(previous_seq)) => {
                let added: Vec<Value> = current_seq
                    .iter()
                    .filter(|item| !previous_seq.contains(item))
                    .cloned()
                    .collect();
                if !added.is_empty() {
                    result.insert(key.clone(), Value::Sequence(added));
                }
            }
            _ => {
                if value != previous_value {
                    result.insert(key.clone(), value.clone());
                }
            }
        }
    }

    result
}
