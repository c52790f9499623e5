//! Schema reconciliation.
//!
//! An environment's `required_meta` is a definition tree naming every value
//! a kard must provide. Reconciliation walks that tree against the kard's
//! data and the environment defaults and asks an [`InputProvider`] for
//! whatever neither supplies.
//!
//! # Definition format
//!
//! - A mapping entry whose value is `null` is a leaf.
//! - A mapping entry whose value is a mapping, sequence or string nests: the
//!   data and defaults are looked up under that key for everything below it.
//! - A sequence is a list of definitions reconciled at the same level.
//! - A bare string is a leaf with that name.
//!
//! Leaves resolve from, in order: the data, the defaults, the input provider
//! (prompted with the dotted path of the leaf, e.g. `db.port`).
//!
//! # Examples
//!
//! ```
//! use kard::reconcile::{Reconciler, ScriptedInput};
//! use serde_yaml::Value;
//!
//! let definition: Value = serde_yaml::from_str("db: {host: null, port: null}").unwrap();
//! let data: Value = serde_yaml::from_str("db: {host: x}").unwrap();
//! let mut input = ScriptedInput::new(["42"]);
//!
//! let leaves = Reconciler::new(&mut input)
//!     .reconcile(&definition, &Value::Null, &data)
//!     .unwrap();
//! assert_eq!(leaves, serde_yaml::from_str::<serde_yaml::Mapping>("{host: x, port: '42'}").unwrap());
//! assert_eq!(input.asked(), ["db.port"]);
//! ```

mod input;

pub use input::{InputProvider, NoInput, ScriptedInput, StdinPrompt};

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// A resolved leaf: where it sits in the definition and its value.
#[derive(Debug, Clone, PartialEq)]
struct Leaf {
    parents: Vec<String>,
    name: String,
    value: Value,
}

/// Walks definition trees, prompting through an injected input provider.
pub struct Reconciler<'a> {
    input: &'a mut dyn InputProvider,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler that asks `input` for missing values.
    pub fn new(input: &'a mut dyn InputProvider) -> Self {
        Self { input }
    }

    /// Resolve every leaf of `definition` into a flat `name -> value` mapping.
    ///
    /// When two leaves share a name, the one visited last wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is malformed or the input provider
    /// fails.
    pub fn reconcile(
        &mut self,
        definition: &Value,
        defaults: &Value,
        data: &Value,
    ) -> Result<Mapping> {
        let mut result = Mapping::new();
        for leaf in self.resolve(definition, defaults, data)? {
            result.insert(Value::String(leaf.name), leaf.value);
        }
        Ok(result)
    }

    /// Resolve every leaf of `definition`, keeping the definition's nesting.
    ///
    /// The result has the shape of the data a kard stores in its meta, so it
    /// can be merged back over that data.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is malformed or the input provider
    /// fails.
    pub fn complete(
        &mut self,
        definition: &Value,
        defaults: &Value,
        data: &Value,
    ) -> Result<Mapping> {
        let mut result = Mapping::new();
        for leaf in self.resolve(definition, defaults, data)? {
            insert_nested(&mut result, &leaf.parents, leaf.name, leaf.value);
        }
        Ok(result)
    }

    fn resolve(
        &mut self,
        definition: &Value,
        defaults: &Value,
        data: &Value,
    ) -> Result<Vec<Leaf>> {
        let mut leaves = Vec::new();
        self.walk(definition, defaults, data, &mut Vec::new(), &mut leaves)?;
        Ok(leaves)
    }

    fn walk(
        &mut self,
        definition: &Value,
        defaults: &Value,
        data: &Value,
        parents: &mut Vec<String>,
        leaves: &mut Vec<Leaf>,
    ) -> Result<()> {
        match definition {
            Value::Null => Ok(()),
            Value::String(name) => {
                let value = self.ensure_present(name, defaults, data, parents)?;
                leaves.push(Leaf {
                    parents: parents.clone(),
                    name: name.clone(),
                    value,
                });
                Ok(())
            }
            Value::Sequence(elements) => {
                for element in elements {
                    self.walk(element, defaults, data, parents, leaves)?;
                }
                Ok(())
            }
            Value::Mapping(entries) => {
                for (key, nested) in entries {
                    let name = key_name(key, parents)?;
                    if nested.is_null() {
                        let value = self.ensure_present(&name, defaults, data, parents)?;
                        leaves.push(Leaf {
                            parents: parents.clone(),
                            name,
                            value,
                        });
                        continue;
                    }

                    let child_defaults = lookup(defaults, &name).cloned().unwrap_or(Value::Null);
                    let child_data = lookup(data, &name).cloned().unwrap_or(Value::Null);
                    parents.push(name);
                    let walked = self.walk(nested, &child_defaults, &child_data, parents, leaves);
                    parents.pop();
                    walked?;
                }
                Ok(())
            }
            other => Err(Error::configuration(format!(
                "invalid definition entry under '{}': {other:?}",
                dotted(parents, "")
            ))),
        }
    }

    fn ensure_present(
        &mut self,
        name: &str,
        defaults: &Value,
        data: &Value,
        parents: &[String],
    ) -> Result<Value> {
        if let Some(value) = lookup(data, name) {
            return Ok(value.clone());
        }
        if let Some(value) = lookup(defaults, name) {
            return Ok(value.clone());
        }

        let label = dotted(parents, name);
        log::debug!("prompting for missing meta '{label}'");
        self.input.prompt_for_value(&label).map(Value::String)
    }
}

/// Store `value` under `parents.. name`, replacing non-mapping parents.
fn insert_nested(node: &mut Mapping, parents: &[String], name: String, value: Value) {
    let Some((first, rest)) = parents.split_first() else {
        node.insert(Value::String(name), value);
        return;
    };

    let key = Value::String(first.clone());
    if !matches!(node.get(&key), Some(Value::Mapping(_))) {
        node.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    if let Some(Value::Mapping(child)) = node.get_mut(&key) {
        insert_nested(child, rest, name, value);
    }
}

/// Non-null value of `name` in `tree`, if `tree` is a mapping holding it.
fn lookup<'v>(tree: &'v Value, name: &str) -> Option<&'v Value> {
    match tree.as_mapping()?.get(name)? {
        Value::Null => None,
        value => Some(value),
    }
}

fn key_name(key: &Value, parents: &[String]) -> Result<String> {
    key.as_str().map(str::to_string).ok_or_else(|| {
        Error::configuration(format!(
            "definition keys must be strings, found {key:?} under '{}'",
            dotted(parents, "")
        ))
    })
}

fn dotted(parents: &[String], name: &str) -> String {
    let mut parts: Vec<&str> = parents.iter().map(String::as_str).collect();
    if !name.is_empty() {
        parts.push(name);
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn mapping(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_data_then_prompt() {
        let mut input = ScriptedInput::new(["42"]);
        let leaves = Reconciler::new(&mut input)
            .reconcile(
                &yaml("db: {host: null, port: null}"),
                &yaml("{}"),
                &yaml("db: {host: x}"),
            )
            .unwrap();

        assert_eq!(leaves, mapping("{host: x, port: '42'}"));
        assert_eq!(input.asked(), ["db.port"]);
    }

    #[test]
    fn test_defaults_before_prompt() {
        let mut input = ScriptedInput::default();
        let leaves = Reconciler::new(&mut input)
            .reconcile(
                &yaml("{host: null, port: null}"),
                &yaml("{port: 5432}"),
                &yaml("{host: db}"),
            )
            .unwrap();

        assert_eq!(leaves, mapping("{host: db, port: 5432}"));
        assert!(input.asked().is_empty());
    }

    #[test]
    fn test_data_wins_over_defaults() {
        let mut input = ScriptedInput::default();
        let leaves = Reconciler::new(&mut input)
            .reconcile(&yaml("{port: null}"), &yaml("{port: 1}"), &yaml("{port: 2}"))
            .unwrap();
        assert_eq!(leaves, mapping("{port: 2}"));
    }

    #[test]
    fn test_null_data_is_missing() {
        let mut input = ScriptedInput::new(["filled"]);
        let leaves = Reconciler::new(&mut input)
            .reconcile(&yaml("{name: null}"), &Value::Null, &yaml("{name: null}"))
            .unwrap();
        assert_eq!(leaves, mapping("{name: filled}"));
    }

    #[test]
    fn test_list_definition_merges_elements() {
        let mut input = ScriptedInput::new(["p"]);
        let leaves = Reconciler::new(&mut input)
            .reconcile(
                &yaml("[project, {user: null}]"),
                &yaml("{user: admin}"),
                &Value::Null,
            )
            .unwrap();

        assert_eq!(leaves, mapping("{project: p, user: admin}"));
        assert_eq!(input.asked(), ["project"]);
    }

    #[test]
    fn test_list_collision_last_wins() {
        let mut input = ScriptedInput::default();
        let leaves = Reconciler::new(&mut input)
            .reconcile(
                &yaml("[{a: {name: null}}, {b: {name: null}}]"),
                &Value::Null,
                &yaml("{a: {name: first}, b: {name: second}}"),
            )
            .unwrap();
        assert_eq!(leaves, mapping("{name: second}"));
    }

    #[test]
    fn test_complete_keeps_nesting() {
        let mut input = ScriptedInput::new(["secret"]);
        let tree = Reconciler::new(&mut input)
            .complete(
                &yaml("{project: null, db: {host: null, auth: {password: null}}}"),
                &yaml("{db: {host: localhost}}"),
                &yaml("{project: demo}"),
            )
            .unwrap();

        assert_eq!(
            tree,
            mapping("{project: demo, db: {host: localhost, auth: {password: secret}}}")
        );
        assert_eq!(input.asked(), ["db.auth.password"]);
    }

    #[test]
    fn test_every_leaf_once() {
        let mut input = ScriptedInput::new(["1", "2", "3"]);
        let leaves = Reconciler::new(&mut input)
            .reconcile(&yaml("{a: null, b: {c: null, d: [e]}}"), &Value::Null, &Value::Null)
            .unwrap();

        assert_eq!(leaves.len(), 3);
        assert_eq!(input.asked(), ["a", "b.c", "b.d.e"]);
    }

    #[test]
    fn test_invalid_definition_entry() {
        let mut input = ScriptedInput::default();
        let err = Reconciler::new(&mut input)
            .reconcile(&yaml("{db: 5}"), &Value::Null, &Value::Null)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut input = NoInput;
        let err = Reconciler::new(&mut input)
            .reconcile(&yaml("{token: null}"), &Value::Null, &Value::Null)
            .unwrap_err();
        assert!(format!("{err}").contains("token"));
    }

    #[test]
    fn test_empty_definition() {
        let mut input = NoInput;
        let leaves = Reconciler::new(&mut input)
            .reconcile(&Value::Null, &Value::Null, &Value::Null)
            .unwrap();
        assert!(leaves.is_empty());
    }
}
