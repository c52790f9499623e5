//! Configuration file loading.
//!
//! This module reads YAML configuration layers from disk and resolves
//! environment imports into a single [`EnvFile`].

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::merger::ConfigMerger;
use crate::config::schema::EnvFile;
use crate::error::{Error, Result};
use crate::path::KardLayout;

/// Configuration layer with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path the layer was read from.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration tree.
    pub tree: Mapping,
}

/// Loads configuration layers and environment files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and parse a YAML mapping.
    ///
    /// An empty document yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the YAML is invalid, or
    /// the document is not a mapping.
    pub fn load_file(path: &Path) -> Result<Mapping> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(path, &contents)
    }

    /// Load a YAML mapping if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(path: &Path) -> Result<Option<Mapping>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_file(path).map(Some)
    }

    /// Load every existing layer, sorted from lowest to highest precedence.
    ///
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing layer cannot be read or parsed.
    pub fn load_layers<I>(layers: I) -> Result<Vec<ConfigSource>>
    where
        I: IntoIterator<Item = (PathBuf, u8)>,
    {
        let mut sources = Vec::new();
        for (path, precedence) in layers {
            if let Some(tree) = Self::load_optional(&path)? {
                sources.push(ConfigSource {
                    path,
                    precedence,
                    tree,
                });
            }
        }
        sources.sort_by_key(|s| s.precedence);
        Ok(sources)
    }

    /// Load the environment `name`, merging its imports beneath it.
    ///
    /// Imports are resolved depth-first; each imported environment is merged
    /// in listed order and the importing file is merged last, so it wins.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment file is missing or malformed, or
    /// if the imports form a cycle.
    pub fn load_env(layout: &KardLayout, name: &str) -> Result<EnvFile> {
        let mut stack = Vec::new();
        let tree = Self::load_env_tree(layout, name, &mut stack)?;
        serde_yaml::from_value(Value::Mapping(tree)).map_err(|e| {
            Error::configuration(format!(
                "invalid environment '{name}' in {}: {e}",
                layout.env_file(name).display()
            ))
        })
    }

    /// Serialize a mapping to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write_file(path: &Path, tree: &Mapping) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let contents = serde_yaml::to_string(tree)?;
        fs::write(path, contents).map_err(|e| Error::io(path, e))
    }

    fn load_env_tree(layout: &KardLayout, name: &str, stack: &mut Vec<String>) -> Result<Mapping> {
        if stack.iter().any(|seen| seen == name) {
            stack.push(name.to_string());
            return Err(Error::configuration(format!(
                "environment import cycle: {}",
                stack.join(" -> ")
            )));
        }
        stack.push(name.to_string());

        let own = Self::load_file(&layout.env_file(name))?;
        let mut result = Mapping::new();
        for import in Self::imports_of(name, &own)? {
            log::debug!("environment '{name}' imports '{import}'");
            let imported = Self::load_env_tree(layout, &import, stack)?;
            ConfigMerger::merge_into(&mut result, &imported, true);
        }
        ConfigMerger::merge_into(&mut result, &own, true);

        stack.pop();
        Ok(result)
    }

    fn imports_of(name: &str, tree: &Mapping) -> Result<Vec<String>> {
        match tree.get("import") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::configuration(format!(
                            "environment '{name}' has a non-string import entry"
                        ))
                    })
                })
                .collect(),
            Some(_) => Err(Error::configuration(format!(
                "environment '{name}': 'import' must be a list"
            ))),
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Mapping> {
        let value: Value = serde_yaml::from_str(contents).map_err(|e| {
            Error::configuration(format!("invalid YAML in {}: {e}", path.display()))
        })?;
        match value {
            Value::Null => Ok(Mapping::new()),
            Value::Mapping(map) => Ok(map),
            _ => Err(Error::configuration(format!(
                "{} must contain a mapping",
                path.display()
            ))),
        }
    }
}
