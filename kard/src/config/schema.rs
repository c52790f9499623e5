//! Environment file schema.
//!
//! An environment lives at `env/<name>/env.yml` and describes how kards of
//! that environment are built: default values, the meta a kard must define,
//! which source paths are materialized, and which generated files are secret.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Parsed `env.yml`.
///
/// # Examples
///
/// ```
/// use kard::config::EnvFile;
///
/// let env: EnvFile = serde_yaml::from_str(
///     "default_meta:\n  port: 8080\nrequired_meta:\n  db:\n    host:\n",
/// )
/// .unwrap();
/// assert!(env.templates.is_empty());
/// assert!(env.required_meta.is_mapping());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvFile {
    /// Other environments merged beneath this one, in order.
    #[serde(default)]
    pub import: Vec<String>,

    /// Default values offered to reconciliation and templates.
    #[serde(default)]
    pub default_meta: Mapping,

    /// Definition of the meta every kard must provide.
    #[serde(default)]
    pub required_meta: Value,

    /// Source paths to materialize into the kard directory.
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,

    /// Exclusion patterns applied to every template entry.
    #[serde(default)]
    pub excluded_paths: Vec<String>,

    /// Secret files, relative to the kard directory.
    #[serde(default)]
    pub secrets: Vec<String>,
}

/// One materialization entry of an environment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    /// Source path relative to the kard root; may contain wildcards.
    pub src: String,

    /// Destination relative to the kard directory (the directory itself when absent).
    #[serde(default)]
    pub dst: Option<String>,

    /// Additional exclusion patterns for this entry only.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether `.template` files are rendered (true) or copied verbatim.
    #[serde(default = "default_render")]
    pub render: bool,
}

const fn default_render() -> bool {
    true
}
