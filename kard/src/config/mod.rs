//! Layered configuration for kard.
//!
//! This module provides the configuration tree engine and its file layers:
//! - Deep merging of YAML mappings ([`ConfigMerger`])
//! - Additive diffing of trees ([`diff`])
//! - YAML layer loading and environment import resolution ([`ConfigLoader`])
//! - The typed `env.yml` schema ([`EnvFile`])
//!
//! # Configuration Precedence
//!
//! When a kard is provisioned, configuration is combined from these layers
//! (highest to lowest):
//!
//! 1. Meta given on the command line
//! 2. The kard's saved `meta.yml`
//! 3. The environment's `default_meta`
//! 4. `default_meta` of imported environments, in import order
//!
//! # Examples
//!
//! ```
//! use kard::config::{diff, ConfigMerger};
//! use serde_yaml::Mapping;
//!
//! let defaults: Mapping = serde_yaml::from_str("port: 80\ntags: [web]").unwrap();
//! let meta: Mapping = serde_yaml::from_str("port: 8080\ntags: [api]").unwrap();
//!
//! let merged = ConfigMerger::merge(&meta, &defaults, true);
//! let changes = diff(&defaults, &merged);
//! assert_eq!(changes, serde_yaml::from_str::<Mapping>("port: 8080\ntags: [api]").unwrap());
//! ```

pub mod diff;
pub mod loader;
pub mod merger;
pub mod schema;

#[cfg(test)]
mod proptests;

pub use diff::diff;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{EnvFile, TemplateEntry};
