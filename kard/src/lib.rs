#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # kard
//!
//! A library for materializing templated deployment environments.
//!
//! A kard root holds environment definitions (`env/<name>/env.yml`) and the
//! kards built from them (`kard/<name>/`). Building a kard merges layered
//! configuration, reconciles it against the environment's required meta,
//! renders the source tree into the kard directory and encrypts its secrets.
//!
//! ## Core Types
//!
//! - [`ConfigMerger`] and [`diff`]: deep merge and additive diff of YAML trees
//! - [`Reconciler`] and [`InputProvider`]: filling missing configuration leaves
//! - [`TemplateEngine`] and [`ExclusionSet`]: rendering and tree materialization
//! - [`SecretFile`]: encrypted/plaintext secret pairs
//! - [`KardLayout`]: path discovery and the root's directory layout
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use kard::{ConfigMerger, Reconciler, ScriptedInput};
//! use serde_yaml::{Mapping, Value};
//!
//! let defaults: Mapping = serde_yaml::from_str("db: {host: localhost}").unwrap();
//! let definition: Value = serde_yaml::from_str("db: {host: null, port: null}").unwrap();
//!
//! let mut input = ScriptedInput::new(["5432"]);
//! let meta = Reconciler::new(&mut input)
//!     .complete(&definition, &Value::Mapping(defaults.clone()), &Value::Null)
//!     .unwrap();
//!
//! let context = ConfigMerger::merge(&meta, &defaults, true);
//! assert_eq!(context, serde_yaml::from_str::<Mapping>("db: {host: localhost, port: '5432'}").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod path;
pub mod reconcile;
pub mod secret;
pub mod template;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::{diff, ConfigLoader, ConfigMerger, EnvFile, TemplateEntry};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    init_layout, provision, InitOptions, InitResult, ProvisionOptions, ProvisionResult,
};
pub use path::{discover_root, KardLayout};
pub use reconcile::{InputProvider, NoInput, Reconciler, ScriptedInput, StdinPrompt};
pub use secret::{SecretFile, SecretState};
pub use template::{ExclusionSet, MaterializeStats, TemplateEngine};
