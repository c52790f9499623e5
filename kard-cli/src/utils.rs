//! Utility functions for CLI operations.
//!
//! This module provides helpers shared by the commands: path resolution,
//! kard root discovery, `key=value` meta parsing and display formatting.

use crate::error::CliError;
use kard::path::normalize::normalize;
use kard::secret::{SecretFile, ENCRYPTED_SUFFIX};
use kard::{ConfigMerger, KardLayout};
use serde_yaml::{Mapping, Value};
use std::env;
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Directory to start looking for the kard root from.
    pub path: Option<PathBuf>,

    /// Passphrase for secret files.
    pub password: Option<String>,
}

impl GlobalOptions {
    /// The passphrase as the library expects it.
    pub fn passphrase(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Resolve a path, using CWD if not specified.
///
/// Paths are normalized (made absolute, `~` expanded, `.` and `..` resolved)
/// but not canonicalized, so they may name directories that do not exist yet.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf, CliError> {
    let path_to_resolve = match path {
        Some(p) => p.to_path_buf(),
        None => env::current_dir()?,
    };

    normalize(&path_to_resolve).map_err(CliError::from)
}

/// Find the kard root at or above `--path` (or the current directory).
///
/// # Errors
///
/// Returns `NoKardRoot` if no ancestor holds an `env/*/env.yml`.
pub fn resolve_layout(global: &GlobalOptions) -> Result<KardLayout, CliError> {
    let start = resolve_path(global.path.as_deref())?;
    let layout = KardLayout::discover(&start)?;
    log::debug!("using kard root {}", layout.root().display());
    Ok(layout)
}

/// Parse `key=value` assignments into a configuration tree.
///
/// Dotted keys nest (`db.port=5432` becomes `{db: {port: "5432"}}`); values
/// are kept as strings. Later assignments win.
pub fn parse_meta(assignments: &[String]) -> Result<Mapping, CliError> {
    let mut meta = Mapping::new();

    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            CliError::InvalidArguments(format!("expected key=value, got '{assignment}'"))
        })?;
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(CliError::InvalidArguments(format!(
                "invalid meta key in '{assignment}'"
            )));
        }

        let mut leaf = Value::String(value.to_string());
        for segment in key.rsplit('.') {
            let mut level = Mapping::new();
            level.insert(Value::String(segment.to_string()), leaf);
            leaf = Value::Mapping(level);
        }
        if let Value::Mapping(tree) = leaf {
            ConfigMerger::merge_into(&mut meta, &tree, true);
        }
    }

    Ok(meta)
}

/// The secret pair a user-supplied path names.
///
/// Either half may be given: `secrets.yml` and `secrets.yml.enc` name the
/// same pair.
pub fn secret_pair(path: &Path) -> Result<SecretFile, CliError> {
    let path = resolve_path(Some(path))?;
    let plain = path
        .to_str()
        .and_then(|s| s.strip_suffix(ENCRYPTED_SUFFIX))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        .map_or(path.clone(), PathBuf::from);
    Ok(SecretFile::new(plain))
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
