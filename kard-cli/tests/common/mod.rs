//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing:
//! - An isolated kard root in a temporary directory
//! - Command builders that ignore the caller's `KARD_*` environment
//! - File helpers for writing fixtures and reading results

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment rooted in a temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory, used as the kard root
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an empty test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Create a test environment holding `env/<name>/env.yml`.
    pub fn with_env(name: &str, contents: &str) -> Self {
        let env = Self::new();
        env.write(&format!("env/{name}/env.yml"), contents);
        env
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Inherited `KARD_*` variables are removed so tests see defaults.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("kard").expect("Failed to find kard binary");
        cmd.env_remove("KARD_PATH")
            .env_remove("KARD_PASSWORD")
            .env_remove("KARD_LOG_MODE")
            .current_dir(&self.root);
        cmd
    }

    /// Get a command builder with `--path` pointing at the root.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--path").arg(&self.root);
        cmd
    }

    /// Get the root path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a file below the root, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Read a file below the root.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Check whether a path below the root exists.
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}
