//! Common test utilities for integration tests.
//!
//! This module provides a fixture builder for kard roots laid out on disk.

use std::fs;
use std::path::{Path, PathBuf};

use kard::KardLayout;
use tempfile::TempDir;

/// A kard root in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct RootFixture {
    temp: TempDir,
}

#[allow(dead_code)]
impl RootFixture {
    /// Creates an empty root.
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    /// Creates a root with `env/<name>/env.yml` holding `contents`.
    pub fn with_env(name: &str, contents: &str) -> Self {
        let fixture = Self::new();
        fixture.env(name, contents);
        fixture
    }

    /// Writes an environment file.
    pub fn env(&self, name: &str, contents: &str) -> &Self {
        self.file(&format!("env/{name}/env.yml"), contents);
        self
    }

    /// Writes `contents` at `relative`, creating parents.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// The root directory.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Layout of the root.
    pub fn layout(&self) -> KardLayout {
        KardLayout::new(self.path())
    }

    /// Path of a file inside kard `kard`.
    pub fn kard_file(&self, kard: &str, relative: &str) -> PathBuf {
        self.layout().kard_dir(kard).join(relative)
    }

    /// Reads a file inside kard `kard`.
    pub fn read_kard_file(&self, kard: &str, relative: &str) -> String {
        fs::read_to_string(self.kard_file(kard, relative)).unwrap()
    }
}

/// Lists every file below `dir`, relative to it, sorted.
#[allow(dead_code)]
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
