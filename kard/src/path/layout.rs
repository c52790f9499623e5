//! Kard root layout and discovery.
//!
//! A kard root is any directory holding at least one `env/<name>/env.yml`.
//! Discovery walks up from a starting directory until it finds one; there is
//! no process-wide notion of "the" root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory holding environment definitions.
pub const ENV_FOLDER: &str = "env";

/// Directory holding materialized kards.
pub const KARD_FOLDER: &str = "kard";

/// File name of an environment definition.
pub const ENV_FILE: &str = "env.yml";

/// File name of a kard's reconciled configuration.
pub const META_FILE: &str = "meta.yml";

/// Paths of a kard root.
///
/// # Examples
///
/// ```
/// use kard::path::KardLayout;
/// use std::path::Path;
///
/// let layout = KardLayout::new("/srv/project");
/// assert_eq!(layout.env_file("dev"), Path::new("/srv/project/env/dev/env.yml"));
/// assert_eq!(layout.kard_dir("alpha"), Path::new("/srv/project/kard/alpha"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KardLayout {
    root: PathBuf,
}

impl KardLayout {
    /// Wrap a root directory without checking it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the nearest kard root at or above `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KardRootNotFound`] when neither `start` nor any of its
    /// ancestors is a kard root.
    pub fn discover(start: &Path) -> Result<Self> {
        discover_root(start)
            .map(Self::new)
            .ok_or_else(|| Error::KardRootNotFound {
                path: start.to_path_buf(),
            })
    }

    /// The root directory; also the template root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/env`.
    #[must_use]
    pub fn env_dir(&self) -> PathBuf {
        self.root.join(ENV_FOLDER)
    }

    /// `<root>/env/<name>/env.yml`.
    #[must_use]
    pub fn env_file(&self, name: &str) -> PathBuf {
        self.env_dir().join(name).join(ENV_FILE)
    }

    /// `<root>/kard`.
    #[must_use]
    pub fn kard_root(&self) -> PathBuf {
        self.root.join(KARD_FOLDER)
    }

    /// `<root>/kard/<name>`.
    #[must_use]
    pub fn kard_dir(&self, name: &str) -> PathBuf {
        self.kard_root().join(name)
    }

    /// `<root>/kard/<name>/meta.yml`.
    #[must_use]
    pub fn meta_file(&self, name: &str) -> PathBuf {
        self.kard_dir(name).join(META_FILE)
    }

    /// Names of the environments defined under `env/`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `env/` exists but cannot be read.
    pub fn environments(&self) -> Result<Vec<String>> {
        let env_dir = self.env_dir();
        if !env_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&env_dir).map_err(|e| Error::io(&env_dir, e))? {
            let entry = entry.map_err(|e| Error::io(&env_dir, e))?;
            if entry.path().join(ENV_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Check whether `dir` holds at least one `env/*/env.yml`.
#[must_use]
pub fn is_kard_root(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let Ok(entries) = fs::read_dir(dir.join(ENV_FOLDER)) else {
        return false;
    };
    entries
        .flatten()
        .any(|entry| entry.path().join(ENV_FILE).is_file())
}

/// Walk up from `start` and return the first kard root found.
///
/// # Examples
///
/// ```
/// use kard::path::discover_root;
/// use std::path::Path;
///
/// assert!(discover_root(Path::new("/definitely/not/a/kard/root")).is_none());
/// ```
#[must_use]
pub fn discover_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| is_kard_root(dir)).map(Path::to_path_buf)
}
