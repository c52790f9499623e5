//! Error types for the kard library.
//!
//! This module provides the error hierarchy shared by every kard component,
//! using `thiserror` for ergonomic error handling. None of these errors are
//! retried internally; they propagate to the caller untouched.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for operations that may fail with a kard error.
///
/// # Examples
///
/// ```
/// use kard::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the kard library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot be reconciled or is malformed.
    #[error("configuration error: {message}")]
    Configuration {
        /// A description of the problem.
        message: String,
    },

    /// A template failed to load or render.
    #[error("template error: {0}")]
    TemplateRender(#[from] minijinja::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A path does not exist.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied accessing a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// Walking a directory tree failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Encryption or decryption was attempted without a passphrase.
    #[error("encryption password is not specified (use --password or KARD_PASSWORD)")]
    PasswordRequired,

    /// Ciphertext failed padding validation.
    #[error("incorrect decryption password or corrupted data: {}", path.display())]
    DecryptionIntegrity {
        /// The file (or `-` for in-memory data) that failed to decrypt.
        path: PathBuf,
    },

    /// No usable kard root was found walking up from a directory.
    #[error("{} is not a valid kard path, no usable env found", path.display())]
    KardRootNotFound {
        /// The directory the search started from.
        path: PathBuf,
    },

    /// A YAML document could not be parsed or produced.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An exclusion or wildcard pattern is invalid.
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },
}

impl Error {
    /// Builds a configuration error from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classifies an I/O error that happened while accessing `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kard::Error;
    /// use std::io;
    /// use std::path::Path;
    ///
    /// let err = Error::io(Path::new("/missing"), io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_not_found());
    /// ```
    pub fn io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io(err),
        }
    }

    /// Check if error indicates a path does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// Check if error is permission-related.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if a passphrase was missing.
    #[must_use]
    pub fn is_password_required(&self) -> bool {
        matches!(self, Self::PasswordRequired)
    }

    /// Check if decryption failed integrity validation.
    #[must_use]
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionIntegrity { .. })
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Self::Pattern {
            pattern: err.glob().unwrap_or_default().to_string(),
            reason: err.kind().to_string(),
        }
    }
}
