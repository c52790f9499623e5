//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use kard::Error as LibError;
use std::fmt;
use std::path::PathBuf;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// A secret operation needed a passphrase and none was given.
    PasswordRequired,

    /// No kard root at or above the starting directory.
    NoKardRoot(PathBuf),

    /// Configuration error.
    Config(String),

    /// Semantic failure (e.g., files differ under `--exit-code`) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure
    /// - 2: Passphrase required
    /// - 3: No kard root found
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: Template error
    /// - 9: Wrong passphrase or corrupted ciphertext
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::PasswordRequired => 2,
            CliError::NoKardRoot(_) => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
            CliError::Library(lib_err) => match lib_err {
                LibError::Io(_)
                | LibError::PathNotFound { .. }
                | LibError::PermissionDenied { .. }
                | LibError::Walk(_) => 5,
                LibError::Configuration { .. } | LibError::Yaml(_) | LibError::Pattern { .. } => 7,
                LibError::TemplateRender(_) => 8,
                LibError::DecryptionIntegrity { .. } => 9,
                _ => 6,
            },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::PasswordRequired => write!(
                f,
                "Encryption password is not specified (use --password or KARD_PASSWORD)"
            ),
            CliError::NoKardRoot(path) => write!(
                f,
                "{} is not a valid kard path, no usable env found (use --path or run `kard init`)",
                path.display()
            ),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::PasswordRequired => CliError::PasswordRequired,
            LibError::KardRootNotFound { path } => CliError::NoKardRoot(path),
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
