//! Normalization of user-supplied paths.
//!
//! Paths given on the command line or through `KARD_PATH` may use `~`, be
//! relative, or contain `.` and `..`. Normalizing them yields an absolute
//! path without following symlinks, which is what discovery walks up from.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` to the home directory.
///
/// `~user` syntax is not supported.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory
/// cannot be determined, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use kard::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("project"));
///
/// assert_eq!(expand_tilde(Path::new("/absolute")).unwrap(), Path::new("/absolute"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "path contains invalid UTF-8".to_string(),
    })?;

    let Some(rest) = path_str.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "cannot determine home directory".to_string(),
    })?;

    if rest.is_empty() {
        return Ok(home);
    }
    match rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Some(tail) => Ok(home.join(tail)),
        None => Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        }),
    }
}

/// Resolve `.` and `..` components lexically.
///
/// # Errors
///
/// Returns an error if `..` would climb above the root.
///
/// # Examples
///
/// ```
/// use kard::path::normalize::resolve_components;
/// use std::path::PathBuf;
///
/// let resolved = resolve_components("/a/./b/../c".as_ref()).unwrap();
/// assert_eq!(resolved, PathBuf::from("/a/c"));
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::RootDir => result.push(component),
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "path contains too many '..' components".to_string(),
                    });
                }
            }
        }
    }

    Ok(result)
}

/// Normalize a path to absolute form.
///
/// Expands `~`, joins relative paths onto the current directory, and
/// resolves `.` and `..`. Symlinks are left alone.
///
/// # Errors
///
/// Returns an error if tilde expansion fails, the current directory cannot
/// be determined, or the path escapes the root.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("cannot get current directory: {e}"),
        })?;
        cwd.join(expanded)
    };

    resolve_components(&absolute)
}
