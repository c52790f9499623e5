//! Paths skipped during materialization.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::Result;

/// A fixed set of exclusion patterns.
///
/// Files given directly to the materializer are only skipped when they are a
/// literal member of the set ([`ExclusionSet::contains`]). Entries met while
/// walking a directory are skipped when their absolute path matches any
/// pattern as a shell glob ([`ExclusionSet::matches`]). As with `fnmatch`,
/// `*` also matches `/`, so `/src/*.pyc` excludes compiled files at any
/// depth below `/src`.
///
/// # Examples
///
/// ```
/// use kard::template::ExclusionSet;
/// use std::path::Path;
///
/// let exclusions = ExclusionSet::rooted(Path::new("/srv"), ["src/*.log", "/srv/src/secret.txt"]).unwrap();
/// assert!(exclusions.matches(Path::new("/srv/src/deep/run.log")));
/// assert!(exclusions.contains(Path::new("/srv/src/secret.txt")));
/// assert!(!exclusions.matches(Path::new("/srv/src/main.rs")));
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<PathBuf>,
    globs_source: Vec<String>,
    literals: HashSet<PathBuf>,
    globs: GlobSet,
}

impl ExclusionSet {
    /// Build a set from patterns used as given.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Pattern`] if a pattern is not a valid glob.
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::build(patterns.into_iter().map(|pattern| {
            let pattern = pattern.into();
            let glob = pattern.to_string_lossy().into_owned();
            (pattern, glob)
        }))
    }

    /// Build a set where relative patterns are taken from `root`.
    ///
    /// `root` itself is matched literally, so a directory named `[prod]` or
    /// `{a}` does not turn into a glob.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Pattern`] if a pattern is not a valid glob.
    pub fn rooted<I, P>(root: &Path, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let escaped_root = globset::escape(&root.to_string_lossy());
        Self::build(patterns.into_iter().map(|pattern| {
            let pattern = pattern.as_ref();
            if pattern.is_absolute() {
                (pattern.to_path_buf(), pattern.to_string_lossy().into_owned())
            } else {
                let glob = format!(
                    "{}/{}",
                    escaped_root.trim_end_matches('/'),
                    pattern.to_string_lossy()
                );
                (root.join(pattern), glob)
            }
        }))
    }

    fn build(entries: impl Iterator<Item = (PathBuf, String)>) -> Result<Self> {
        let (patterns, globs_source): (Vec<PathBuf>, Vec<String>) = entries.unzip();

        let mut builder = GlobSetBuilder::new();
        for glob in &globs_source {
            builder.add(Glob::new(glob)?);
        }

        Ok(Self {
            literals: patterns.iter().cloned().collect(),
            globs: builder.build()?,
            patterns,
            globs_source,
        })
    }

    /// A set excluding nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            globs_source: Vec::new(),
            literals: HashSet::new(),
            globs: GlobSet::empty(),
        }
    }

    /// Return a new set holding the patterns of both sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined set cannot be compiled.
    pub fn union(&self, other: &Self) -> Result<Self> {
        let left = self.patterns.iter().zip(&self.globs_source);
        let right = other.patterns.iter().zip(&other.globs_source);
        Self::build(
            left.chain(right)
                .map(|(pattern, glob)| (pattern.clone(), glob.clone())),
        )
    }

    /// Whether `path` is literally one of the patterns.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.literals.contains(path)
    }

    /// Whether `path` matches any pattern as a glob.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.globs.is_match(path)
    }

    /// The patterns of the set.
    #[must_use]
    pub fn patterns(&self) -> &[PathBuf] {
        &self.patterns
    }

    /// Whether the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_membership_is_exact() {
        let exclusions = ExclusionSet::new(["/src/b.txt"]).unwrap();
        assert!(exclusions.contains(Path::new("/src/b.txt")));
        assert!(!exclusions.contains(Path::new("/src/b.txt.bak")));
        assert!(!exclusions.contains(Path::new("/src")));
    }

    #[test]
    fn test_glob_is_not_substring() {
        let exclusions = ExclusionSet::new(["/src/node_modules"]).unwrap();
        assert!(exclusions.matches(Path::new("/src/node_modules")));
        assert!(!exclusions.matches(Path::new("/src/node_modules_backup")));
        assert!(!exclusions.matches(Path::new("/other/src/node_modules")));
    }

    #[test]
    fn test_star_crosses_directories() {
        let exclusions = ExclusionSet::new(["/src/*.pyc"]).unwrap();
        assert!(exclusions.matches(Path::new("/src/a.pyc")));
        assert!(exclusions.matches(Path::new("/src/pkg/mod/a.pyc")));
        assert!(!exclusions.matches(Path::new("/src/a.py")));
    }

    #[test]
    fn test_rooted_keeps_absolute_patterns() {
        let exclusions = ExclusionSet::rooted(Path::new("/srv"), ["/abs/x", "rel/y"]).unwrap();
        assert_eq!(
            exclusions.patterns(),
            [PathBuf::from("/abs/x"), PathBuf::from("/srv/rel/y")]
        );
    }

    #[test]
    fn test_rooted_matches_root_literally() {
        let exclusions = ExclusionSet::rooted(Path::new("/srv/[prod]"), ["*.log"]).unwrap();
        assert!(exclusions.matches(Path::new("/srv/[prod]/app/run.log")));
        assert!(!exclusions.matches(Path::new("/srv/p/app/run.log")));
        assert!(exclusions.contains(Path::new("/srv/[prod]/*.log")));
    }

    #[test]
    fn test_union() {
        let left = ExclusionSet::new(["/a"]).unwrap();
        let right = ExclusionSet::new(["/b/*"]).unwrap();
        let both = left.union(&right).unwrap();
        assert!(both.contains(Path::new("/a")));
        assert!(both.matches(Path::new("/b/c")));
    }

    #[test]
    fn test_empty_set() {
        let exclusions = ExclusionSet::empty();
        assert!(exclusions.is_empty());
        assert!(!exclusions.matches(Path::new("/anything")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ExclusionSet::new(["/src/[oops"]).unwrap_err();
        assert!(matches!(err, crate::Error::Pattern { .. }));
    }
}
