//! Copying and rendering source trees into a kard.

use std::fs::{self, File, FileTimes};
use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use walkdir::WalkDir;

use super::engine::TemplateEngine;
use super::exclusions::ExclusionSet;
use crate::error::{Error, Result};

/// File name suffix marking a file to render.
pub const TEMPLATE_SUFFIX: &str = ".template";

/// What a materialization pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Template files rendered.
    pub rendered: usize,
    /// Files copied verbatim.
    pub copied: usize,
    /// Files and directories skipped by an exclusion.
    pub skipped: usize,
}

impl MaterializeStats {
    /// Total number of files written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.rendered + self.copied
    }

    /// Add the counts of another pass.
    pub fn absorb(&mut self, other: Self) {
        self.rendered += other.rendered;
        self.copied += other.copied;
        self.skipped += other.skipped;
    }
}

impl TemplateEngine {
    /// Copy `source` into `dest`, rendering template files on the way.
    ///
    /// Paths below `source` keep their position relative to `origin`, so
    /// `origin = /root/src`, `source = /root/src/api` and `dest = /kard/ctx`
    /// writes `/kard/ctx/api/...`. A file whose path equals `origin` is
    /// written to `dest` itself.
    ///
    /// When `render` is set, files ending in [`TEMPLATE_SUFFIX`] are rendered
    /// and written without the suffix; otherwise every file is copied. A
    /// `source` holding wildcards (`*`, `?`, `[`) that does not exist as
    /// written is expanded first; every match is placed relative to the
    /// wildcard-free part of `origin` and materialized on its own. Names met
    /// while walking or expanding are never treated as patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` does not exist, a template fails to
    /// render, or a filesystem operation fails. Files written before the
    /// failure are left in place.
    pub fn materialize(
        &self,
        source: &Path,
        origin: &Path,
        dest: &Path,
        exclusions: &ExclusionSet,
        render: bool,
    ) -> Result<MaterializeStats> {
        let mut stats = MaterializeStats::default();
        // an existing path is taken literally even when its name holds `[` or `?`
        if has_wildcard(source) && !source.exists() {
            self.materialize_matches(source, origin, dest, exclusions, render, &mut stats)?;
        } else {
            self.materialize_path(source, origin, dest, exclusions, render, &mut stats)?;
        }
        Ok(stats)
    }

    fn materialize_path(
        &self,
        source: &Path,
        origin: &Path,
        dest: &Path,
        exclusions: &ExclusionSet,
        render: bool,
        stats: &mut MaterializeStats,
    ) -> Result<()> {
        if source.is_file() {
            if exclusions.contains(source) {
                log::debug!("skipping excluded file {}", source.display());
                stats.skipped += 1;
                return Ok(());
            }
            return self.materialize_file(source, origin, dest, render, stats);
        }

        if source.is_dir() {
            let mut children = Vec::new();
            for entry in fs::read_dir(source).map_err(|e| Error::io(source, e))? {
                children.push(entry.map_err(|e| Error::io(source, e))?.path());
            }
            children.sort();

            for child in children {
                if exclusions.matches(&child) {
                    log::debug!("skipping excluded path {}", child.display());
                    stats.skipped += 1;
                    continue;
                }
                self.materialize_path(&child, origin, dest, exclusions, render, stats)?;
            }
            return Ok(());
        }

        Err(Error::PathNotFound {
            path: source.to_path_buf(),
        })
    }

    fn materialize_matches(
        &self,
        pattern: &Path,
        origin: &Path,
        dest: &Path,
        exclusions: &ExclusionSet,
        render: bool,
        stats: &mut MaterializeStats,
    ) -> Result<()> {
        // matches are re-rooted from the wildcard-free part of the origin
        let origin = if has_wildcard(origin) {
            literal_prefix(origin)
        } else {
            origin.to_path_buf()
        };

        let matches = expand_wildcard(pattern)?;
        if matches.is_empty() {
            log::warn!("no files match {}", pattern.display());
        }

        for found in matches {
            let relative = found.strip_prefix(&origin).map_err(|_| Error::InvalidPath {
                path: found.clone(),
                reason: format!("match is not below {}", origin.display()),
            })?;
            let target = dest.join(relative);
            self.materialize_path(&found, &found, &target, exclusions, render, stats)?;
        }
        Ok(())
    }

    fn materialize_file(
        &self,
        source: &Path,
        origin: &Path,
        dest: &Path,
        render: bool,
        stats: &mut MaterializeStats,
    ) -> Result<()> {
        let mut target = if source == origin {
            dest.to_path_buf()
        } else {
            let relative = source.strip_prefix(origin).map_err(|_| Error::InvalidPath {
                path: source.to_path_buf(),
                reason: format!("not below {}", origin.display()),
            })?;
            dest.join(relative)
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let template_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX));

        match template_name {
            Some(stripped) if render => {
                if target.is_dir() {
                    target.push(stripped);
                } else {
                    target = strip_template_suffix(&target);
                }

                let rendered = self.process_template(source)?;
                fs::write(&target, rendered).map_err(|e| Error::io(&target, e))?;
                copy_metadata(source, &target)?;
                log::debug!("rendered {} -> {}", source.display(), target.display());
                stats.rendered += 1;
            }
            _ => {
                if target.is_dir() {
                    if let Some(name) = source.file_name() {
                        target.push(name);
                    }
                }

                fs::copy(source, &target).map_err(|e| Error::io(&target, e))?;
                copy_metadata(source, &target)?;
                log::debug!("copied {} -> {}", source.display(), target.display());
                stats.copied += 1;
            }
        }
        Ok(())
    }
}

fn has_wildcard(path: &Path) -> bool {
    path.to_string_lossy().contains(|c: char| matches!(c, '*' | '?' | '['))
}

fn strip_template_suffix(path: &Path) -> PathBuf {
    match path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX))
    {
        Some(stripped) => path.with_file_name(stripped),
        None => path.to_path_buf(),
    }
}

/// Copy permissions and access/modification times from `source`.
fn copy_metadata(source: &Path, target: &Path) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::io(source, e))?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    File::open(target)
        .and_then(|file| file.set_times(times))
        .map_err(|e| Error::io(target, e))?;

    fs::set_permissions(target, metadata.permissions()).map_err(|e| Error::io(target, e))
}

/// The leading components of `path` that hold no wildcard.
///
/// A component that looks like a wildcard but names an existing directory
/// is kept, so roots such as `/srv/[staging]` still work.
fn literal_prefix(path: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in path.components() {
        let candidate = prefix.join(component);
        if has_wildcard(Path::new(component.as_os_str())) && !candidate.is_dir() {
            break;
        }
        prefix = candidate;
    }
    prefix
}

/// List the filesystem entries matching a wildcard path, sorted.
///
/// Unlike exclusions, wildcards here stay within one path segment.
fn expand_wildcard(pattern: &Path) -> Result<Vec<PathBuf>> {
    let base = literal_prefix(pattern);
    let mut depth = 0;
    for component in pattern.components().skip(base.components().count()) {
        if let Component::Normal(_) = component {
            depth += 1;
        } else {
            return Err(Error::InvalidPath {
                path: pattern.to_path_buf(),
                reason: "wildcard paths must not contain '.' or '..' after a wildcard".to_string(),
            });
        }
    }

    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut glob = globset::escape(&base.to_string_lossy());
    for component in pattern.components().skip(base.components().count()) {
        if !glob.ends_with('/') {
            glob.push('/');
        }
        glob.push_str(&component.as_os_str().to_string_lossy());
    }

    let matcher = GlobBuilder::new(&glob)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut matches = Vec::new();
    for entry in WalkDir::new(&base).min_depth(depth).max_depth(depth) {
        let entry = entry?;
        if matcher.is_match(entry.path()) {
            matches.push(entry.into_path());
        }
    }
    matches.sort();
    Ok(matches)
}
