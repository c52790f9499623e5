//! Render command implementation.
//!
//! Runs a single materialization outside of any environment definition:
//! one source path, one destination and a context read from a YAML file
//! and `--set` assignments.

use crate::error::CliError;
use crate::utils::{parse_meta, resolve_path, shorten_path, GlobalOptions};
use clap::{ArgAction, Parser};
use kard::{ConfigLoader, ConfigMerger, ExclusionSet, TemplateEngine};
use std::path::PathBuf;

/// Materialize a single source path.
#[derive(Parser)]
pub struct RenderCommand {
    /// File or directory to materialize, relative to the template root; may contain wildcards
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Destination file or directory
    #[arg(value_name = "DEST")]
    dest: PathBuf,

    /// YAML file providing the render context
    #[arg(long, value_name = "FILE")]
    meta: Option<PathBuf>,

    /// Context value as key=value (repeatable; overrides --meta)
    #[arg(long = "set", value_name = "KEY=VALUE", action = ArgAction::Append)]
    set: Vec<String>,

    /// Path pattern to skip, relative to the template root (repeatable)
    #[arg(long, value_name = "PATTERN", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Copy template files verbatim instead of rendering them
    #[arg(long)]
    no_render: bool,
}

impl RenderCommand {
    /// Execute the render command.
    ///
    /// The template root is `--path` (or the current directory); it does
    /// not have to be a kard root.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let root = resolve_path(global.path.as_deref())?;
        let source = root.join(&self.source);
        let dest = resolve_path(Some(&self.dest))?;

        let file_context = match &self.meta {
            Some(path) => ConfigLoader::load_file(&resolve_path(Some(path))?)?,
            None => serde_yaml::Mapping::new(),
        };
        let context = ConfigMerger::merge(&parse_meta(&self.set)?, &file_context, true);

        let exclusions = ExclusionSet::rooted(&root, &self.exclude)?;
        let engine = TemplateEngine::new(&root, context);
        let stats = engine.materialize(&source, &source, &dest, &exclusions, !self.no_render)?;

        if !global.quiet {
            println!(
                "Rendered {} templates, copied {} files into: {}",
                stats.rendered,
                stats.copied,
                shorten_path(&dest)
            );
        }

        Ok(())
    }
}
