//! Diff command implementation.
//!
//! Prints the entries of the current YAML file that are new or changed
//! relative to the previous one. Removals are not reported.

use crate::error::CliError;
use crate::utils::{resolve_path, GlobalOptions};
use clap::Parser;
use kard::{diff, ConfigLoader};
use std::path::PathBuf;

/// Show what changed between two YAML files.
#[derive(Parser)]
pub struct DiffCommand {
    /// The earlier configuration
    #[arg(value_name = "PREVIOUS")]
    previous: PathBuf,

    /// The later configuration
    #[arg(value_name = "CURRENT")]
    current: PathBuf,

    /// Exit with status 1 when there are changes
    #[arg(long)]
    exit_code: bool,
}

impl DiffCommand {
    /// Execute the diff command.
    pub fn execute(&self, _global: &GlobalOptions) -> Result<(), CliError> {
        let previous = ConfigLoader::load_file(&resolve_path(Some(&self.previous))?)?;
        let current = ConfigLoader::load_file(&resolve_path(Some(&self.current))?)?;

        let changes = diff(&previous, &current);
        if changes.is_empty() {
            return Ok(());
        }

        let rendered = serde_yaml::to_string(&changes).map_err(kard::Error::from)?;
        print!("{rendered}");

        if self.exit_code {
            return Err(CliError::SemanticFailure(format!(
                "{} top-level entries changed",
                changes.len()
            )));
        }
        Ok(())
    }
}
