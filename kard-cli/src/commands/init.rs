//! Init command implementation.
//!
//! This module implements the `init` command, which lays out a new kard
//! root: `env/<name>/env.yml` and an empty `kard/` directory.

use crate::error::CliError;
use crate::utils::{resolve_path, shorten_path, GlobalOptions};
use clap::Parser;
use kard::operations::init::{init_layout, InitOptions, DEFAULT_ENV_NAME};
use kard::KardLayout;
use std::path::PathBuf;

/// Create a kard root with a starter environment.
#[derive(Parser)]
#[command(about = "Create a kard root with a starter environment")]
pub struct InitCommand {
    /// Directory to initialize (defaults to --path or the current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Name of the environment to create
    #[arg(long, short, value_name = "NAME", default_value = DEFAULT_ENV_NAME)]
    env: String,

    /// Overwrite an existing environment file
    #[arg(long)]
    overwrite: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// The directory is taken as given; no kard root discovery happens here.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: positional directory > global --path > current directory
        let target = self.dir.as_deref().or(global.path.as_deref());
        let root = resolve_path(target)?;

        if self.dry_run {
            let layout = KardLayout::new(&root);
            let env_file = layout.env_file(&self.env);
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize kard root in: {}", shorten_path(&root));

            if env_file.exists() {
                if self.overwrite {
                    println!("  - Replace environment file: {}", env_file.display());
                } else {
                    println!(
                        "  - ERROR: Environment already exists (use --overwrite to replace): {}",
                        env_file.display()
                    );
                }
            } else {
                println!("  - Create environment file: {}", env_file.display());
            }

            let kard_root = layout.kard_root();
            if kard_root.exists() {
                println!("  - Kard directory already exists: {}", kard_root.display());
            } else {
                println!("  - Create kard directory: {}", kard_root.display());
            }

            return Ok(());
        }

        let options = InitOptions::new(root)
            .with_env_name(self.env)
            .with_overwrite(self.overwrite);

        let result = init_layout(&options)?;

        if !global.quiet {
            println!(
                "Initialized kard root in: {}",
                shorten_path(result.layout.root())
            );
            if result.env_created {
                println!("  - Created environment: {}", result.env_file.display());
            }
            if result.kard_dir_created {
                println!("  - Created kard directory");
            }
        }

        Ok(())
    }
}
