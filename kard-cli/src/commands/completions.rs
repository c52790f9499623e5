//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "kard";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            eprintln!("# Generating {} completion script", self.shell);
            match self.shell {
                Shell::Bash => {
                    eprintln!("# Enable with:");
                    eprintln!("#   eval \"$(kard completions bash)\"");
                }
                Shell::Zsh => {
                    eprintln!("# Install with:");
                    eprintln!("#   kard completions zsh > ~/.zsh/completions/_kard");
                    eprintln!("# Make sure ~/.zsh/completions is in your $fpath");
                }
                Shell::Fish => {
                    eprintln!("# Enable with:");
                    eprintln!("#   kard completions fish | source");
                }
                Shell::PowerShell => {
                    eprintln!("# Enable with:");
                    eprintln!("#   kard completions powershell | Out-String | Invoke-Expression");
                }
                _ => {}
            }
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}
