//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, CreateCommand, DecryptCommand, DiffCommand, EncryptCommand,
    GenPasswordCommand, InitCommand, RenderCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for materializing templated deployment environments.
#[derive(Parser)]
#[command(name = "kard")]
#[command(version, about = "Materialize templated deployment environments", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Directory to start looking for the kard root from
    #[arg(long, value_name = "PATH", global = true, env = "KARD_PATH")]
    pub path: Option<PathBuf>,

    /// Passphrase used to encrypt and decrypt secrets
    #[arg(
        long,
        value_name = "PASSWORD",
        global = true,
        env = "KARD_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a kard root with a starter environment
    Init(InitCommand),

    /// Build or refresh a kard from an environment
    Create(CreateCommand),

    /// Materialize a single source path
    Render(RenderCommand),

    /// Encrypt secret files in place
    Encrypt(EncryptCommand),

    /// Decrypt secret files in place
    Decrypt(DecryptCommand),

    /// Generate a random password
    GenPassword(GenPasswordCommand),

    /// Show what changed between two YAML files
    Diff(DiffCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
