//! Main entry point for the kard CLI.
//!
//! This is the command-line interface for building kards out of
//! environment definitions:
//! - `init`: Create a kard root with a starter environment
//! - `create`: Build or refresh a kard
//! - `render`: Materialize a single source path
//! - `encrypt` / `decrypt`: Swap secret files between plaintext and ciphertext
//! - `gen-password`: Generate a random password
//! - `diff`: Show additions between two YAML files

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Route library logging through the stderr logger
    kard::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        path: cli.path,
        password: cli.password,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Create(cmd) => cmd.execute(&global),
        cli::Command::Render(cmd) => cmd.execute(&global),
        cli::Command::Encrypt(cmd) => cmd.execute(&global),
        cli::Command::Decrypt(cmd) => cmd.execute(&global),
        cli::Command::GenPassword(cmd) => cmd.execute(&global),
        cli::Command::Diff(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
