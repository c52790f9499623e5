//! Build script for kard-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs and src/commands/.
fn build_cli() -> Command {
    Command::new("kard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Materialize templated deployment environments")
        .long_about(
            "Build kard directories out of layered environment definitions: \
             reconcile required configuration, render templates and keep \
             secrets encrypted at rest",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .help("Directory to start looking for the kard root from")
                .value_name("PATH")
                .global(true)
                .env("KARD_PATH"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Passphrase used to encrypt and decrypt secrets")
                .value_name("PASSWORD")
                .global(true)
                .env("KARD_PASSWORD")
                .hide_env_values(true),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Create a kard root with a starter environment")
                .long_about("Create env/<name>/env.yml and an empty kard/ directory"),
            Command::new("create")
                .about("Build or refresh a kard from an environment")
                .long_about(
                    "Reconcile the kard's meta against the environment, write meta.yml, \
                     materialize templates and encrypt secrets",
                ),
            Command::new("render")
                .about("Materialize a single source path")
                .long_about("Copy or render one file, directory or wildcard into a destination"),
            Command::new("encrypt")
                .about("Encrypt secret files in place")
                .long_about("Replace each file with an AES-256-CBC encrypted <file>.enc"),
            Command::new("decrypt")
                .about("Decrypt secret files in place")
                .long_about("Replace each <file>.enc with its plaintext, or print it"),
            Command::new("gen-password")
                .about("Generate a random password")
                .long_about("Generate alphanumeric passwords from the operating system RNG"),
            Command::new("diff")
                .about("Show what changed between two YAML files")
                .long_about("Print entries of CURRENT that are new or changed relative to PREVIOUS"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        return Ok(());
    };
    let man_dir = PathBuf::from(out_dir).join("man");
    fs::create_dir_all(&man_dir)?;

    // Generate main kard.1 man page
    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    fs::write(man_dir.join("kard.1"), buffer)
}
