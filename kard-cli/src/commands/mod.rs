//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create a kard root with a starter environment
//! - `create`: Build or refresh a kard from an environment
//! - `render`: Materialize a single source path with a given context
//! - `encrypt`: Encrypt secret files in place
//! - `decrypt`: Decrypt secret files in place or to stdout
//! - `gen_password`: Generate random passwords
//! - `diff`: Show additions between two YAML files
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod create;
pub mod decrypt;
pub mod diff;
pub mod encrypt;
pub mod gen_password;
pub mod init;
pub mod render;

pub use completions::CompletionsCommand;
pub use create::CreateCommand;
pub use decrypt::DecryptCommand;
pub use diff::DiffCommand;
pub use encrypt::EncryptCommand;
pub use gen_password::GenPasswordCommand;
pub use init::InitCommand;
pub use render::RenderCommand;
