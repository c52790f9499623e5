//! Encrypt command implementation.

use crate::error::CliError;
use crate::utils::{secret_pair, shorten_path, GlobalOptions};
use clap::Parser;
use kard::secret::SecretState;
use kard::Error;
use std::path::PathBuf;

/// Encrypt secret files in place.
///
/// Each file is replaced by `<file>.enc`, readable only by its owner.
#[derive(Parser)]
pub struct EncryptCommand {
    /// Plaintext files to encrypt
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

impl EncryptCommand {
    /// Execute the encrypt command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let passphrase = global.passphrase().ok_or(CliError::PasswordRequired)?;

        for file in &self.files {
            let secret = secret_pair(file)?;
            match secret.state() {
                SecretState::Encrypted => {
                    if !global.quiet {
                        println!("Already encrypted: {}", shorten_path(secret.encrypted()));
                    }
                    continue;
                }
                SecretState::Missing => {
                    return Err(Error::PathNotFound {
                        path: secret.plain().to_path_buf(),
                    }
                    .into());
                }
                SecretState::Both => {
                    log::warn!(
                        "replacing {} with a fresh encryption of {}",
                        secret.encrypted().display(),
                        secret.plain().display()
                    );
                }
                SecretState::Plain => {}
            }

            secret.encrypt(Some(passphrase))?;
            if !global.quiet {
                println!("Encrypted: {}", shorten_path(secret.encrypted()));
            }
        }

        Ok(())
    }
}
