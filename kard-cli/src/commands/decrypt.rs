//! Decrypt command implementation.

use crate::error::CliError;
use crate::utils::{secret_pair, shorten_path, GlobalOptions};
use clap::Parser;
use kard::secret::{decrypt_file, SecretState};
use kard::Error;
use std::io::{self, Write};
use std::path::PathBuf;

/// Decrypt secret files in place, or print them.
#[derive(Parser)]
pub struct DecryptCommand {
    /// Secret files to decrypt (either `<file>` or `<file>.enc`)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Write the plaintext to stdout and leave the encrypted files alone
    #[arg(long)]
    stdout: bool,
}

impl DecryptCommand {
    /// Execute the decrypt command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let passphrase = global.passphrase().ok_or(CliError::PasswordRequired)?;

        for file in &self.files {
            let secret = secret_pair(file)?;

            if self.stdout {
                let plain = decrypt_file(secret.encrypted(), Some(passphrase))?;
                io::stdout().write_all(&plain)?;
                continue;
            }

            match secret.state() {
                SecretState::Plain => {
                    if !global.quiet {
                        println!("Already decrypted: {}", shorten_path(secret.plain()));
                    }
                    continue;
                }
                SecretState::Missing => {
                    return Err(Error::PathNotFound {
                        path: secret.encrypted().to_path_buf(),
                    }
                    .into());
                }
                SecretState::Both => {
                    return Err(CliError::SemanticFailure(format!(
                        "both {} and {} exist; remove the stale one before decrypting",
                        secret.plain().display(),
                        secret.encrypted().display()
                    )));
                }
                SecretState::Encrypted => {}
            }

            secret.decrypt(Some(passphrase))?;
            if !global.quiet {
                println!("Decrypted: {}", shorten_path(secret.plain()));
            }
        }

        Ok(())
    }
}
