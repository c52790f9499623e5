//! Password generation command.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Parser;
use kard::util::{generate_password, DEFAULT_PASSWORD_LENGTH};

/// Generate random passwords, one per line.
///
/// Every group of three characters holds one lowercase letter, one
/// uppercase letter and one digit.
#[derive(Parser)]
pub struct GenPasswordCommand {
    /// Length of each password
    #[arg(long, short, value_name = "N", default_value_t = DEFAULT_PASSWORD_LENGTH)]
    length: usize,

    /// Number of passwords to generate
    #[arg(long, short, value_name = "N", default_value_t = 1)]
    count: usize,
}

impl GenPasswordCommand {
    /// Execute the gen-password command.
    pub fn execute(&self, _global: &GlobalOptions) -> Result<(), CliError> {
        if self.length == 0 {
            return Err(CliError::InvalidArguments(
                "password length must be at least 1".to_string(),
            ));
        }

        for _ in 0..self.count {
            println!("{}", generate_password(self.length));
        }
        Ok(())
    }
}
