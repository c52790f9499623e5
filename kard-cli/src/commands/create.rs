//! Create command implementation.
//!
//! Builds (or refreshes) a kard: reconciles its meta against the
//! environment, writes `meta.yml`, materializes the templates and encrypts
//! the environment's secrets when a password is available.

use crate::error::CliError;
use crate::utils::{parse_meta, resolve_layout, shorten_path, GlobalOptions};
use clap::{ArgAction, Parser};
use kard::operations::{provision, ProvisionOptions, DEFAULT_ENV_NAME};
use kard::reconcile::{InputProvider, NoInput, StdinPrompt};

/// Build or refresh a kard from an environment.
#[derive(Parser)]
pub struct CreateCommand {
    /// Name of the kard
    #[arg(value_name = "KARD")]
    kard: String,

    /// Environment the kard is built from
    #[arg(long, short, value_name = "NAME", default_value = DEFAULT_ENV_NAME)]
    env: String,

    /// Meta value as key=value (repeatable; dotted keys nest)
    #[arg(long = "meta", value_name = "KEY=VALUE", action = ArgAction::Append)]
    meta: Vec<String>,

    /// Fail instead of prompting for missing meta
    #[arg(long)]
    no_input: bool,

    /// Copy template files verbatim instead of rendering them
    #[arg(long)]
    no_render: bool,
}

impl CreateCommand {
    /// Execute the create command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let layout = resolve_layout(global)?;
        let extra_meta = parse_meta(&self.meta)?;

        let options = ProvisionOptions::new(&self.kard, &self.env)
            .with_extra_meta(extra_meta)
            .with_passphrase(global.password.clone())
            .with_render_templates(!self.no_render);

        let mut prompt = StdinPrompt;
        let mut refuse = NoInput;
        let input: &mut dyn InputProvider = if self.no_input {
            &mut refuse
        } else {
            &mut prompt
        };

        let result = provision(&layout, &options, input)?;

        if global.quiet {
            return Ok(());
        }

        println!(
            "Built kard '{}' from env '{}' in: {}",
            self.kard,
            self.env,
            shorten_path(&result.kard_dir)
        );
        println!(
            "  - Rendered {} templates, copied {} files, skipped {}",
            result.stats.rendered, result.stats.copied, result.stats.skipped
        );

        if !result.meta_changes.is_empty() {
            let changes =
                serde_yaml::to_string(&result.meta_changes).map_err(kard::Error::from)?;
            println!("  - Meta changes:");
            for line in changes.lines() {
                println!("      {line}");
            }
        }

        for secret in &result.secrets_encrypted {
            println!("  - Encrypted secret: {}", shorten_path(secret));
        }
        for secret in &result.secrets_plain {
            println!("  - Secret left unencrypted: {}", shorten_path(secret));
        }

        Ok(())
    }
}
