//! Kard provisioning.
//!
//! Provisioning turns an environment definition into a kard directory:
//!
//! 1. Load `env/<env>/env.yml` with its imports merged beneath it.
//! 2. Load the kard's previous `meta.yml` (if any) and overlay extra meta.
//! 3. Reconcile `required_meta`, prompting for whatever is still missing.
//! 4. Write the new `meta.yml` and report what changed.
//! 5. Render every template entry into the kard directory.
//! 6. Encrypt the listed secrets when a passphrase is available.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::{diff, ConfigLoader, ConfigMerger, EnvFile, TemplateEntry};
use crate::error::{Error, Result};
use crate::path::KardLayout;
use crate::reconcile::{InputProvider, Reconciler};
use crate::secret::{SecretFile, SecretState};
use crate::template::{ExclusionSet, MaterializeStats, TemplateEngine};

/// Options for provisioning a kard.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Name of the kard (directory under `kard/`).
    pub kard: String,
    /// Name of the environment to build from.
    pub env: String,
    /// Meta overriding both the previous meta and the defaults.
    pub extra_meta: Mapping,
    /// Passphrase used to encrypt secrets.
    pub passphrase: Option<String>,
    /// Render `.template` files; when false every file is copied.
    pub render_templates: bool,
}

impl ProvisionOptions {
    /// Creates options with no extra meta and rendering enabled.
    #[must_use]
    pub fn new(kard: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            kard: kard.into(),
            env: env.into(),
            extra_meta: Mapping::new(),
            passphrase: None,
            render_templates: true,
        }
    }

    /// Sets the extra meta.
    #[must_use]
    pub fn with_extra_meta(mut self, extra_meta: Mapping) -> Self {
        self.extra_meta = extra_meta;
        self
    }

    /// Sets the passphrase for secret encryption.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: Option<String>) -> Self {
        self.passphrase = passphrase;
        self
    }

    /// Sets whether templates are rendered.
    #[must_use]
    pub fn with_render_templates(mut self, render_templates: bool) -> Self {
        self.render_templates = render_templates;
        self
    }
}

/// Outcome of a provisioning run.
#[derive(Debug)]
pub struct ProvisionResult {
    /// The kard directory.
    pub kard_dir: PathBuf,
    /// The meta written to `meta.yml`.
    pub meta: Mapping,
    /// Entries of `meta` that are new or changed since the previous run.
    pub meta_changes: Mapping,
    /// Materialization counts over all template entries.
    pub stats: MaterializeStats,
    /// Secret files encrypted by this run.
    pub secrets_encrypted: Vec<PathBuf>,
    /// Secret files left as plaintext for lack of a passphrase.
    pub secrets_plain: Vec<PathBuf>,
}

/// Build or refresh the kard `options.kard` from environment `options.env`.
///
/// # Errors
///
/// Returns an error if:
/// - The kard name is not a single path segment
/// - The environment cannot be loaded
/// - Required meta is missing and `input` cannot supply it
/// - A template fails to render or a file operation fails
/// - A secret cannot be encrypted
pub fn provision(
    layout: &KardLayout,
    options: &ProvisionOptions,
    input: &mut dyn InputProvider,
) -> Result<ProvisionResult> {
    validate_name("kard", &options.kard)?;
    validate_name("environment", &options.env)?;

    let env = ConfigLoader::load_env(layout, &options.env)?;
    let kard_dir = layout.kard_dir(&options.kard);
    let meta_path = layout.meta_file(&options.kard);

    let previous = ConfigLoader::load_optional(&meta_path)?.unwrap_or_default();
    let data = ConfigMerger::merge(&options.extra_meta, &previous, true);

    let reconciled = Reconciler::new(input).complete(
        &env.required_meta,
        &Value::Mapping(env.default_meta.clone()),
        &Value::Mapping(data.clone()),
    )?;
    let meta = ConfigMerger::merge(&reconciled, &data, true);
    let meta_changes = diff(&previous, &meta);

    fs::create_dir_all(&kard_dir).map_err(|e| Error::io(&kard_dir, e))?;
    ConfigLoader::write_file(&meta_path, &meta)?;
    log::info!(
        "kard '{}' meta written to {} ({} changed entries)",
        options.kard,
        meta_path.display(),
        meta_changes.len()
    );

    let context = render_context(layout, options, &env, &meta);
    let engine = TemplateEngine::new(layout.root(), context);
    let stats = materialize_entries(layout, &engine, &env, &kard_dir, options.render_templates)?;

    let (secrets_encrypted, secrets_plain) =
        protect_secrets(&env, &kard_dir, options.passphrase.as_deref())?;

    Ok(ProvisionResult {
        kard_dir,
        meta,
        meta_changes,
        stats,
        secrets_encrypted,
        secrets_plain,
    })
}

/// Defaults overlaid with the kard meta, plus the kard's identity.
fn render_context(
    layout: &KardLayout,
    options: &ProvisionOptions,
    env: &EnvFile,
    meta: &Mapping,
) -> Mapping {
    let mut context = ConfigMerger::merge(meta, &env.default_meta, true);
    context.insert("kard_name".into(), options.kard.clone().into());
    context.insert("env_name".into(), options.env.clone().into());
    context.insert(
        "kard_path".into(),
        layout
            .kard_dir(&options.kard)
            .to_string_lossy()
            .into_owned()
            .into(),
    );
    context
}

fn materialize_entries(
    layout: &KardLayout,
    engine: &TemplateEngine,
    env: &EnvFile,
    kard_dir: &Path,
    render_templates: bool,
) -> Result<MaterializeStats> {
    let root = layout.root();
    let global = ExclusionSet::rooted(root, &env.excluded_paths)?;

    let mut stats = MaterializeStats::default();
    for entry in &env.templates {
        let TemplateEntry {
            src,
            dst,
            exclude,
            render,
        } = entry;

        let source = root.join(src);
        let dest = match dst {
            Some(dst) => kard_dir.join(dst),
            None => kard_dir.to_path_buf(),
        };
        let exclusions = global.union(&ExclusionSet::rooted(root, exclude)?)?;

        log::debug!("materializing {} into {}", source.display(), dest.display());
        let entry_stats = engine.materialize(
            &source,
            &source,
            &dest,
            &exclusions,
            render_templates && *render,
        )?;
        stats.absorb(entry_stats);
    }
    Ok(stats)
}

fn protect_secrets(
    env: &EnvFile,
    kard_dir: &Path,
    passphrase: Option<&str>,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut encrypted = Vec::new();
    let mut plain = Vec::new();

    for relative in &env.secrets {
        let secret = SecretFile::new(kard_dir.join(relative));
        match secret.state() {
            SecretState::Plain | SecretState::Both if passphrase.is_some() => {
                // a freshly rendered plaintext supersedes any older ciphertext
                secret.encrypt(passphrase)?;
                encrypted.push(secret.encrypted().to_path_buf());
            }
            SecretState::Plain | SecretState::Both => {
                log::warn!(
                    "{} left unencrypted: no password given",
                    secret.plain().display()
                );
                plain.push(secret.plain().to_path_buf());
            }
            SecretState::Encrypted | SecretState::Missing => {}
        }
    }
    Ok((encrypted, plain))
}

fn validate_name(kind: &str, name: &str) -> Result<()> {
    let separator = |c: char| c == '/' || c == '\\';
    if name.is_empty() || name.contains(separator) || name == "." || name == ".." {
        return Err(Error::configuration(format!("invalid {kind} name '{name}'")));
    }
    Ok(())
}
