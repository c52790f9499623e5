//! Repository initialization.
//!
//! Creates the directory skeleton path discovery recognises: one
//! environment definition under `env/` and an empty `kard/` folder.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::path::KardLayout;

/// Environment created when none is named.
pub const DEFAULT_ENV_NAME: &str = "dev";

/// Options for repository initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory to turn into a kard root.
    pub root: PathBuf,
    /// Name of the first environment.
    pub env_name: String,
    /// Replace an existing environment file.
    pub overwrite: bool,
}

impl InitOptions {
    /// Creates new initialization options.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            env_name: DEFAULT_ENV_NAME.to_string(),
            overwrite: false,
        }
    }

    /// Sets the name of the environment to create.
    #[must_use]
    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = env_name.into();
        self
    }

    /// Sets whether to overwrite an existing environment file.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Result of initialization operation.
#[derive(Debug)]
pub struct InitResult {
    /// Layout of the initialized root.
    pub layout: KardLayout,
    /// Path of the environment file.
    pub env_file: PathBuf,
    /// Whether the environment file was written.
    pub env_created: bool,
    /// Whether the `kard/` directory was created.
    pub kard_dir_created: bool,
}

/// Starter environment definition; every key is optional.
const DEFAULT_ENV_TEMPLATE: &str = r"# Kard environment definition

# Environments merged beneath this one, in order
# import:
#   - common

# Values used when a kard does not set them
# default_meta:
#   project: demo
#   use_volume: false

# Values every kard must provide; null leaves are prompted for
# required_meta:
#   project:
#   db:
#     host:
#     port:

# Files materialized into the kard directory
# templates:
#   - src: src/app
#     dst: app
#     exclude:
#       - src/app/__pycache__
#   - src: docker/*.template
#     render: true

# Paths never materialized
# excluded_paths:
#   - src/*.pyc

# Files (relative to the kard) encrypted when a password is given
# secrets:
#   - secrets.yml
";

/// Creates the kard root skeleton under `options.root`.
///
/// # Errors
///
/// Returns an error if:
/// - The environment name is empty or contains a path separator
/// - The environment file already exists and `overwrite` is false
/// - A directory or the environment file cannot be written
///
/// # Examples
///
/// ```no_run
/// use kard::operations::init::{init_layout, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/kard-root")).with_env_name("staging");
/// let result = init_layout(&options).unwrap();
/// println!("environment written to {}", result.env_file.display());
/// ```
pub fn init_layout(options: &InitOptions) -> Result<InitResult> {
    let name = options.env_name.as_str();
    let separator = |c: char| c == '/' || c == '\\';
    if name.is_empty() || name.contains(separator) || name == "." || name == ".." {
        return Err(Error::configuration(format!(
            "invalid environment name '{name}'"
        )));
    }

    let layout = KardLayout::new(&options.root);
    let env_file = layout.env_file(name);

    if env_file.exists() && !options.overwrite {
        return Err(Error::configuration(format!(
            "environment already exists at {}. Use --overwrite to replace it.",
            env_file.display()
        )));
    }

    if let Some(env_dir) = env_file.parent() {
        fs::create_dir_all(env_dir).map_err(|e| Error::io(env_dir, e))?;
    }
    fs::write(&env_file, DEFAULT_ENV_TEMPLATE).map_err(|e| Error::io(&env_file, e))?;

    let kard_root = layout.kard_root();
    let kard_dir_created = !kard_root.exists();
    if kard_dir_created {
        fs::create_dir_all(&kard_root).map_err(|e| Error::io(&kard_root, e))?;
    }

    log::info!("initialized kard root at {}", layout.root().display());
    Ok(InitResult {
        layout,
        env_file,
        env_created: true,
        kard_dir_created,
    })
}
