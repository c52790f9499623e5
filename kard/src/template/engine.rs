//! Template rendering backed by minijinja.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use minijinja::{path_loader, AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Renders templates found under a fixed root with a shared context.
///
/// Templates are looked up by their path relative to the root, so a template
/// can `{% include %}` any other file of the tree. Undefined variables are
/// errors.
///
/// Besides the minijinja builtins the environment provides:
///
/// | name | kind | effect |
/// |------|------|--------|
/// | `sha256` | filter | hex SHA-256 digest of a string |
/// | `b64encode` / `b64decode` | filter | standard base64 |
/// | `to_yaml` / `to_json` | filter | serialize any value |
/// | `format_htpasswd(user, password)` | function | bcrypt htpasswd line |
///
/// # Examples
///
/// ```
/// use kard::template::TemplateEngine;
/// use serde_yaml::Mapping;
///
/// let mut context = Mapping::new();
/// context.insert("name".into(), "alpha".into());
///
/// let engine = TemplateEngine::new("/srv/project", context);
/// assert_eq!(engine.process_string("kard {{ name }}").unwrap(), "kard alpha");
/// assert_eq!(
///     engine.process_string("{{ 'abc' | sha256 }}").unwrap(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub struct TemplateEngine {
    root: PathBuf,
    env: Environment<'static>,
    context: Mapping,
}

impl TemplateEngine {
    /// Create an engine loading templates from `root`.
    pub fn new(root: impl Into<PathBuf>, context: Mapping) -> Self {
        let root = root.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(root.clone()));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // rendered files are configs and scripts, never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("sha256", sha256);
        env.add_filter("b64encode", b64encode);
        env.add_filter("b64decode", b64decode);
        env.add_filter("to_yaml", to_yaml);
        env.add_filter("to_json", to_json);
        env.add_function("format_htpasswd", format_htpasswd);

        Self { root, env, context }
    }

    /// The template root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The render context.
    #[must_use]
    pub fn context(&self) -> &Mapping {
        &self.context
    }

    /// Set a context variable, replacing any previous value.
    pub fn insert_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.insert(Value::String(key.into()), value.into());
    }

    /// Access the underlying environment to register more filters or
    /// functions.
    ///
    /// Functions whose first parameter is `&minijinja::State` can read any
    /// variable of the render context, which is how helpers that depend on
    /// session settings (such as a `use_volume` flag) are written.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Render the template file at `path`.
    ///
    /// `path` may be absolute (it must then live under the root) or relative
    /// to the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the file is outside the root, or
    /// [`Error::TemplateRender`] if loading or rendering fails.
    pub fn process_template(&self, path: &Path) -> Result<String> {
        let name = self.template_name(path)?;
        let template = self.env.get_template(&name)?;
        Ok(template.render(&self.context)?)
    }

    /// Render an inline template string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateRender`] on syntax errors or undefined
    /// variables.
    pub fn process_string(&self, source: &str) -> Result<String> {
        Ok(self.env.render_str(source, &self.context)?)
    }

    fn template_name(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root).map_err(|_| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: format!("template is outside {}", self.root.display()),
            })?
        } else {
            path
        };

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy()),
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "template path must not leave the template root".to_string(),
                    })
                }
            }
        }
        Ok(parts.join("/"))
    }
}

fn sha256(value: String) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn b64encode(value: String) -> String {
    BASE64.encode(value.as_bytes())
}

fn b64decode(value: String) -> std::result::Result<String, minijinja::Error> {
    let bytes = BASE64.decode(value.as_bytes()).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "invalid base64 input").with_source(e)
    })?;
    String::from_utf8(bytes).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "decoded base64 is not UTF-8")
            .with_source(e)
    })
}

fn to_yaml(value: minijinja::Value) -> std::result::Result<String, minijinja::Error> {
    serde_yaml::to_string(&value).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "cannot serialize to YAML").with_source(e)
    })
}

fn to_json(value: minijinja::Value) -> std::result::Result<String, minijinja::Error> {
    serde_json::to_string(&value).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "cannot serialize to JSON").with_source(e)
    })
}

/// `user:<bcrypt hash>` in the `$2y$` flavour Apache expects.
fn format_htpasswd(user: String, password: String) -> std::result::Result<String, minijinja::Error> {
    let parts = bcrypt::hash_with_result(password, bcrypt::DEFAULT_COST).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "cannot hash password").with_source(e)
    })?;
    Ok(format!(
        "{user}:{}",
        parts.format_for_version(bcrypt::Version::TwoY)
    ))
}
