//! Template rendering and tree materialization.
//!
//! A kard is built by materializing parts of the repository into the kard
//! directory: files are copied, and files named `*.template` are rendered
//! through [`TemplateEngine`] with the kard's configuration as context.
//!
//! ```text
//! <root>/src/app/
//!   main.py                  ->  <kard>/app/main.py
//!   settings.yml.template    ->  <kard>/app/settings.yml   (rendered)
//!   __pycache__/             ->  (excluded by "src/app/__pycache__")
//! ```

mod engine;
mod exclusions;
mod materialize;

pub use engine::TemplateEngine;
pub use exclusions::ExclusionSet;
pub use materialize::{MaterializeStats, TEMPLATE_SUFFIX};
