//! High-level operations on a kard root.
//!
//! Each operation takes its options as a plain struct, performs the whole
//! workflow and returns a result struct describing what it did. Nothing here
//! prints; the CLI decides how results are shown.
//!
//! # Examples
//!
//! ```no_run
//! use kard::operations::{provision, ProvisionOptions};
//! use kard::path::KardLayout;
//! use kard::reconcile::StdinPrompt;
//! use std::path::Path;
//!
//! let layout = KardLayout::discover(Path::new(".")).unwrap();
//! let options = ProvisionOptions::new("alpha", "dev");
//! let result = provision(&layout, &options, &mut StdinPrompt).unwrap();
//! println!("{} files written", result.stats.written());
//! ```

pub mod init;
pub mod provision;

pub use init::{init_layout, InitOptions, InitResult, DEFAULT_ENV_NAME};
pub use provision::{provision, ProvisionOptions, ProvisionResult};
