//! Path handling for kard roots.
//!
//! This module locates the kard root a command operates on and names the
//! files inside it.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── env/
//! │   └── dev/
//! │       └── env.yml
//! └── kard/
//!     └── alpha/
//!         └── meta.yml
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use kard::path::{normalize::normalize, KardLayout};
//! use std::path::Path;
//!
//! let start = normalize(Path::new("~/project/kard/alpha")).unwrap();
//! let layout = KardLayout::discover(&start).unwrap();
//! println!("env files under {}", layout.env_dir().display());
//! ```

pub mod layout;
pub mod normalize;

pub use layout::{discover_root, is_kard_root, KardLayout, ENV_FILE, ENV_FOLDER, KARD_FOLDER, META_FILE};
