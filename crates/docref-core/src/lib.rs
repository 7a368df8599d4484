//! Core library for docref.
//!
//! Resolves the build-time environment of a documentation site: which
//! branch links should point at, and which version range the docs
//! describe.
//!
//! # Modules
//!
//! - [`branch`] - Branch resolution (env → git → default)
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git lookups
//! - [`links`] - Editor and migration-guide links
//! - [`site`] - The resolved site environment
//! - [`version`] - Version ranges and manifest reading
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use docref_core::{ConfigLoader, SiteEnv};
//!
//! let root = Utf8PathBuf::from(".");
//! let config = ConfigLoader::new()
//!     .with_project_search(&root)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let site = SiteEnv::resolve(&config, &root);
//! for (name, value) in site.exports() {
//!     println!("{name}={value}");
//! }
//! ```
#![deny(unsafe_code)]

pub mod branch;

pub mod config;

pub mod error;

pub mod git;

pub mod links;

pub mod site;

pub mod version;

pub use branch::{BranchName, BranchOrigin, BranchResolver, ResolvedBranch};

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

pub use site::SiteEnv;

pub use version::{parse_patch_range, patch_range};
