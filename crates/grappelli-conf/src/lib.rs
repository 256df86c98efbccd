//! # Grappelli Conf
//!
//! Environment-scoped configuration for applications and modules.
//!
//! Configuration files are TOML documents with one top-level table per
//! deployment profile. A profile may inherit from another one through an
//! `extends` key; the child's values win over the parent's:
//!
//! ```toml
//! [production.app]
//! default_module = "home"
//!
//! [development]
//! extends = "production"
//!
//! [development.app]
//! views_dir = "views/dev"
//! ```
//!
//! - [`Profile`]: the active deployment environment
//! - [`ProfileSource`]: reads one file and resolves a profile section
//! - [`AppSettings`]: application-wide paths and defaults
//! - [`ModuleSettings`]: per-module overlay with set-if-unset merge semantics

pub mod app;
pub mod module;
pub mod profile;
pub mod source;

pub use app::{AppSettings, DEFAULT_APP_CONFIG_PATH};
pub use module::{DEFAULT_MODULE_CONFIG_PATH, ModuleSettings};
pub use profile::{ENV_VAR, Profile};
pub use source::ProfileSource;

use std::path::PathBuf;

/// Errors raised while loading configuration files.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error in {path}: {source}")]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Profile '{profile}' in {path} is not a table")]
	InvalidSection { profile: String, path: PathBuf },

	#[error("Profile '{profile}' extends unknown profile '{parent}' in {path}")]
	UnknownParent {
		profile: String,
		parent: String,
		path: PathBuf,
	},

	#[error("Profile inheritance cycle in {path}: {chain}")]
	InheritanceCycle { chain: String, path: PathBuf },

	#[error("Invalid settings in {path}: {message}")]
	InvalidSettings { path: PathBuf, message: String },
}

pub type ConfResult<T> = Result<T, ConfError>;
