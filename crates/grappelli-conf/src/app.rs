//! Application-wide settings

use crate::{ConfError, ConfResult, Profile, ProfileSource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the application config file, relative to the project dir.
pub const DEFAULT_APP_CONFIG_PATH: &str = "application/config/config.toml";

/// Application settings, read from the `app` table of the active profile.
///
/// All paths are relative to the project directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
	pub routes_config_path: PathBuf,
	/// Module name -> namespace remapping
	pub module_namespaces: IndexMap<String, String>,
	/// Module name -> config file path, relative to the module dir
	pub module_config_paths: IndexMap<String, PathBuf>,
	pub modules_dir: PathBuf,
	pub views_dir: PathBuf,
	pub layouts_dir: PathBuf,
	pub view_fragments_dir: PathBuf,
	pub error_views_dir: PathBuf,
	pub default_module: String,
	/// Anything else in the `app` table
	#[serde(flatten)]
	pub custom: IndexMap<String, serde_json::Value>,
}

impl AppSettings {
	pub fn new() -> Self {
		Self {
			routes_config_path: PathBuf::from("application/config/routes.toml"),
			module_namespaces: IndexMap::new(),
			module_config_paths: IndexMap::new(),
			modules_dir: PathBuf::from("application/modules"),
			views_dir: PathBuf::from("application/views/scripts"),
			layouts_dir: PathBuf::from("application/views/layouts"),
			view_fragments_dir: PathBuf::from("application/views/fragments"),
			error_views_dir: PathBuf::from("application/views/errors"),
			default_module: "home".to_string(),
			custom: IndexMap::new(),
		}
	}

	/// Load settings from a profile-scoped file, falling back to defaults for
	/// anything the file does not set.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_conf::{AppSettings, Profile};
	///
	/// let settings = AppSettings::load("does/not/exist.toml", &Profile::Production).unwrap();
	/// assert_eq!(settings, AppSettings::default());
	/// ```
	pub fn load(path: impl AsRef<Path>, profile: &Profile) -> ConfResult<Self> {
		let source = ProfileSource::new(path.as_ref());
		let Some(table) = source.load_section(profile, "app")? else {
			return Ok(Self::default());
		};

		let settings = toml::Value::Table(table)
			.try_into::<Self>()
			.map_err(|err| ConfError::InvalidSettings {
				path: source.path().to_path_buf(),
				message: err.to_string(),
			})?;
		tracing::debug!(
			path = %source.path().display(),
			profile = %profile,
			"loaded application settings"
		);
		Ok(settings)
	}

	pub fn with_default_module(mut self, module: impl Into<String>) -> Self {
		self.default_module = module.into();
		self
	}

	pub fn with_modules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.modules_dir = dir.into();
		self
	}

	pub fn with_routes_config_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.routes_config_path = path.into();
		self
	}

	/// Remap a module name to a different namespace.
	pub fn with_module_namespace(
		mut self,
		module: impl Into<String>,
		namespace: impl Into<String>,
	) -> Self {
		self.module_namespaces.insert(module.into(), namespace.into());
		self
	}

	pub fn with_module_config_path(
		mut self,
		module: impl Into<String>,
		path: impl Into<PathBuf>,
	) -> Self {
		self.module_config_paths.insert(module.into(), path.into());
		self
	}

	/// Namespace for `module`: the remapped one, else the module name itself.
	pub fn namespace_for(&self, module: &str) -> String {
		self.module_namespaces
			.get(module)
			.cloned()
			.unwrap_or_else(|| module.to_string())
	}

	/// Config file path for `module`, relative to its directory.
	pub fn module_config_path_for(&self, module: &str) -> PathBuf {
		self.module_config_paths
			.get(module)
			.cloned()
			.unwrap_or_else(|| PathBuf::from(crate::DEFAULT_MODULE_CONFIG_PATH))
	}
}

impl Default for AppSettings {
	fn default() -> Self {
		Self::new()
	}
}
