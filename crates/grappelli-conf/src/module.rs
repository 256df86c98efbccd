//! Per-module settings and the configuration overlay

use crate::{ConfError, ConfResult, Profile, ProfileSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default module config file, relative to the module directory.
pub const DEFAULT_MODULE_CONFIG_PATH: &str = "config/config.toml";

const DEFAULT_ROUTES_CONFIG_PATH: &str = "config/routes.toml";
const DEFAULT_VIEWS_DIR: &str = "views/scripts";
const DEFAULT_LAYOUTS_DIR: &str = "views/layouts";
const DEFAULT_VIEW_FRAGMENTS_DIR: &str = "views/fragments";
const DEFAULT_CONTROLLER_NAMESPACE: &str = "controllers";
const DEFAULT_CONTROLLER: &str = "Index";
const DEFAULT_ACTION: &str = "index";

/// Settings of a single module. Paths are relative to the module directory.
///
/// Fields left unset fall back to built-in defaults through the accessors.
/// [`ModuleSettings::overlay`] only fills fields that are still unset, so
/// values set explicitly by the application are never replaced by a module's
/// config file and applying the same overlay twice changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub routes_config_path: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub views_dir: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub layouts_dir: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub view_fragments_dir: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub controller_namespace: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_controller: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_action: Option<String>,
}

impl ModuleSettings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn routes_config_path(&self) -> &Path {
		self.routes_config_path
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_ROUTES_CONFIG_PATH))
	}

	pub fn views_dir(&self) -> &Path {
		self.views_dir
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_VIEWS_DIR))
	}

	pub fn layouts_dir(&self) -> &Path {
		self.layouts_dir
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_LAYOUTS_DIR))
	}

	pub fn view_fragments_dir(&self) -> &Path {
		self.view_fragments_dir
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_VIEW_FRAGMENTS_DIR))
	}

	pub fn controller_namespace(&self) -> &str {
		self.controller_namespace
			.as_deref()
			.unwrap_or(DEFAULT_CONTROLLER_NAMESPACE)
	}

	pub fn default_controller(&self) -> &str {
		self.default_controller.as_deref().unwrap_or(DEFAULT_CONTROLLER)
	}

	pub fn default_action(&self) -> &str {
		self.default_action.as_deref().unwrap_or(DEFAULT_ACTION)
	}

	pub fn with_routes_config_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.routes_config_path = Some(path.into());
		self
	}

	pub fn with_views_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.views_dir = Some(dir.into());
		self
	}

	pub fn with_layouts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.layouts_dir = Some(dir.into());
		self
	}

	pub fn with_view_fragments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.view_fragments_dir = Some(dir.into());
		self
	}

	pub fn with_controller_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.controller_namespace = Some(namespace.into());
		self
	}

	pub fn with_default_controller(mut self, controller: impl Into<String>) -> Self {
		self.default_controller = Some(controller.into());
		self
	}

	pub fn with_default_action(mut self, action: impl Into<String>) -> Self {
		self.default_action = Some(action.into());
		self
	}

	/// Fill every unset field from `other`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_conf::ModuleSettings;
	///
	/// let mut settings = ModuleSettings::new().with_default_action("list");
	/// let overlay = ModuleSettings::new()
	///     .with_default_action("show")
	///     .with_default_controller("Post");
	///
	/// settings.overlay(&overlay);
	/// assert_eq!(settings.default_action(), "list");
	/// assert_eq!(settings.default_controller(), "Post");
	/// ```
	pub fn overlay(&mut self, other: &ModuleSettings) {
		fill(&mut self.routes_config_path, &other.routes_config_path);
		fill(&mut self.views_dir, &other.views_dir);
		fill(&mut self.layouts_dir, &other.layouts_dir);
		fill(&mut self.view_fragments_dir, &other.view_fragments_dir);
		fill(&mut self.controller_namespace, &other.controller_namespace);
		fill(&mut self.default_controller, &other.default_controller);
		fill(&mut self.default_action, &other.default_action);
	}

	/// Read the `module` table of `profile` from `path`, if the file exists.
	pub fn from_file(path: impl AsRef<Path>, profile: &Profile) -> ConfResult<Option<Self>> {
		let source = ProfileSource::new(path.as_ref());
		let Some(table) = source.load_section(profile, "module")? else {
			return Ok(None);
		};

		toml::Value::Table(table)
			.try_into::<Self>()
			.map(Some)
			.map_err(|err| ConfError::InvalidSettings {
				path: source.path().to_path_buf(),
				message: err.to_string(),
			})
	}

	/// Apply the overlay read from `path`. A missing file leaves the settings
	/// untouched.
	pub fn overlay_from_file(&mut self, path: impl AsRef<Path>, profile: &Profile) -> ConfResult<()> {
		let path = path.as_ref();
		match Self::from_file(path, profile)? {
			Some(overlay) => {
				tracing::debug!(path = %path.display(), profile = %profile, "applying module config overlay");
				self.overlay(&overlay);
			}
			None => {
				tracing::debug!(path = %path.display(), "no module config overlay");
			}
		}
		Ok(())
	}
}

fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
	if slot.is_none() {
		slot.clone_from(value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unset_fields_use_defaults() {
		// Act
		let settings = ModuleSettings::new();

		// Assert
		assert_eq!(settings.routes_config_path(), Path::new("config/routes.toml"));
		assert_eq!(settings.views_dir(), Path::new("views/scripts"));
		assert_eq!(settings.layouts_dir(), Path::new("views/layouts"));
		assert_eq!(settings.view_fragments_dir(), Path::new("views/fragments"));
		assert_eq!(settings.controller_namespace(), "controllers");
		assert_eq!(settings.default_controller(), "Index");
		assert_eq!(settings.default_action(), "index");
	}

	#[rstest]
	fn test_overlay_is_idempotent() {
		// Arrange
		let mut settings = ModuleSettings::new().with_views_dir("templates");
		let overlay = ModuleSettings::new()
			.with_views_dir("views/other")
			.with_controller_namespace("handlers");

		// Act
		settings.overlay(&overlay);
		let once = settings.clone();
		settings.overlay(&overlay);

		// Assert
		assert_eq!(settings, once);
		assert_eq!(settings.views_dir(), Path::new("templates"));
		assert_eq!(settings.controller_namespace(), "handlers");
	}

	#[rstest]
	fn test_empty_overlay_changes_nothing() {
		// Arrange
		let mut settings = ModuleSettings::new().with_default_action("list");

		// Act
		settings.overlay(&ModuleSettings::new());

		// Assert
		assert_eq!(settings, ModuleSettings::new().with_default_action("list"));
	}
}
