use grappelli_conf::{AppSettings, ModuleSettings};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

/// Where a module sits in its resolution lifecycle.
///
/// Stages only move forward. A module is handed out by the resolver once it
/// reached [`PreDispatched`](Self::PreDispatched).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleLifecycle {
	#[default]
	Unresolved,
	ConfigLoaded,
	Instantiated,
	Initialized,
	PreDispatched,
}

impl fmt::Display for ModuleLifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Unresolved => "unresolved",
			Self::ConfigLoaded => "config-loaded",
			Self::Instantiated => "instantiated",
			Self::Initialized => "initialized",
			Self::PreDispatched => "pre-dispatched",
		};
		f.write_str(name)
	}
}

/// Identity and settings of a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDescriptor {
	pub name: String,
	/// Remapped namespace, or the module name
	pub namespace: String,
	/// Module directory relative to the project dir
	pub directory: PathBuf,
	pub settings: ModuleSettings,
}

impl ModuleDescriptor {
	/// Descriptor for `name` under the application settings.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_apps::ModuleDescriptor;
	/// use grappelli_conf::AppSettings;
	/// use std::path::Path;
	///
	/// let app = AppSettings::new().with_module_namespace("blog", "Company::Blog");
	/// let descriptor = ModuleDescriptor::new("blog", &app);
	///
	/// assert_eq!(descriptor.namespace, "Company::Blog");
	/// assert_eq!(descriptor.directory, Path::new("application/modules/Company/Blog"));
	/// ```
	pub fn new(name: &str, app: &AppSettings) -> Self {
		let namespace = app.namespace_for(name);
		let directory = app.modules_dir.join(namespace_to_path(&namespace));
		Self {
			name: name.to_string(),
			namespace,
			directory,
			settings: ModuleSettings::new(),
		}
	}

	pub fn with_settings(mut self, settings: ModuleSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Dotted prefix used for container lookups, e.g. `Company.Blog`.
	pub fn type_prefix(&self) -> String {
		namespace_to_path(&self.namespace).replace('/', ".")
	}

	/// Snapshot suitable for logging or debugging endpoints.
	pub fn to_json(&self) -> serde_json::Value {
		json!({
			"name": self.name,
			"namespace": self.namespace,
			"directory": self.directory,
			"settings": self.settings,
		})
	}
}

fn namespace_to_path(namespace: &str) -> String {
	namespace
		.replace("::", "/")
		.replace(['\\', '.'], "/")
		.trim_matches('/')
		.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::path::Path;

	#[rstest]
	#[case("blog", "blog", "application/modules/blog")]
	#[case("Company\\Blog", "Company.Blog", "application/modules/Company/Blog")]
	#[case("Company.Blog", "Company.Blog", "application/modules/Company/Blog")]
	#[case("Company::Blog", "Company.Blog", "application/modules/Company/Blog")]
	fn test_namespace_forms(#[case] namespace: &str, #[case] prefix: &str, #[case] dir: &str) {
		// Arrange
		let app = AppSettings::new().with_module_namespace("blog", namespace);

		// Act
		let descriptor = ModuleDescriptor::new("blog", &app);

		// Assert
		assert_eq!(descriptor.type_prefix(), prefix);
		assert_eq!(descriptor.directory, Path::new(dir));
	}

	#[rstest]
	fn test_lifecycle_is_ordered() {
		assert!(ModuleLifecycle::Unresolved < ModuleLifecycle::ConfigLoaded);
		assert!(ModuleLifecycle::Initialized < ModuleLifecycle::PreDispatched);
		assert_eq!(ModuleLifecycle::PreDispatched.to_string(), "pre-dispatched");
	}
}
