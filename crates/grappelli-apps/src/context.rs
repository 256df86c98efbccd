use grappelli_conf::{AppSettings, ModuleSettings, Profile};
use grappelli_di::Container;
use grappelli_urls::RouteTableCache;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Everything modules and controllers need from the running application.
///
/// Built once at startup and shared read-only by all requests.
#[derive(Debug, Default)]
pub struct AppContext {
	project_dir: PathBuf,
	profile: Profile,
	settings: AppSettings,
	module_settings: IndexMap<String, ModuleSettings>,
	container: Container,
	routes: RouteTableCache,
}

impl AppContext {
	pub fn new(project_dir: impl Into<PathBuf>) -> Self {
		Self {
			project_dir: project_dir.into(),
			..Self::default()
		}
	}

	pub fn with_profile(mut self, profile: Profile) -> Self {
		self.profile = profile;
		self
	}

	pub fn with_settings(mut self, settings: AppSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn with_container(mut self, container: Container) -> Self {
		self.container = container;
		self
	}

	/// Settings set in code for `module`. Values read from the module's own
	/// config file only fill what is left unset here.
	pub fn with_module_settings(mut self, module: impl Into<String>, settings: ModuleSettings) -> Self {
		self.module_settings.insert(module.into(), settings);
		self
	}

	pub fn project_dir(&self) -> &Path {
		&self.project_dir
	}

	pub fn profile(&self) -> &Profile {
		&self.profile
	}

	pub fn settings(&self) -> &AppSettings {
		&self.settings
	}

	pub fn module_settings(&self, module: &str) -> ModuleSettings {
		self.module_settings.get(module).cloned().unwrap_or_default()
	}

	pub fn container(&self) -> &Container {
		&self.container
	}

	pub fn container_mut(&mut self) -> &mut Container {
		&mut self.container
	}

	/// Route tables loaded so far, keyed by file path.
	pub fn routes(&self) -> &RouteTableCache {
		&self.routes
	}

	/// Resolve a project-relative path.
	pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
		self.project_dir.join(relative)
	}
}
