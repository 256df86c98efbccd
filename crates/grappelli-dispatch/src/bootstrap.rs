use crate::{AppHooks, DispatchResult, Dispatcher, ErrorHandler};
use grappelli_apps::AppContext;
use grappelli_conf::{AppSettings, DEFAULT_APP_CONFIG_PATH, ModuleSettings, Profile};
use grappelli_di::Container;
use grappelli_urls::{AppRouter, McaDefaults, RouteTable};
use grappelli_views::{FileRenderer, Renderer};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds a [`Dispatcher`] for a project directory.
///
/// Unless overridden, the profile comes from `GRAPPELLI_ENV` (default
/// `production`) and the settings from `application/config/config.toml`.
pub struct Bootstrapper {
	project_dir: PathBuf,
	profile: Option<Profile>,
	config_path: PathBuf,
	settings: Option<AppSettings>,
	module_settings: IndexMap<String, ModuleSettings>,
	container: Container,
	routes: RouteTable,
	renderer: Option<Arc<dyn Renderer>>,
	hooks: Vec<Arc<dyn AppHooks>>,
	error_handler: Option<ErrorHandler>,
}

impl Bootstrapper {
	pub fn new(project_dir: impl Into<PathBuf>) -> Self {
		Self {
			project_dir: project_dir.into(),
			profile: None,
			config_path: PathBuf::from(DEFAULT_APP_CONFIG_PATH),
			settings: None,
			module_settings: IndexMap::new(),
			container: Container::new(),
			routes: RouteTable::new(),
			renderer: None,
			hooks: Vec::new(),
			error_handler: None,
		}
	}

	pub fn with_profile(mut self, profile: Profile) -> Self {
		self.profile = Some(profile);
		self
	}

	/// Application config file, relative to the project dir.
	pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.config_path = path.into();
		self
	}

	/// Use these settings instead of reading the config file.
	pub fn with_settings(mut self, settings: AppSettings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn with_module_settings(mut self, module: impl Into<String>, settings: ModuleSettings) -> Self {
		self.module_settings.insert(module.into(), settings);
		self
	}

	/// Register services, modules and controllers.
	pub fn configure<F>(mut self, configure: F) -> Self
	where
		F: FnOnce(&mut Container),
	{
		configure(&mut self.container);
		self
	}

	/// Application routes declared in code, applied after the route file.
	/// A name defined in both fails the build.
	pub fn with_routes(mut self, routes: RouteTable) -> Self {
		self.routes = routes;
		self
	}

	pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
		self.renderer = Some(Arc::new(renderer));
		self
	}

	pub fn with_hooks(mut self, hooks: impl AppHooks + 'static) -> Self {
		self.hooks.push(Arc::new(hooks));
		self
	}

	pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.error_handler = Some(handler);
		self
	}

	pub fn build(self) -> DispatchResult<Dispatcher> {
		let profile = self.profile.unwrap_or_else(Profile::from_env);
		let settings = match self.settings {
			Some(settings) => settings,
			None => AppSettings::load(self.project_dir.join(&self.config_path), &profile)?,
		};

		let mut app = AppContext::new(self.project_dir)
			.with_profile(profile)
			.with_settings(settings)
			.with_container(self.container);
		for (module, settings) in self.module_settings {
			app = app.with_module_settings(module, settings);
		}

		let router = app_router(&app, &self.routes)?;
		let errors = self
			.error_handler
			.unwrap_or_else(|| ErrorHandler::for_app(&app));
		let renderer = self
			.renderer
			.unwrap_or_else(|| Arc::new(FileRenderer::new()) as Arc<dyn Renderer>);

		tracing::info!(
			project_dir = %app.project_dir().display(),
			profile = %app.profile(),
			default_module = %app.settings().default_module,
			routes = router.routes().len(),
			"application bootstrapped"
		);
		Ok(Dispatcher::new(app, router, renderer, self.hooks, errors))
	}
}

fn app_router(app: &AppContext, routes: &RouteTable) -> DispatchResult<AppRouter> {
	let settings = app.settings();
	let mut router = AppRouter::new().with_defaults(McaDefaults {
		module: settings.default_module.clone(),
		..McaDefaults::default()
	});
	let routes_path = app.project_path(&settings.routes_config_path);
	if let Some(table) = app.routes().load_if_present(&routes_path)? {
		router.add_table(&table)?;
	}
	router.add_table(routes)?;
	Ok(router)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::DispatchError;
	use grappelli_urls::{Route, RouterError};
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	#[rstest]
	fn test_broken_config_fails_the_build() {
		// Arrange
		let dir = TempDir::new().expect("Failed to create temporary directory");
		fs::write(dir.path().join("app.toml"), "[production.app\n").expect("write");

		// Act
		let result = Bootstrapper::new(dir.path())
			.with_profile(Profile::Production)
			.with_config_path("app.toml")
			.build();

		// Assert
		assert!(matches!(result, Err(DispatchError::Config(_))));
	}

	#[rstest]
	fn test_explicit_settings_skip_the_config_file() {
		// Arrange
		let settings = AppSettings::new().with_default_module("portal");

		// Act
		let dispatcher = Bootstrapper::new("/nonexistent")
			.with_profile(Profile::Staging)
			.with_settings(settings)
			.build()
			.expect("bootstrap should succeed");

		// Assert
		assert_eq!(dispatcher.context().settings().default_module, "portal");
		assert_eq!(dispatcher.context().profile(), &Profile::Staging);
		assert_eq!(
			dispatcher.error_handler().error_views_dir(),
			std::path::Path::new("/nonexistent/application/views/errors")
		);
	}

	#[rstest]
	fn test_route_defined_in_file_and_code_fails_the_build() {
		// Arrange
		let dir = TempDir::new().expect("Failed to create temporary directory");
		let config = dir.path().join("application/config");
		fs::create_dir_all(&config).expect("Failed to create dirs");
		fs::write(
			config.join("routes.toml"),
			"[routes]\nlogin.from = \"/login\"\nlogin.to = \"account/auth/login\"\n",
		)
		.expect("write");
		let mut routes = RouteTable::new();
		routes
			.add_route(Route::new("login", "/signin", "account/auth/login").expect("valid route"))
			.expect("first insert");

		// Act
		let result = Bootstrapper::new(dir.path())
			.with_profile(Profile::Production)
			.with_settings(AppSettings::new())
			.with_routes(routes)
			.build();

		// Assert
		assert!(matches!(
			result,
			Err(DispatchError::Routing(RouterError::DuplicateRoute(name))) if name == "login"
		));
	}

	#[rstest]
	fn test_route_file_is_merged_once_at_build() {
		// Arrange
		let dir = TempDir::new().expect("Failed to create temporary directory");
		let config = dir.path().join("application/config");
		fs::create_dir_all(&config).expect("Failed to create dirs");
		let routes_file = config.join("routes.toml");
		fs::write(
			&routes_file,
			"[routes]\nlogin.from = \"/login\"\nlogin.to = \"account/auth/login\"\n",
		)
		.expect("write");
		let dispatcher = Bootstrapper::new(dir.path())
			.with_profile(Profile::Production)
			.with_settings(AppSettings::new())
			.build()
			.expect("bootstrap should succeed");

		// Act
		fs::remove_file(&routes_file).expect("remove");

		// Assert
		assert!(dispatcher.app_router().routes().get("login").is_some());
	}
}
