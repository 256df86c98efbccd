use crate::{AppContext, AppError, AppResult, ControllerResolver, ModuleDescriptor, ModuleLifecycle};
use grappelli_http::{Params, Request};
use grappelli_urls::{McaDefaults, ModuleRouter, RouteOutcome};
use grappelli_views::{SharedHead, ViewModel, ViewPaths};

/// A self-contained feature area: its own routes, controllers and views.
///
/// Implementors embed a [`ModuleState`] and expose it through
/// [`state`](Self::state) and [`state_mut`](Self::state_mut); every other
/// method has a working default. A module is initialized once, then shared by
/// all requests, so [`work`](Self::work) only gets `&self`.
///
/// # Examples
///
/// ```
/// use grappelli_apps::{AppContext, AppResult, Module, ModuleState};
///
/// #[derive(Default)]
/// struct Blog {
///     state: ModuleState,
///     warmed_up: bool,
/// }
///
/// impl Module for Blog {
///     fn state(&self) -> &ModuleState {
///         &self.state
///     }
///
///     fn state_mut(&mut self) -> &mut ModuleState {
///         &mut self.state
///     }
///
///     fn pre_dispatch(&mut self, _app: &AppContext) -> AppResult<()> {
///         self.warmed_up = true;
///         Ok(())
///     }
/// }
/// ```
pub trait Module: Send + Sync {
	fn state(&self) -> &ModuleState;

	fn state_mut(&mut self) -> &mut ModuleState;

	fn descriptor(&self) -> &ModuleDescriptor {
		&self.state().descriptor
	}

	fn name(&self) -> &str {
		&self.state().descriptor.name
	}

	/// One-time setup after instantiation. The default configures the module
	/// router from the module settings and route file.
	fn init_module(&mut self, app: &AppContext) -> AppResult<()> {
		self.state_mut().init_router(app)
	}

	/// Hook run once, right after [`init_module`](Self::init_module).
	fn pre_dispatch(&mut self, _app: &AppContext) -> AppResult<()> {
		Ok(())
	}

	/// Route the request inside the module and run the matched action.
	fn work(&self, scope: &mut DispatchScope<'_>) -> AppResult<ModuleOutcome> {
		dispatch_module(self, scope)
	}

	/// Run `action` of `controller` and return its view, ready to render.
	///
	/// Arguments are bound from `params` when given, else from the request
	/// params. Use it to forward to another action of the module.
	fn create_view(
		&self,
		scope: &DispatchScope<'_>,
		controller: &str,
		action: &str,
		params: Option<&Params>,
	) -> AppResult<ViewModel> {
		run_action(self, scope, controller, action, params)
	}
}

/// Per-module state shared by every [`Module`] implementation.
#[derive(Debug, Clone, Default)]
pub struct ModuleState {
	descriptor: ModuleDescriptor,
	router: ModuleRouter,
	lifecycle: ModuleLifecycle,
}

impl ModuleState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}

	pub fn router(&self) -> &ModuleRouter {
		&self.router
	}

	/// Mutable router, for modules that register routes in code.
	pub fn router_mut(&mut self) -> &mut ModuleRouter {
		&mut self.router
	}

	pub fn lifecycle(&self) -> ModuleLifecycle {
		self.lifecycle
	}

	/// Store the loaded configuration of a fresh instance.
	pub(crate) fn configure(&mut self, descriptor: ModuleDescriptor) {
		self.descriptor = descriptor;
		self.advance(ModuleLifecycle::ConfigLoaded);
	}

	pub(crate) fn advance(&mut self, to: ModuleLifecycle) {
		if to > self.lifecycle {
			tracing::trace!(module = %self.descriptor.name, from = %self.lifecycle, to = %to, "module lifecycle");
			self.lifecycle = to;
		}
	}

	/// Set the router defaults to this module and its default controller and
	/// action, then load the module route file if it exists.
	pub fn init_router(&mut self, app: &AppContext) -> AppResult<()> {
		let descriptor = &self.descriptor;
		let settings = &descriptor.settings;
		self.router.set_defaults(McaDefaults::new(
			descriptor.name.as_str(),
			settings.default_controller(),
			settings.default_action(),
		));

		let routes_path = app
			.project_path(&descriptor.directory)
			.join(settings.routes_config_path());
		if let Some(table) = app.routes().load_if_present(&routes_path)? {
			tracing::debug!(
				module = %descriptor.name,
				routes = table.len(),
				"loaded module routes"
			);
			self.router.add_table(&table)?;
		}
		Ok(())
	}
}

/// The module used when no module is registered for a name.
#[derive(Debug, Clone, Default)]
pub struct DefaultModule {
	state: ModuleState,
}

impl DefaultModule {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Module for DefaultModule {
	fn state(&self) -> &ModuleState {
		&self.state
	}

	fn state_mut(&mut self) -> &mut ModuleState {
		&mut self.state
	}
}

/// What a module handed back for a request.
#[derive(Debug)]
pub enum ModuleOutcome {
	Redirect { location: String, status: u16 },
	View(ViewModel),
}

/// Request-scoped inputs of [`Module::work`].
pub struct DispatchScope<'a> {
	pub app: &'a AppContext,
	pub request: &'a mut Request,
	/// Path produced by the application router
	pub path: &'a str,
	/// Head shared by every view rendered for this request
	pub head: &'a SharedHead,
}

/// Default body of [`Module::work`].
///
/// Parses `scope.path` with the module router, then hands the matched
/// controller and action to [`Module::create_view`].
pub fn dispatch_module<M>(module: &M, scope: &mut DispatchScope<'_>) -> AppResult<ModuleOutcome>
where
	M: Module + ?Sized,
{
	let query = scope.request.query_string().map(str::to_string);
	let outcome = module
		.state()
		.router()
		.parse(scope.path, query.as_deref(), scope.request.params_mut())?;
	let target = match outcome {
		RouteOutcome::Redirect { location, status } => {
			return Ok(ModuleOutcome::Redirect { location, status });
		}
		RouteOutcome::Matched(target) => target,
	};
	tracing::debug!(
		module = %module.name(),
		controller = %target.controller,
		action = %target.action,
		"module route matched"
	);

	let view = module.create_view(scope, &target.controller, &target.action, None)?;
	Ok(ModuleOutcome::View(view))
}

/// Default body of [`Module::create_view`].
///
/// 1. controller resolution, with the module injected
/// 2. controller `pre_dispatch`
/// 3. action lookup and argument binding
/// 4. invocation
/// 5. view setup: include paths, shared head, view name defaulting to the
///    action name
/// 6. controller `post_dispatch`
pub fn run_action<M>(
	module: &M,
	scope: &DispatchScope<'_>,
	controller_name: &str,
	action: &str,
	params: Option<&Params>,
) -> AppResult<ViewModel>
where
	M: Module + ?Sized,
{
	let descriptor = module.descriptor();
	let mut controller = ControllerResolver.resolve(scope.app, descriptor, controller_name)?;
	let paths = view_paths(
		scope.app,
		descriptor,
		controller.views_dir().unwrap_or(controller_name),
	);
	let request: &Request = &*scope.request;

	controller.pre_dispatch(request)?;
	let args = controller
		.signature(action)
		.ok_or_else(|| AppError::ActionNotFound {
			controller: ControllerResolver::type_name(descriptor, controller_name),
			action: action.to_string(),
		})?
		.bind(action, params.unwrap_or(request.params()))?;
	let mut view = controller.invoke(action, &args, request)?;

	view.set_paths(paths);
	view.attach_head(scope.head);
	if view.view().is_none() {
		view.set_view(action);
	}
	controller.post_dispatch(request, &mut view)?;
	Ok(view)
}

/// Include paths for a controller of the module, most specific first.
///
/// - views: `{module}/{views_dir}/{controller_views_dir}`, `{module}/{views_dir}`,
///   application views dir
/// - layouts: `{module}/{layouts_dir}`, application layouts dir
/// - fragments: `{module}/{view_fragments_dir}`, application fragments dir
///
/// The controller views dir has its first letter lowercased.
pub fn view_paths(app: &AppContext, descriptor: &ModuleDescriptor, controller_views_dir: &str) -> ViewPaths {
	let module_dir = app.project_path(&descriptor.directory);
	let settings = &descriptor.settings;
	let app_settings = app.settings();
	let module_views = module_dir.join(settings.views_dir());

	ViewPaths {
		views: vec![
			module_views.join(lowercase_first(controller_views_dir)),
			module_views,
			app.project_path(&app_settings.views_dir),
		],
		layouts: vec![
			module_dir.join(settings.layouts_dir()),
			app.project_path(&app_settings.layouts_dir),
		],
		fragments: vec![
			module_dir.join(settings.view_fragments_dir()),
			app.project_path(&app_settings.view_fragments_dir),
		],
	}
}

fn lowercase_first(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_conf::{AppSettings, ModuleSettings};
	use rstest::rstest;
	use std::path::PathBuf;

	#[rstest]
	fn test_view_paths_order() {
		// Arrange
		let app = AppContext::new("/srv/site").with_settings(AppSettings::new());
		let descriptor = ModuleDescriptor::new("blog", app.settings())
			.with_settings(ModuleSettings::new().with_views_dir("views"));

		// Act
		let paths = view_paths(&app, &descriptor, "PostArchive");

		// Assert
		assert_eq!(
			paths.views,
			vec![
				PathBuf::from("/srv/site/application/modules/blog/views/postArchive"),
				PathBuf::from("/srv/site/application/modules/blog/views"),
				PathBuf::from("/srv/site/application/views/scripts"),
			]
		);
		assert_eq!(
			paths.layouts,
			vec![
				PathBuf::from("/srv/site/application/modules/blog/views/layouts"),
				PathBuf::from("/srv/site/application/views/layouts"),
			]
		);
		assert_eq!(paths.fragments.len(), 2);
	}

	#[rstest]
	fn test_init_router_uses_module_defaults() {
		// Arrange
		let app = AppContext::new("/nonexistent");
		let mut state = ModuleState::new();
		state.configure(
			ModuleDescriptor::new("shop", app.settings())
				.with_settings(ModuleSettings::new().with_default_controller("Catalog")),
		);

		// Act
		state.init_router(&app).expect("init should succeed");

		// Assert
		assert_eq!(state.router().defaults(), &McaDefaults::new("shop", "Catalog", "index"));
		assert!(state.router().routes().is_empty());
		assert_eq!(state.lifecycle(), ModuleLifecycle::ConfigLoaded);
	}

	#[rstest]
	fn test_lifecycle_never_moves_back() {
		// Arrange
		let mut state = ModuleState::new();
		state.advance(ModuleLifecycle::Initialized);

		// Act
		state.advance(ModuleLifecycle::ConfigLoaded);

		// Assert
		assert_eq!(state.lifecycle(), ModuleLifecycle::Initialized);
	}
}
