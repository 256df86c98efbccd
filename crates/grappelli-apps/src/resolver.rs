//! Module and controller resolution

use crate::{
	AppContext, AppError, AppResult, Controller, DefaultModule, Module, ModuleDescriptor,
	ModuleLifecycle,
};
use grappelli_di::Container;
use grappelli_urls::capitalize;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Container name of the module used when a module name has no
/// registration. When nothing is registered here either, [`DefaultModule`]
/// is used.
pub const DEFAULT_MODULE_TYPE: &str = "grappelli.DefaultModule";

/// Resolves, initializes and caches modules by name.
///
/// A module is initialized at most once per resolver. A failed resolution is
/// not cached, so the next request tries again.
#[derive(Default)]
pub struct ModuleResolver {
	modules: RwLock<HashMap<String, Arc<dyn Module>>>,
	init_lock: Mutex<()>,
}

impl ModuleResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the module named `name`, resolving it on first use.
	///
	/// Resolution steps:
	///
	/// 1. build the descriptor and apply the module config file overlay
	/// 2. look up `{namespace}.Module`, falling back to the default module
	/// 3. check the instance implements [`Module`]
	/// 4. run [`Module::init_module`] then [`Module::pre_dispatch`]
	pub fn resolve(&self, app: &AppContext, name: &str) -> AppResult<Arc<dyn Module>> {
		if let Some(module) = self.modules.read().get(name) {
			return Ok(Arc::clone(module));
		}

		let _guard = self.init_lock.lock();
		if let Some(module) = self.modules.read().get(name) {
			return Ok(Arc::clone(module));
		}

		let module: Arc<dyn Module> = Arc::from(self.build(app, name)?);
		self.modules
			.write()
			.insert(name.to_string(), Arc::clone(&module));
		tracing::info!(
			module = %name,
			namespace = %module.descriptor().namespace,
			"module ready"
		);
		Ok(module)
	}

	pub fn is_cached(&self, name: &str) -> bool {
		self.modules.read().contains_key(name)
	}

	/// Names of the modules resolved so far.
	pub fn cached(&self) -> Vec<String> {
		let mut names: Vec<_> = self.modules.read().keys().cloned().collect();
		names.sort();
		names
	}

	fn build(&self, app: &AppContext, name: &str) -> AppResult<Box<dyn Module>> {
		let descriptor = ModuleDescriptor::new(name, app.settings());
		let mut settings = app.module_settings(name);
		let config_path = app
			.project_path(&descriptor.directory)
			.join(app.settings().module_config_path_for(name));
		settings.overlay_from_file(&config_path, app.profile())?;
		let descriptor = descriptor.with_settings(settings);
		tracing::debug!(
			module = %name,
			descriptor = %descriptor.to_json(),
			"module config loaded"
		);

		let mut module = instantiate(app, &descriptor)?;
		module.state_mut().configure(descriptor);
		module.state_mut().advance(ModuleLifecycle::Instantiated);

		module.init_module(app)?;
		module.state_mut().advance(ModuleLifecycle::Initialized);

		module.pre_dispatch(app)?;
		module.state_mut().advance(ModuleLifecycle::PreDispatched);
		Ok(module)
	}
}

impl std::fmt::Debug for ModuleResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModuleResolver")
			.field("modules", &self.cached())
			.finish_non_exhaustive()
	}
}

fn instantiate(app: &AppContext, descriptor: &ModuleDescriptor) -> AppResult<Box<dyn Module>> {
	let container = app.container();
	let type_name = format!("{}.Module", descriptor.type_prefix());
	let (type_name, factory) = match container.lookup(&type_name) {
		Some(factory) => (type_name, factory),
		None => match container.lookup(DEFAULT_MODULE_TYPE) {
			Some(factory) => {
				tracing::warn!(module = %descriptor.name, missing = %type_name, "using registered default module");
				(DEFAULT_MODULE_TYPE.to_string(), factory)
			}
			None => {
				tracing::warn!(module = %descriptor.name, missing = %type_name, "using built-in default module");
				return Ok(Box::new(DefaultModule::new()));
			}
		},
	};

	factory(container)
		.downcast::<Box<dyn Module>>()
		.map(|module| *module)
		.map_err(|_| {
			tracing::error!(type_name = %type_name, "registered value is not a module");
			AppError::ContractViolation {
				type_name,
				contract: "Module",
			}
		})
}

/// Resolves controllers from the container. Controllers are never cached and
/// there is no fallback. Each new controller gets its owning module through
/// [`Controller::set_module`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerResolver;

impl ControllerResolver {
	/// Container name of `controller` in the module, e.g.
	/// `CompanyBlog.controllers.Post`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_apps::{ControllerResolver, ModuleDescriptor};
	/// use grappelli_conf::AppSettings;
	///
	/// let app = AppSettings::new().with_module_namespace("blog", "CompanyBlog");
	/// let descriptor = ModuleDescriptor::new("blog", &app);
	///
	/// assert_eq!(
	///     ControllerResolver::type_name(&descriptor, "post"),
	///     "CompanyBlog.controllers.Post"
	/// );
	/// ```
	pub fn type_name(descriptor: &ModuleDescriptor, controller: &str) -> String {
		let namespace = descriptor
			.settings
			.controller_namespace()
			.replace("::", ".")
			.replace(['\\', '/'], ".");
		format!(
			"{}.{}.{}",
			descriptor.type_prefix(),
			namespace.trim_matches('.'),
			capitalize(controller)
		)
	}

	pub fn resolve(
		&self,
		app: &AppContext,
		descriptor: &ModuleDescriptor,
		controller: &str,
	) -> AppResult<Box<dyn Controller>> {
		let container = app.container();
		let type_name = Self::type_name(descriptor, controller);
		let Some(factory) = container.lookup(&type_name) else {
			return Err(AppError::ControllerNotFound { type_name });
		};

		let mut controller = factory(container)
			.downcast::<Box<dyn Controller>>()
			.map(|controller| *controller)
			.map_err(|_| AppError::ContractViolation {
				type_name,
				contract: "Controller",
			})?;
		controller.set_module(descriptor);
		Ok(controller)
	}
}

/// Registration helpers storing modules and controllers in the form the
/// resolvers expect.
///
/// # Examples
///
/// ```
/// use grappelli_apps::{ContainerExt, DefaultModule};
/// use grappelli_di::Container;
///
/// let mut container = Container::new();
/// container.register_module("Shop.Module", |_| DefaultModule::new());
/// assert!(container.contains("Shop.Module"));
/// ```
pub trait ContainerExt {
	fn register_module<M, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
	where
		M: Module + 'static,
		F: Fn(&Container) -> M + Send + Sync + 'static;

	fn register_controller<C, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
	where
		C: Controller + 'static,
		F: Fn(&Container) -> C + Send + Sync + 'static;
}

impl ContainerExt for Container {
	fn register_module<M, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
	where
		M: Module + 'static,
		F: Fn(&Container) -> M + Send + Sync + 'static,
	{
		self.register(type_name, move |container| Box::new(factory(container)) as Box<dyn Module>)
	}

	fn register_controller<C, F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
	where
		C: Controller + 'static,
		F: Fn(&Container) -> C + Send + Sync + 'static,
	{
		self.register(type_name, move |container| {
			Box::new(factory(container)) as Box<dyn Controller>
		})
	}
}
