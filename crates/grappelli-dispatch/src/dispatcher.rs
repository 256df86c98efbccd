use crate::{DispatchResult, ErrorHandler};
use grappelli_apps::{AppContext, DispatchScope, ModuleOutcome, ModuleResolver};
use grappelli_http::{Request, Response};
use grappelli_urls::{AppRouter, RouteOutcome};
use grappelli_views::{Head, JsonRenderer, Renderer, SharedHead, ViewFormat, ViewModel};
use std::fmt;
use std::sync::Arc;

/// Application-wide hooks run around every request.
///
/// An error returned from either hook is turned into an error response.
pub trait AppHooks: Send + Sync {
	fn pre_dispatch(&self, _app: &AppContext, _request: &mut Request) -> DispatchResult<()> {
		Ok(())
	}

	fn post_dispatch(&self, _app: &AppContext, _request: &Request, _response: &mut Response) -> DispatchResult<()> {
		Ok(())
	}
}

/// Runs requests through both routing tiers, the module and the controller.
///
/// Built by [`Bootstrapper`](crate::Bootstrapper). A dispatcher is `Send +
/// Sync` and may be shared behind an `Arc` by a multi-threaded host.
pub struct Dispatcher {
	app: AppContext,
	modules: ModuleResolver,
	router: AppRouter,
	renderer: Arc<dyn Renderer>,
	hooks: Vec<Arc<dyn AppHooks>>,
	errors: ErrorHandler,
}

impl Dispatcher {
	pub(crate) fn new(
		app: AppContext,
		router: AppRouter,
		renderer: Arc<dyn Renderer>,
		hooks: Vec<Arc<dyn AppHooks>>,
		errors: ErrorHandler,
	) -> Self {
		Self {
			app,
			modules: ModuleResolver::new(),
			router,
			renderer,
			hooks,
			errors,
		}
	}

	pub fn context(&self) -> &AppContext {
		&self.app
	}

	pub fn modules(&self) -> &ModuleResolver {
		&self.modules
	}

	pub fn error_handler(&self) -> &ErrorHandler {
		&self.errors
	}

	/// Handle a request. Errors become error pages.
	pub fn work(&self, mut request: Request) -> Response {
		let span = tracing::info_span!("dispatch", path = %request.path());
		let _enter = span.enter();

		match self.try_work(&mut request) {
			Ok(response) => {
				tracing::debug!(status = response.status.as_u16(), "request dispatched");
				response
			}
			Err(err) => self.errors.handle(&request, &err),
		}
	}

	/// Handle a request, returning errors to the caller instead of rendering
	/// them.
	pub fn try_work(&self, request: &mut Request) -> DispatchResult<Response> {
		for hook in &self.hooks {
			hook.pre_dispatch(&self.app, request)?;
		}

		let mut response = self.route(request)?;

		for hook in &self.hooks {
			hook.post_dispatch(&self.app, request, &mut response)?;
		}
		Ok(response)
	}

	/// Application router: defaults, the route file, then routes registered
	/// in code. Merged once at bootstrap.
	pub fn app_router(&self) -> &AppRouter {
		&self.router
	}

	fn route(&self, request: &mut Request) -> DispatchResult<Response> {
		let target = match self.router.parse_request(request)? {
			RouteOutcome::Redirect { location, status } => {
				return Ok(Response::redirect(location, status));
			}
			RouteOutcome::Matched(target) => target,
		};
		tracing::debug!(module = %target.module, path = %target.path, "application route matched");

		let module = self.modules.resolve(&self.app, &target.module)?;
		let head = self.new_head();
		let outcome = module.work(&mut DispatchScope {
			app: &self.app,
			request,
			path: &target.path,
			head: &head,
		})?;

		match outcome {
			ModuleOutcome::Redirect { location, status } => Ok(Response::redirect(location, status)),
			ModuleOutcome::View(view) => self.render(&view),
		}
	}

	/// Fresh head for a request, seeded from a [`Head`] stored in the
	/// container's shared scope.
	fn new_head(&self) -> SharedHead {
		self.app
			.container()
			.shared()
			.get::<Head>()
			.map(|head| Head::clone(&head))
			.unwrap_or_default()
			.shared()
	}

	fn render(&self, view: &ViewModel) -> DispatchResult<Response> {
		let rendered = match view.format() {
			ViewFormat::Json => JsonRenderer.render(view)?,
			ViewFormat::Html => self.renderer.render(view)?,
		};
		let mut response = Response::ok()
			.with_header("content-type", &rendered.content_type)
			.with_body(rendered.body);
		for (name, value) in view.headers() {
			response = response.with_header(name, value);
		}
		Ok(response)
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("app", &self.app)
			.field("modules", &self.modules)
			.field("routes", &self.router.routes().len())
			.field("renderer", &self.renderer.media_type())
			.field("hooks", &self.hooks.len())
			.finish()
	}
}
