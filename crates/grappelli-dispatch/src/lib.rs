//! # Grappelli Dispatch
//!
//! Turns a [`Request`](grappelli_http::Request) into a
//! [`Response`](grappelli_http::Response).
//!
//! ## Architecture
//!
//! ```text
//! Request → AppHooks::pre_dispatch
//!         → AppRouter (module)          ──► redirect response
//!         → ModuleResolver (cached)
//!         → Module::work
//!             → ModuleRouter (controller, action, params) ──► redirect response
//!             → ControllerResolver → action → ViewModel
//!         → Renderer → Response
//!         → AppHooks::post_dispatch
//!
//! any error → ErrorHandler → error page
//! ```
//!
//! ## Examples
//!
//! ```
//! use grappelli_apps::{ActionArgs, ActionSignature, AppResult, ContainerExt, Controller};
//! use grappelli_conf::Profile;
//! use grappelli_dispatch::Bootstrapper;
//! use grappelli_http::{Request, StatusCode};
//! use grappelli_views::ViewModel;
//!
//! struct Status {
//!     index: ActionSignature,
//! }
//!
//! impl Controller for Status {
//!     fn signature(&self, action: &str) -> Option<&ActionSignature> {
//!         (action == "index").then_some(&self.index)
//!     }
//!
//!     fn invoke(&mut self, _action: &str, _args: &ActionArgs, _request: &Request) -> AppResult<ViewModel> {
//!         Ok(ViewModel::json().with_data("status", "ok"))
//!     }
//! }
//!
//! let dispatcher = Bootstrapper::new("/nonexistent")
//!     .with_profile(Profile::Production)
//!     .configure(|container| {
//!         container.register_controller("home.controllers.Index", |_| Status {
//!             index: ActionSignature::new(),
//!         });
//!     })
//!     .build()
//!     .unwrap();
//!
//! let response = dispatcher.work(Request::get("/").unwrap());
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.text(), r#"{"status":"ok"}"#);
//! ```

mod bootstrap;
mod dispatcher;
mod error_handler;

pub use bootstrap::Bootstrapper;
pub use dispatcher::{AppHooks, Dispatcher};
pub use error_handler::ErrorHandler;

use grappelli_apps::AppError;
use grappelli_conf::ConfError;
use grappelli_http::StatusCode;
use grappelli_urls::RouterError;
use grappelli_views::ViewError;
use thiserror::Error;

/// Errors that can occur during request dispatching
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
	#[error(transparent)]
	Routing(#[from] RouterError),

	#[error(transparent)]
	App(#[from] AppError),

	#[error(transparent)]
	Config(#[from] ConfError),

	/// Rendering failed
	#[error("View error: {0}")]
	View(#[from] ViewError),

	/// Raised by application hooks
	#[error("{message}")]
	Hook { status: u16, message: String },
}

impl DispatchError {
	pub fn hook(status: u16, message: impl Into<String>) -> Self {
		Self::Hook {
			status,
			message: message.into(),
		}
	}

	/// HTTP status the error maps to.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_dispatch::DispatchError;
	/// use grappelli_http::StatusCode;
	/// use grappelli_urls::RouterError;
	///
	/// let err = DispatchError::from(RouterError::RouteNotFound("/x".into()));
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Routing(RouterError::RouteNotFound(_)) => StatusCode::NOT_FOUND,
			Self::App(err) => err.status_code(),
			Self::Hook { status, .. } => {
				StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
			}
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

pub type DispatchResult<T> = Result<T, DispatchError>;
