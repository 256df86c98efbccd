//! # Grappelli Apps
//!
//! Modules, controllers and the cascade that resolves them.
//!
//! A module is looked up in the [`Container`](grappelli_di::Container) under
//! `{namespace}.Module`; when nothing is registered there the built-in
//! [`DefaultModule`] is used. Whatever comes back must implement [`Module`],
//! otherwise resolution fails with [`AppError::ContractViolation`]. Resolved
//! modules are initialized once and cached by name for the lifetime of the
//! [`ModuleResolver`].
//!
//! Controllers are looked up under
//! `{namespace}.{controller_namespace}.{Controller}` on every request and are
//! never cached. There is no fallback controller.
//!
//! ```text
//! Unresolved ─► ConfigLoaded ─► Instantiated ─► Initialized ─► PreDispatched
//!               (overlay)       (factory)       (router)       (hook)
//! ```

mod context;
mod controller;
mod descriptor;
mod module;
mod resolver;

pub use context::AppContext;
pub use controller::{ActionArgs, ActionParam, ActionSignature, CharClass, Controller};
pub use descriptor::{ModuleDescriptor, ModuleLifecycle};
pub use module::{
	DefaultModule, DispatchScope, Module, ModuleOutcome, ModuleState, dispatch_module, run_action,
	view_paths,
};
pub use resolver::{ContainerExt, ControllerResolver, DEFAULT_MODULE_TYPE, ModuleResolver};

use grappelli_conf::ConfError;
use grappelli_di::DiError;
use grappelli_http::StatusCode;
use grappelli_urls::RouterError;

/// Errors raised while resolving and running modules and controllers.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	/// A resolved instance does not implement the required contract
	#[error("'{type_name}' does not implement {contract}")]
	ContractViolation {
		type_name: String,
		contract: &'static str,
	},

	#[error("Controller '{type_name}' not found")]
	ControllerNotFound { type_name: String },

	#[error("Action '{action}' does not exist in controller '{controller}'")]
	ActionNotFound { controller: String, action: String },

	#[error("Parameter '{parameter}' is required for action '{action}'")]
	MissingRequiredParameter { action: String, parameter: String },

	#[error("Parameter '{name}' has an invalid value '{value}': {reason}")]
	InvalidParameter {
		name: String,
		value: String,
		reason: String,
	},

	/// Raised by application code inside an action
	#[error("{message}")]
	Action { status: u16, message: String },

	#[error(transparent)]
	Routing(#[from] RouterError),

	#[error(transparent)]
	Config(#[from] ConfError),

	#[error(transparent)]
	Container(#[from] DiError),
}

impl AppError {
	/// Error raised by an action with an explicit HTTP status.
	pub fn action(status: u16, message: impl Into<String>) -> Self {
		Self::Action {
			status,
			message: message.into(),
		}
	}

	/// HTTP status the error maps to.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::ControllerNotFound { .. }
			| Self::ActionNotFound { .. }
			| Self::MissingRequiredParameter { .. }
			| Self::InvalidParameter { .. }
			| Self::Routing(RouterError::RouteNotFound(_)) => StatusCode::NOT_FOUND,
			Self::Action { status, .. } => {
				StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
			}
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

pub type AppResult<T> = Result<T, AppError>;
