//! # Grappelli
//!
//! Hierarchical module/controller/action routing and dispatch.
//!
//! A request path is routed in two tiers. The application router picks a
//! module from the first path segment, after applying application-wide
//! redirects and rewrites. The module's own router then picks the controller
//! and action and turns the remaining `key/value` segments into request
//! parameters.
//!
//! ```text
//! /blog/post/show/id/7
//!  │    │    │    └──── params: id=7
//!  │    │    └───────── action: show
//!  │    └────────────── controller: Post
//!  └─────────────────── module: blog
//! ```
//!
//! ## Feature Flags
//!
//! - `full` (default) - routing, module resolution and dispatch
//! - `minimal` - routing and HTTP value types only
//! - `apps` - module and controller contracts, container, views
//! - `dispatch` - bootstrapper, dispatcher and error pages
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "dispatch")]
//! # {
//! use grappelli::prelude::*;
//!
//! struct Hello {
//!     index: ActionSignature,
//! }
//!
//! impl Controller for Hello {
//!     fn signature(&self, action: &str) -> Option<&ActionSignature> {
//!         (action == "index").then_some(&self.index)
//!     }
//!
//!     fn invoke(&mut self, _action: &str, args: &ActionArgs, _request: &Request) -> AppResult<ViewModel> {
//!         Ok(ViewModel::json().with_data("hello", args.get_or("name", "world")))
//!     }
//! }
//!
//! let dispatcher = Bootstrapper::new("/nonexistent")
//!     .with_profile(Profile::Production)
//!     .configure(|container| {
//!         container.register_controller("home.controllers.Index", |_| Hello {
//!             index: ActionSignature::new().optional("name", "world"),
//!         });
//!     })
//!     .build()
//!     .unwrap();
//!
//! let response = dispatcher.work(Request::get("/home/index/index/name/grappelli").unwrap());
//! assert_eq!(response.text(), r#"{"hello":"grappelli"}"#);
//! # }
//! ```

#[cfg(feature = "apps")]
pub mod apps;
pub mod conf;
#[cfg(feature = "apps")]
pub mod di;
#[cfg(feature = "dispatch")]
pub mod dispatch;
pub mod http;
pub mod urls;
#[cfg(feature = "apps")]
pub mod views;

pub use grappelli_http::{Request, Response, StatusCode};
pub use grappelli_urls::{AppRouter, ModuleRouter, Route, RouteTable, RouterError};

#[cfg(feature = "apps")]
pub use grappelli_apps::{AppError, AppResult, Controller, Module};

#[cfg(feature = "dispatch")]
pub use grappelli_dispatch::{Bootstrapper, DispatchError, Dispatcher};

/// Commonly used types.
pub mod prelude {
	pub use crate::{AppRouter, ModuleRouter, Request, Response, Route, RouteTable, RouterError, StatusCode};
	pub use grappelli_conf::{AppSettings, ModuleSettings, Profile};
	pub use grappelli_urls::{McaDefaults, RouteOutcome};

	#[cfg(feature = "apps")]
	pub use grappelli_apps::{
		ActionArgs, ActionSignature, AppContext, AppError, AppResult, CharClass, ContainerExt,
		Controller, DefaultModule, Module, ModuleState,
	};
	#[cfg(feature = "apps")]
	pub use grappelli_di::Container;
	#[cfg(feature = "apps")]
	pub use grappelli_views::{Head, ViewModel};

	#[cfg(feature = "dispatch")]
	pub use grappelli_dispatch::{AppHooks, Bootstrapper, DispatchError, DispatchResult, Dispatcher};
}
