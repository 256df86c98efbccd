//! # Grappelli URLs
//!
//! Two-tier routing of request paths to module, controller and action.
//!
//! ## Architecture
//!
//! ```text
//! /blog/post/show/id/7
//!        │
//!        ▼
//! ┌──────────────┐  redirect pass ─► 3xx + Location
//! │  AppRouter   │  reroute pass  ─► rewritten path
//! │  (tier 1)    │  positional    ─► module = "blog"
//! └──────┬───────┘
//!        │ effective path
//!        ▼
//! ┌──────────────┐  same three passes, module-scoped table
//! │ ModuleRouter │  positional    ─► controller = "Post", action = "show"
//! │  (tier 2)    │                   GET += { id: "7" } (if absent)
//! └──────────────┘
//! ```
//!
//! Both tiers share [`RouteMatcher`]: every [`RouteKind::Redirect`] entry is
//! checked first and pre-empts everything else; then the first matching
//! reroute entry rewrites the path; finally the tier's positional parser
//! reads the (possibly rewritten) path segments.
//!
//! Route tables are declared in code or in TOML files with `[routes]` and
//! `[redirects]` sections:
//!
//! ```toml
//! [routes]
//! login.from = "/login"
//! login.to = "account/auth/login"
//!
//! [redirects]
//! old.from = "/old/(\\d+)"
//! old.to = "/new/$1"
//! old.status = 301
//! ```

mod app_router;
mod cache;
mod config;
mod matcher;
mod module_router;
mod pattern;
mod route;
mod table;

pub use app_router::{AppMatch, AppPositional, AppRouter};
pub use cache::RouteTableCache;
pub use config::{load_route_file, parse_route_config};
pub use matcher::{McaDefaults, PositionalParser, RouteMatcher, RouteOutcome, path_segments};
pub use module_router::{ModuleMatch, ModulePositional, ModuleRouter, capitalize};
pub use pattern::RoutePattern;
pub use route::{DEFAULT_REDIRECT_STATUS, DEFAULT_TARGET, Route, RouteKind};
pub use table::{RouteSource, RouteTable};

use std::path::PathBuf;

/// Routing errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
	/// A route with the same name is already in the table
	#[error("Route '{0}' is already registered")]
	DuplicateRoute(String),

	/// A route config file is unreadable or malformed
	#[error("Invalid route config {}: {message}", display_source(.path))]
	InvalidRouteConfig {
		path: Option<PathBuf>,
		message: String,
	},

	/// A match pattern failed to compile
	#[error("Invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	/// The positional parser could not handle the path
	#[error("Could not route '{0}'")]
	RouteNotFound(String),
}

impl RouterError {
	pub(crate) fn config(path: Option<&std::path::Path>, message: impl Into<String>) -> Self {
		Self::InvalidRouteConfig {
			path: path.map(std::path::Path::to_path_buf),
			message: message.into(),
		}
	}
}

fn display_source(path: &Option<PathBuf>) -> String {
	match path {
		Some(path) => path.display().to_string(),
		None => "<inline>".to_string(),
	}
}

pub type RouterResult<T> = Result<T, RouterError>;
