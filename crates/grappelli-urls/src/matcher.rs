//! Routing behaviour shared by both tiers

use crate::{Route, RouteSource, RouteTable, RouterError, RouterResult};
use grappelli_http::{Params, Request};

/// Module/controller/action used when the path does not name them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McaDefaults {
	pub module: String,
	pub controller: String,
	pub action: String,
}

impl McaDefaults {
	pub fn new(
		module: impl Into<String>,
		controller: impl Into<String>,
		action: impl Into<String>,
	) -> Self {
		Self {
			module: module.into(),
			controller: controller.into(),
			action: action.into(),
		}
	}
}

impl Default for McaDefaults {
	fn default() -> Self {
		Self::new("home", "Index", "index")
	}
}

/// Tier-specific reading of path segments.
pub trait PositionalParser {
	type Output;

	/// Parse `path`, writing any synthesized parameters into `params`.
	///
	/// `None` means the path cannot be routed by this tier.
	fn parse(&self, path: &str, defaults: &McaDefaults, params: &mut Params) -> Option<Self::Output>;
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<T> {
	/// A redirect entry matched; nothing else was evaluated
	Redirect { location: String, status: u16 },
	Matched(T),
}

impl<T> RouteOutcome<T> {
	pub fn is_redirect(&self) -> bool {
		matches!(self, Self::Redirect { .. })
	}

	pub fn matched(self) -> Option<T> {
		match self {
			Self::Matched(output) => Some(output),
			Self::Redirect { .. } => None,
		}
	}
}

/// Split a path into segments after trimming slashes.
///
/// An empty path has no segments; inner empty segments are kept.
///
/// # Examples
///
/// ```
/// use grappelli_urls::path_segments;
///
/// assert!(path_segments("/").is_empty());
/// assert_eq!(path_segments("/shop/cart/"), vec!["shop", "cart"]);
/// assert_eq!(path_segments("a//b"), vec!["a", "", "b"]);
/// ```
pub fn path_segments(path: &str) -> Vec<&str> {
	let trimmed = path.trim_matches('/');
	if trimmed.is_empty() {
		Vec::new()
	} else {
		trimmed.split('/').collect()
	}
}

/// A route table plus defaults, evaluated in three passes: redirects, then
/// reroutes, then positional parsing.
#[derive(Debug, Clone, Default)]
pub struct RouteMatcher<P> {
	table: RouteTable,
	defaults: McaDefaults,
	parser: P,
}

impl<P: PositionalParser + Default> RouteMatcher<P> {
	pub fn new() -> Self {
		Self::with_parser(P::default())
	}
}

impl<P: PositionalParser> RouteMatcher<P> {
	pub fn with_parser(parser: P) -> Self {
		Self {
			table: RouteTable::new(),
			defaults: McaDefaults::default(),
			parser,
		}
	}

	pub fn set_defaults(&mut self, defaults: McaDefaults) -> &mut Self {
		self.defaults = defaults;
		self
	}

	pub fn with_defaults(mut self, defaults: McaDefaults) -> Self {
		self.defaults = defaults;
		self
	}

	pub fn defaults(&self) -> &McaDefaults {
		&self.defaults
	}

	pub fn add_route(&mut self, route: Route) -> RouterResult<&mut Self> {
		self.table.add_route(route)?;
		Ok(self)
	}

	pub fn add_routes(&mut self, source: impl Into<RouteSource>) -> RouterResult<&mut Self> {
		self.table.add_routes(source)?;
		Ok(self)
	}

	/// Append a shared (usually cached) table.
	pub fn add_table(&mut self, table: &RouteTable) -> RouterResult<&mut Self> {
		self.table.extend_from(table)?;
		Ok(self)
	}

	pub fn routes(&self) -> &RouteTable {
		&self.table
	}

	/// Route `path`.
	///
	/// `query` is the raw query string, appended to redirect locations.
	/// Positional parameters synthesized by the tier go into `params`.
	pub fn parse(
		&self,
		path: &str,
		query: Option<&str>,
		params: &mut Params,
	) -> RouterResult<RouteOutcome<P::Output>> {
		let trimmed = path.trim_matches('/');

		if let Some(redirect) = self.table.redirects().find(|route| route.matches(trimmed)) {
			let mut location = redirect.rewrite(trimmed);
			if let Some(query) = query.filter(|query| !query.is_empty()) {
				location.push('?');
				location.push_str(query);
			}
			let status = redirect.status().unwrap_or(crate::DEFAULT_REDIRECT_STATUS);
			tracing::info!(route = redirect.name(), %location, status, "redirecting");
			return Ok(RouteOutcome::Redirect { location, status });
		}

		let effective = match self.table.reroutes().find(|route| route.matches(trimmed)) {
			Some(route) => {
				let rewritten = route.rewrite(trimmed);
				tracing::debug!(route = route.name(), from = %path, to = %rewritten, "rerouted");
				rewritten
			}
			None => format!("/{}", trimmed),
		};

		self.parser
			.parse(&effective, &self.defaults, params)
			.map(RouteOutcome::Matched)
			.ok_or_else(|| RouterError::RouteNotFound(path.to_string()))
	}

	/// Route a request by its own path and query string.
	pub fn parse_request(&self, request: &mut Request) -> RouterResult<RouteOutcome<P::Output>> {
		let path = request.path().to_string();
		let query = request.query_string().map(str::to_string);
		self.parse(&path, query.as_deref(), request.params_mut())
	}
}
