use crate::matcher::{McaDefaults, PositionalParser, RouteMatcher, path_segments};
use grappelli_http::Params;

/// Tier-1 result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMatch {
	/// Selected module name
	pub module: String,
	/// Path after an optional reroute, handed to the module tier
	pub path: String,
}

/// Picks the module from the first path segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppPositional;

impl PositionalParser for AppPositional {
	type Output = AppMatch;

	fn parse(&self, path: &str, defaults: &McaDefaults, _params: &mut Params) -> Option<AppMatch> {
		let segments = path_segments(path);
		let module = segments
			.first()
			.map(|segment| segment.trim())
			.unwrap_or(defaults.module.as_str());

		Some(AppMatch {
			module: module.to_string(),
			path: path.to_string(),
		})
	}
}

/// Application-level router.
///
/// # Examples
///
/// ```
/// use grappelli_http::Params;
/// use grappelli_urls::{AppRouter, McaDefaults};
///
/// let mut router = AppRouter::new();
/// router.set_defaults(McaDefaults::new("home", "Index", "index"));
///
/// let found = router
///     .parse("/shop/cart/add", None, &mut Params::new())
///     .unwrap()
///     .matched()
///     .unwrap();
/// assert_eq!(found.module, "shop");
/// ```
pub type AppRouter = RouteMatcher<AppPositional>;
