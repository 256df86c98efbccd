use crate::matcher::{McaDefaults, PositionalParser, RouteMatcher, path_segments};
use grappelli_http::Params;

/// Tier-2 result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatch {
	/// Capitalized controller name
	pub controller: String,
	pub action: String,
}

/// Reads controller and action from segments 1 and 2 (segment 0 is the
/// module) and turns the remaining segments into `key/value` parameters.
///
/// Parameters already present in the bag are never overwritten, so query
/// string values take precedence over positional ones. An unpaired trailing
/// key gets an empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModulePositional;

impl PositionalParser for ModulePositional {
	type Output = ModuleMatch;

	fn parse(&self, path: &str, defaults: &McaDefaults, params: &mut Params) -> Option<ModuleMatch> {
		let segments = path_segments(path);

		let (controller, action) = match segments.as_slice() {
			[] | [_] => (defaults.controller.as_str(), defaults.action.as_str()),
			[_, controller] => (*controller, defaults.action.as_str()),
			[_, controller, action, ..] => (*controller, *action),
		};

		for pair in segments.get(3..).unwrap_or_default().chunks(2) {
			let key = pair[0];
			let value = pair.get(1).copied().unwrap_or_default();
			params.insert_if_absent(key, value);
		}

		Some(ModuleMatch {
			controller: capitalize(controller.trim()),
			action: action.trim().to_string(),
		})
	}
}

/// Module-level router.
///
/// # Examples
///
/// ```
/// use grappelli_http::Params;
/// use grappelli_urls::{McaDefaults, ModuleRouter};
///
/// let router = ModuleRouter::new().with_defaults(McaDefaults::new("shop", "Index", "index"));
/// let mut params = Params::from_query("sku=99");
///
/// let found = router
///     .parse("/shop/cart/add/sku/42/qty/2", None, &mut params)
///     .unwrap()
///     .matched()
///     .unwrap();
///
/// assert_eq!(found.controller, "Cart");
/// assert_eq!(found.action, "add");
/// assert_eq!(params.get("sku"), Some("99"));
/// assert_eq!(params.get("qty"), Some("2"));
/// ```
pub type ModuleRouter = RouteMatcher<ModulePositional>;

/// Uppercase the first character.
///
/// # Examples
///
/// ```
/// use grappelli_urls::capitalize;
///
/// assert_eq!(capitalize("post"), "Post");
/// assert_eq!(capitalize("Post"), "Post");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Route;
	use rstest::*;

	#[fixture]
	fn router() -> ModuleRouter {
		ModuleRouter::new().with_defaults(McaDefaults::new("shop", "Index", "index"))
	}

	fn parse(router: &ModuleRouter, path: &str, params: &mut Params) -> ModuleMatch {
		router
			.parse(path, None, params)
			.expect("tier 2 always routes")
			.matched()
			.expect("no redirects configured")
	}

	#[rstest]
	#[case("", "Index", "index")]
	#[case("/shop", "Index", "index")]
	#[case("/shop/cart", "Cart", "index")]
	#[case("/shop/cart/add", "Cart", "add")]
	#[case("/shop/ cart / add ", "Cart", "add")]
	fn test_controller_and_action(
		router: ModuleRouter,
		#[case] path: &str,
		#[case] controller: &str,
		#[case] action: &str,
	) {
		// Act
		let found = parse(&router, path, &mut Params::new());

		// Assert
		assert_eq!(found.controller, controller);
		assert_eq!(found.action, action);
	}

	#[rstest]
	fn test_positional_params(router: ModuleRouter) {
		// Arrange
		let mut params = Params::new();

		// Act
		parse(&router, "/shop/cart/add/sku/42/gift", &mut params);

		// Assert
		assert_eq!(params.get("sku"), Some("42"));
		assert_eq!(params.get("gift"), Some(""));
		assert_eq!(params.len(), 2);
	}

	#[rstest]
	fn test_query_params_take_precedence(router: ModuleRouter) {
		// Arrange
		let mut params = Params::from_query("sku=99");

		// Act
		parse(&router, "/shop/cart/add/sku/42", &mut params);

		// Assert
		assert_eq!(params.get("sku"), Some("99"));
	}

	#[rstest]
	fn test_repeated_positional_key_keeps_first(router: ModuleRouter) {
		// Arrange
		let mut params = Params::new();

		// Act
		parse(&router, "/shop/cart/add/page/1/page/2", &mut params);

		// Assert
		assert_eq!(params.get("page"), Some("1"));
	}

	#[rstest]
	fn test_module_reroute_feeds_positional_parser(mut router: ModuleRouter) {
		// Arrange
		router
			.add_route(Route::new("sale", "/shop/sale", "shop/catalog/list/tag/sale").unwrap())
			.unwrap();
		let mut params = Params::new();

		// Act
		let found = parse(&router, "/shop/sale/", &mut params);

		// Assert
		assert_eq!(found.controller, "Catalog");
		assert_eq!(found.action, "list");
		assert_eq!(params.get("tag"), Some("sale"));
	}
}
