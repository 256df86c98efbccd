//! Declarative route config files

use crate::{Route, RouterError, RouterResult};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

const ROUTES_SECTION: &str = "routes";
const REDIRECTS_SECTION: &str = "redirects";

/// Read and parse a route config file.
///
/// Any I/O or parse failure is reported as
/// [`RouterError::InvalidRouteConfig`].
pub fn load_route_file(path: impl AsRef<Path>) -> RouterResult<Vec<Route>> {
	let path = path.as_ref();
	let content = fs::read_to_string(path)
		.map_err(|err| RouterError::config(Some(path), format!("cannot read file: {}", err)))?;
	parse_route_config(&content, Some(path))
}

/// Parse route config text.
///
/// Only `[routes]` and `[redirects]` sections are accepted. Each entry is a
/// table of properties keyed by route name; routes come back in file order.
///
/// # Examples
///
/// ```
/// use grappelli_urls::parse_route_config;
///
/// let routes = parse_route_config(
///     r#"
/// [routes]
/// login.from = "/login"
/// login.to = "account/auth/login"
///
/// [redirects]
/// old.from = "/old/(\\d+)"
/// old.to = "/new/$1"
/// old.status = 301
/// "#,
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[1].status(), Some(301));
/// ```
pub fn parse_route_config(content: &str, path: Option<&Path>) -> RouterResult<Vec<Route>> {
	let document: Table = toml::from_str(content)
		.map_err(|err| RouterError::config(path, format!("cannot parse file: {}", err)))?;

	let mut routes = Vec::new();
	for (section, entries) in &document {
		let redirect = match section.as_str() {
			ROUTES_SECTION => false,
			REDIRECTS_SECTION => true,
			other => {
				return Err(RouterError::config(
					path,
					format!(
						"unsupported route type '{}', use \"{}\" or \"{}\"",
						other, ROUTES_SECTION, REDIRECTS_SECTION
					),
				));
			}
		};

		let Value::Table(entries) = entries else {
			return Err(RouterError::config(
				path,
				format!("section '{}' must be a table", section),
			));
		};

		for (name, properties) in entries {
			let Value::Table(properties) = properties else {
				return Err(RouterError::config(
					path,
					format!("route '{}.{}' must be a table of properties", section, name),
				));
			};
			let route = Route::from_properties(name, redirect, properties).map_err(|err| match err {
				RouterError::InvalidRouteConfig { message, .. } => RouterError::config(path, message),
				other => other,
			})?;
			routes.push(route);
		}
	}

	tracing::debug!(
		path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
		count = routes.len(),
		"parsed route config"
	);
	Ok(routes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("[views]\nhome.from = \"/\"\n")]
	#[case("routes = 3\n")]
	#[case("[routes]\nlogin = \"/login\"\n")]
	#[case("[routes\n")]
	#[case("[routes]\nbad.from = \"(\"\n")]
	fn test_invalid_configs(#[case] content: &str) {
		// Act
		let result = parse_route_config(content, None);

		// Assert
		assert!(
			matches!(
				result,
				Err(RouterError::InvalidRouteConfig { .. } | RouterError::InvalidPattern { .. })
			),
			"unexpected result for {:?}",
			content
		);
	}

	#[rstest]
	fn test_routes_keep_file_order() {
		// Arrange
		let content = r#"
[routes]
b.from = "/b"
a.from = "/a"

[redirects]
z.from = "/z"
"#;

		// Act
		let routes = parse_route_config(content, None).expect("config should parse");

		// Assert
		let names: Vec<&str> = routes.iter().map(Route::name).collect();
		assert_eq!(names, vec!["b", "a", "z"]);
		assert!(routes[2].is_redirect());
	}

	#[rstest]
	fn test_empty_config_yields_no_routes() {
		// Act
		let routes = parse_route_config("", None).expect("empty config is valid");

		// Assert
		assert!(routes.is_empty());
	}
}
