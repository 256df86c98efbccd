use crate::{Route, RouterError, RouterResult, load_route_file};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Where [`RouteTable::add_routes`] takes its routes from.
#[derive(Debug)]
pub enum RouteSource {
	/// Routes built in code, in evaluation order
	Routes(Vec<Route>),
	/// A route config file
	File(PathBuf),
}

impl From<Vec<Route>> for RouteSource {
	fn from(routes: Vec<Route>) -> Self {
		Self::Routes(routes)
	}
}

impl From<PathBuf> for RouteSource {
	fn from(path: PathBuf) -> Self {
		Self::File(path)
	}
}

/// Insertion-ordered collection of uniquely named routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	entries: IndexMap<String, Arc<Route>>,
}

impl RouteTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a route.
	///
	/// Fails with [`RouterError::DuplicateRoute`] if the name is taken; the
	/// table keeps the first entry.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::{Route, RouteTable, RouterError};
	///
	/// let mut table = RouteTable::new();
	/// table.add_route(Route::new("home", "/", "home/index/index").unwrap()).unwrap();
	///
	/// let again = table.add_route(Route::new("home", "/start", "home/start/index").unwrap());
	/// assert!(matches!(again, Err(RouterError::DuplicateRoute(_))));
	/// assert_eq!(table.len(), 1);
	/// assert_eq!(table.get("home").unwrap().pattern().as_str(), "");
	/// ```
	pub fn add_route(&mut self, route: Route) -> RouterResult<&mut Self> {
		self.insert(Arc::new(route))
	}

	fn insert(&mut self, route: Arc<Route>) -> RouterResult<&mut Self> {
		if self.entries.contains_key(route.name()) {
			return Err(RouterError::DuplicateRoute(route.name().to_string()));
		}
		self.entries.insert(route.name().to_string(), route);
		Ok(self)
	}

	/// Add routes from code or from a config file, stopping at the first
	/// failure.
	pub fn add_routes(&mut self, source: impl Into<RouteSource>) -> RouterResult<&mut Self> {
		let routes = match source.into() {
			RouteSource::Routes(routes) => routes,
			RouteSource::File(path) => load_route_file(&path)?,
		};
		for route in routes {
			self.add_route(route)?;
		}
		Ok(self)
	}

	/// Append every route of `other`, sharing the entries.
	pub fn extend_from(&mut self, other: &RouteTable) -> RouterResult<&mut Self> {
		for route in other.entries.values() {
			self.insert(Arc::clone(route))?;
		}
		Ok(self)
	}

	pub fn get(&self, name: &str) -> Option<&Route> {
		self.entries.get(name).map(Arc::as_ref)
	}

	/// All routes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Route> {
		self.entries.values().map(Arc::as_ref)
	}

	pub fn redirects(&self) -> impl Iterator<Item = &Route> {
		self.iter().filter(|route| route.is_redirect())
	}

	pub fn reroutes(&self) -> impl Iterator<Item = &Route> {
		self.iter().filter(|route| !route.is_redirect())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;

	#[fixture]
	fn mixed_table() -> RouteTable {
		let mut table = RouteTable::new();
		table
			.add_routes(vec![
				Route::new("r1", "/a", "x/y/z").unwrap(),
				Route::redirect("d1", "/b", "/c").unwrap(),
				Route::new("r2", "/d", "x/y/z").unwrap(),
			])
			.unwrap();
		table
	}

	#[rstest]
	fn test_partitions_keep_order(mixed_table: RouteTable) {
		// Act
		let redirects: Vec<&str> = mixed_table.redirects().map(Route::name).collect();
		let reroutes: Vec<&str> = mixed_table.reroutes().map(Route::name).collect();

		// Assert
		assert_eq!(redirects, vec!["d1"]);
		assert_eq!(reroutes, vec!["r1", "r2"]);
	}

	#[rstest]
	fn test_add_routes_stops_at_duplicate(mut mixed_table: RouteTable) {
		// Act
		let result = mixed_table.add_routes(vec![
			Route::new("r3", "/e", "x").unwrap(),
			Route::new("r1", "/f", "x").unwrap(),
			Route::new("r4", "/g", "x").unwrap(),
		]);

		// Assert
		assert!(matches!(result, Err(RouterError::DuplicateRoute(name)) if name == "r1"));
		assert_eq!(mixed_table.len(), 4);
		assert!(mixed_table.get("r4").is_none());
		assert_eq!(mixed_table.get("r1").unwrap().pattern().as_str(), "a");
	}

	#[rstest]
	fn test_extend_from_rejects_overlap(mixed_table: RouteTable) {
		// Arrange
		let mut other = RouteTable::new();
		other.add_route(Route::new("own", "/own", "x").unwrap()).unwrap();

		// Act
		other.extend_from(&mixed_table).unwrap();
		let again = other.extend_from(&mixed_table).map(|_| ());

		// Assert
		assert!(matches!(again, Err(RouterError::DuplicateRoute(_))));
		assert_eq!(other.len(), 4);
	}

	#[rstest]
	fn test_missing_file_is_invalid_config() {
		// Arrange
		let mut table = RouteTable::new();

		// Act
		let result = table.add_routes(PathBuf::from("/definitely/not/here/routes.toml"));

		// Assert
		assert!(matches!(result, Err(RouterError::InvalidRouteConfig { .. })));
	}
}
