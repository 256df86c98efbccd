//! Name -> factory registry

use crate::{DiError, DiResult, SharedScope};
use indexmap::IndexMap;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Type-erased product of a factory.
pub type Instance = Box<dyn Any + Send>;

/// Type-erased factory. Receives the container so it can pull shared values
/// or resolve its own dependencies.
pub type Factory = Arc<dyn Fn(&Container) -> Instance + Send + Sync>;

/// Registry of named factories plus a shared scope.
#[derive(Default)]
pub struct Container {
	factories: IndexMap<String, Factory>,
	shared: SharedScope,
}

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a factory producing `T` under `name`, replacing any previous
	/// registration.
	///
	/// To make a trait object resolvable, return it boxed:
	///
	/// ```
	/// use grappelli_di::Container;
	///
	/// trait Shape: Send {
	///     fn sides(&self) -> u8;
	/// }
	/// struct Square;
	/// impl Shape for Square {
	///     fn sides(&self) -> u8 { 4 }
	/// }
	///
	/// let mut container = Container::new();
	/// container.register("geo.Square", |_| Box::new(Square) as Box<dyn Shape>);
	///
	/// let shape = container.resolve_as::<Box<dyn Shape>>("geo.Square").unwrap();
	/// assert_eq!(shape.sides(), 4);
	/// ```
	pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
	where
		T: Any + Send,
		F: Fn(&Container) -> T + Send + Sync + 'static,
	{
		let factory: Factory = Arc::new(move |container: &Container| Box::new(factory(container)) as Instance);
		self.register_factory(name, factory)
	}

	/// Register an already type-erased factory.
	pub fn register_factory(&mut self, name: impl Into<String>, factory: Factory) -> &mut Self {
		let name = name.into();
		if self.factories.insert(name.clone(), factory).is_some() {
			tracing::debug!(name = %name, "replaced factory registration");
		}
		self
	}

	/// Store a value every resolved instance can share.
	pub fn register_shared<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
		self.shared.set(value);
		self
	}

	/// Look up a factory without invoking it.
	pub fn lookup(&self, name: &str) -> Option<Factory> {
		self.factories.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Registered names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.factories.keys().map(String::as_str)
	}

	/// Invoke the factory registered under `name`.
	pub fn resolve(&self, name: &str) -> DiResult<Instance> {
		let factory = self
			.lookup(name)
			.ok_or_else(|| DiError::NotRegistered(name.to_string()))?;
		Ok(factory(self))
	}

	/// Invoke the factory registered under `name` and downcast its product.
	pub fn resolve_as<T: Any>(&self, name: &str) -> DiResult<Box<T>> {
		self.resolve(name)?
			.downcast::<T>()
			.map_err(|_| DiError::TypeMismatch {
				name: name.to_string(),
				expected: type_name::<T>(),
			})
	}

	pub fn shared(&self) -> &SharedScope {
		&self.shared
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("factories", &self.factories.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug, PartialEq)]
	struct Counter(usize);

	#[rstest]
	fn test_resolve_invokes_factory_each_time() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let seen = Arc::clone(&calls);
		let mut container = Container::new();
		container.register("test.Counter", move |_| Counter(seen.fetch_add(1, Ordering::SeqCst)));

		// Act
		let first = container.resolve_as::<Counter>("test.Counter").unwrap();
		let second = container.resolve_as::<Counter>("test.Counter").unwrap();

		// Assert
		assert_eq!(*first, Counter(0));
		assert_eq!(*second, Counter(1));
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[rstest]
	fn test_resolve_unknown_name() {
		// Arrange
		let container = Container::new();

		// Act
		let result = container.resolve("test.Missing");

		// Assert
		assert!(matches!(result, Err(DiError::NotRegistered(name)) if name == "test.Missing"));
	}

	#[rstest]
	fn test_resolve_as_wrong_type() {
		// Arrange
		let mut container = Container::new();
		container.register("test.Counter", |_| Counter(0));

		// Act
		let result = container.resolve_as::<String>("test.Counter");

		// Assert
		assert!(matches!(result, Err(DiError::TypeMismatch { .. })));
	}

	#[rstest]
	fn test_factory_can_read_shared_scope() {
		// Arrange
		let mut container = Container::new();
		container.register_shared(String::from("shared-title"));
		container.register("test.Title", |c: &Container| {
			c.shared()
				.get::<String>()
				.map(|title| title.as_str().to_owned())
				.unwrap_or_default()
		});

		// Act
		let title = container.resolve_as::<String>("test.Title").unwrap();

		// Assert
		assert_eq!(*title, "shared-title");
	}

	#[rstest]
	fn test_names_keep_registration_order() {
		// Arrange
		let mut container = Container::new();
		container.register("b", |_| 1u8).register("a", |_| 2u8);

		// Act
		let names: Vec<&str> = container.names().collect();

		// Assert
		assert_eq!(names, vec!["b", "a"]);
		assert!(container.contains("a"));
	}
}
