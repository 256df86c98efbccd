//! # Grappelli DI
//!
//! An explicit name -> factory registry.
//!
//! Modules and controllers are looked up by a dotted type name such as
//! `CompanyBlog.controllers.Post`. A lookup either yields the registered
//! factory or nothing; absence is an ordinary outcome that callers branch on
//! (the module resolver falls back to a default module, the controller
//! resolver reports a not-found error).
//!
//! Values that must be shared by every resolved instance, such as the
//! page head, live in the container's [`SharedScope`].
//!
//! ## Examples
//!
//! ```
//! use grappelli_di::Container;
//!
//! struct Greeter(&'static str);
//!
//! let mut container = Container::new();
//! container.register("app.Greeter", |_| Greeter("hello"));
//!
//! let greeter = container.resolve_as::<Greeter>("app.Greeter").unwrap();
//! assert_eq!(greeter.0, "hello");
//! assert!(container.lookup("app.Missing").is_none());
//! ```

mod container;
mod scope;

pub use container::{Container, Factory, Instance};
pub use scope::SharedScope;

/// Errors raised by the container.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DiError {
	#[error("No factory registered for '{0}'")]
	NotRegistered(String),

	#[error("Factory '{name}' did not produce a {expected}")]
	TypeMismatch { name: String, expected: &'static str },
}

pub type DiResult<T> = Result<T, DiError>;
