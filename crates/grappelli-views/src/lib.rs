//! # Grappelli Views
//!
//! What a controller action hands back to the dispatcher: a [`ViewModel`]
//! naming the view script, an optional layout, the view data and the include
//! paths the dispatcher binds before rendering. Rendering itself goes
//! through the [`Renderer`] trait so any template engine can be plugged in.
//!
//! - [`Head`]: page chrome (title, meta tags, links, scripts) shared by every
//!   view rendered during a request
//! - [`ViewPaths`]: ordered include paths for views, layouts and fragments
//! - [`JsonRenderer`]: serializes view data
//! - [`FileRenderer`]: renders view scripts from the include paths with Tera

mod head;
mod paths;
mod renderer;
mod view;

pub use head::{Head, SharedHead};
pub use paths::{ViewKind, ViewPaths};
pub use renderer::{FileRenderer, JsonRenderer, Rendered, Renderer};
pub use view::{ViewFormat, ViewModel};

/// Rendering errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
	#[error("View '{0}' not found in include paths")]
	NotFound(String),

	#[error("Invalid view name '{0}'")]
	InvalidName(String),

	#[error("No view name set")]
	MissingName,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Template error: {0}")]
	Template(#[from] tera::Error),
}

pub type ViewResult<T> = Result<T, ViewError>;
