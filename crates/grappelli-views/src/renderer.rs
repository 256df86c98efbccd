use crate::{ViewError, ViewKind, ViewModel, ViewResult};
use serde_json::{Map, Value};
use std::fs;
use tera::{Context, Tera};

/// Rendered body plus its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
	pub body: String,
	pub content_type: String,
}

/// Template engine seam.
pub trait Renderer: Send + Sync {
	/// Media type of what [`render`](Self::render) produces.
	fn media_type(&self) -> &str;

	fn render(&self, view: &ViewModel) -> ViewResult<Rendered>;
}

/// Serializes the view data as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
	fn media_type(&self) -> &str {
		"application/json"
	}

	/// # Examples
	///
	/// ```
	/// use grappelli_views::{JsonRenderer, Renderer, ViewModel};
	///
	/// let view = ViewModel::json().with_data("id", 7).with_data("title", "Hello");
	/// let rendered = JsonRenderer.render(&view).unwrap();
	///
	/// assert_eq!(rendered.body, r#"{"id":7,"title":"Hello"}"#);
	/// assert_eq!(rendered.content_type, "application/json");
	/// ```
	fn render(&self, view: &ViewModel) -> ViewResult<Rendered> {
		Ok(Rendered {
			body: serde_json::to_string(view.data())?,
			content_type: self.media_type().to_string(),
		})
	}
}

/// Renders view scripts found in the include paths as Tera templates.
///
/// Autoescaping is on. Besides the view data, every script sees:
///
/// - `head`: the rendered head
/// - `fragments`: rendered fragments by name, each looked up in the fragment
///   include paths under its own view name (or its name)
/// - `content`: inside a layout, the rendered view
///
/// These are already HTML, so scripts print them with `| safe`, for example
/// `{{ content | safe }}` or `{{ fragments.side | default(value="") | safe }}`.
#[derive(Debug, Clone)]
pub struct FileRenderer {
	extension: String,
}

impl FileRenderer {
	pub fn new() -> Self {
		Self {
			extension: "html".to_string(),
		}
	}

	pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
		self.extension = extension.into();
		self
	}

	fn render_script(&self, view: &ViewModel, kind: ViewKind, name: &str, content: Option<&str>) -> ViewResult<String> {
		let path = view.paths().locate(kind, name, &self.extension)?;
		let template = fs::read_to_string(&path)?;
		let context = self.context(view, content)?;
		tracing::trace!(path = %path.display(), "rendering view script");
		Ok(Tera::one_off(&template, &context, true)?)
	}

	fn render_body(&self, view: &ViewModel) -> ViewResult<String> {
		let name = view.view().ok_or(ViewError::MissingName)?;
		self.render_script(view, ViewKind::View, name, None)
	}

	fn context(&self, view: &ViewModel, content: Option<&str>) -> ViewResult<Context> {
		let mut context = Context::from_value(Value::Object(view.data().clone()))?;
		let head = view.head().map(|head| head.read().render()).unwrap_or_default();
		context.insert("head", &head);
		context.insert("content", content.unwrap_or_default());

		let mut fragments = Map::new();
		for (name, fragment) in view.fragments() {
			let script = fragment.view().unwrap_or(name.as_str());
			let html = self.render_script(fragment, ViewKind::Fragment, script, None)?;
			fragments.insert(name.clone(), Value::String(html));
		}
		context.insert("fragments", &fragments);
		Ok(context)
	}
}

impl Default for FileRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl Renderer for FileRenderer {
	fn media_type(&self) -> &str {
		"text/html; charset=utf-8"
	}

	fn render(&self, view: &ViewModel) -> ViewResult<Rendered> {
		let body = self.render_body(view)?;
		let body = match view.layout() {
			Some(layout) => self.render_script(view, ViewKind::Layout, layout, Some(&body))?,
			None => body,
		};
		Ok(Rendered {
			body,
			content_type: self.media_type().to_string(),
		})
	}
}
