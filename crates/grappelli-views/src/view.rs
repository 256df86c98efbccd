use crate::{Head, SharedHead, ViewPaths};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

/// Output format chosen by the action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFormat {
	#[default]
	Html,
	Json,
}

/// Render descriptor returned by controller actions.
///
/// The dispatcher fills in whatever the action left unset: the include paths,
/// the shared head and, when no view name was given, the action name.
#[derive(Clone, Default)]
pub struct ViewModel {
	view: Option<String>,
	layout: Option<String>,
	data: Map<String, Value>,
	fragments: IndexMap<String, ViewModel>,
	head: Option<SharedHead>,
	paths: ViewPaths,
	format: ViewFormat,
	headers: IndexMap<String, String>,
}

impl ViewModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// A view rendered as JSON from its data.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_views::{ViewFormat, ViewModel};
	///
	/// let view = ViewModel::json().with_data("id", 7);
	/// assert_eq!(view.format(), ViewFormat::Json);
	/// assert_eq!(view.get("id"), Some(&serde_json::json!(7)));
	/// ```
	pub fn json() -> Self {
		Self {
			format: ViewFormat::Json,
			..Self::default()
		}
	}

	pub fn with_view(mut self, view: impl Into<String>) -> Self {
		self.view = Some(view.into());
		self
	}

	pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
		self.layout = Some(layout.into());
		self
	}

	/// Set a data entry, replacing an existing one.
	pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}

	pub fn with_fragment(mut self, name: impl Into<String>, fragment: ViewModel) -> Self {
		self.fragments.insert(name.into(), fragment);
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());
		self
	}

	/// Add a data entry. Existing keys are kept unless `overwrite` is set.
	///
	/// Returns `true` if the value was stored.
	pub fn add_view_data(&mut self, key: impl Into<String>, value: impl Into<Value>, overwrite: bool) -> bool {
		let key = key.into();
		if !overwrite && self.data.contains_key(&key) {
			return false;
		}
		self.data.insert(key, value.into());
		true
	}

	/// Merge a whole map using the same rule as [`add_view_data`](Self::add_view_data).
	pub fn set_view_data(&mut self, data: Map<String, Value>, overwrite: bool) {
		for (key, value) in data {
			self.add_view_data(key, value, overwrite);
		}
	}

	pub fn view(&self) -> Option<&str> {
		self.view.as_deref()
	}

	pub fn set_view(&mut self, view: impl Into<String>) {
		self.view = Some(view.into());
	}

	pub fn layout(&self) -> Option<&str> {
		self.layout.as_deref()
	}

	pub fn set_layout(&mut self, layout: Option<String>) {
		self.layout = layout;
	}

	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	pub fn fragments(&self) -> &IndexMap<String, ViewModel> {
		&self.fragments
	}

	pub fn fragment(&self, name: &str) -> Option<&ViewModel> {
		self.fragments.get(name)
	}

	pub fn format(&self) -> ViewFormat {
		self.format
	}

	pub fn headers(&self) -> &IndexMap<String, String> {
		&self.headers
	}

	pub fn head(&self) -> Option<&SharedHead> {
		self.head.as_ref()
	}

	pub fn has_head(&self) -> bool {
		self.head.is_some()
	}

	/// Attach `head` unless one is already attached. Fragments without a head
	/// receive the same one.
	pub fn attach_head(&mut self, head: &SharedHead) {
		if self.head.is_none() {
			self.head = Some(SharedHead::clone(head));
		}
		for fragment in self.fragments.values_mut() {
			fragment.attach_head(head);
		}
	}

	/// Replace the attached head with a private one.
	pub fn with_head(mut self, head: Head) -> Self {
		self.head = Some(head.shared());
		self
	}

	pub fn paths(&self) -> &ViewPaths {
		&self.paths
	}

	/// Bind include paths. Fragments without their own paths inherit them.
	pub fn set_paths(&mut self, paths: ViewPaths) {
		for fragment in self.fragments.values_mut() {
			if fragment.paths.is_empty() {
				fragment.set_paths(paths.clone());
			}
		}
		self.paths = paths;
	}
}

impl fmt::Debug for ViewModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewModel")
			.field("view", &self.view)
			.field("layout", &self.layout)
			.field("format", &self.format)
			.field("data", &self.data)
			.field("fragments", &self.fragments.keys().collect::<Vec<_>>())
			.field("has_head", &self.head.is_some())
			.finish()
	}
}
