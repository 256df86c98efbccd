use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tera::escape_html;

/// Head shared by every view of a request.
pub type SharedHead = Arc<RwLock<Head>>;

const DEFAULT_TITLE_SEPARATOR: &str = " | ";

/// Page head: title, meta tags, links, stylesheets and scripts.
///
/// Keyed entries (meta tags, links) can be overridden by later views, so a
/// module layout can set a description that an action replaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Head {
	title: Vec<String>,
	title_separator: Option<String>,
	meta: IndexMap<String, (String, String)>,
	links: IndexMap<String, (String, String)>,
	stylesheets: Vec<String>,
	scripts: Vec<String>,
}

impl Head {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn shared(self) -> SharedHead {
		Arc::new(RwLock::new(self))
	}

	/// Replace the title.
	pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
		self.title = vec![title.into()];
		self
	}

	/// Add a part before the current title.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_views::Head;
	///
	/// let mut head = Head::new();
	/// head.set_title("Blog").prepend_title("Post 7").append_title("Example");
	/// assert_eq!(head.title(), "Post 7 | Blog | Example");
	/// ```
	pub fn prepend_title(&mut self, part: impl Into<String>) -> &mut Self {
		self.title.insert(0, part.into());
		self
	}

	pub fn append_title(&mut self, part: impl Into<String>) -> &mut Self {
		self.title.push(part.into());
		self
	}

	pub fn set_title_separator(&mut self, separator: impl Into<String>) -> &mut Self {
		self.title_separator = Some(separator.into());
		self
	}

	pub fn title(&self) -> String {
		let separator = self
			.title_separator
			.as_deref()
			.unwrap_or(DEFAULT_TITLE_SEPARATOR);
		self.title.join(separator)
	}

	/// Set a `<meta name=...>` tag, replacing one with the same name.
	pub fn set_meta(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
		let name = name.into();
		self.meta.insert(name.clone(), (name, content.into()));
		self
	}

	pub fn meta(&self, name: &str) -> Option<&str> {
		self.meta.get(name).map(|(_, content)| content.as_str())
	}

	pub fn remove_meta(&mut self, name: &str) -> &mut Self {
		self.meta.shift_remove(name);
		self
	}

	/// Set a `<link rel=... href=...>`, keyed by `rel`.
	pub fn set_link(&mut self, rel: impl Into<String>, href: impl Into<String>) -> &mut Self {
		let rel = rel.into();
		self.links.insert(rel.clone(), (rel, href.into()));
		self
	}

	/// Add a stylesheet once; repeated hrefs are ignored.
	pub fn append_stylesheet(&mut self, href: impl Into<String>) -> &mut Self {
		let href = href.into();
		if !self.stylesheets.contains(&href) {
			self.stylesheets.push(href);
		}
		self
	}

	/// Add a script once; repeated sources are ignored.
	pub fn append_script(&mut self, src: impl Into<String>) -> &mut Self {
		let src = src.into();
		if !self.scripts.contains(&src) {
			self.scripts.push(src);
		}
		self
	}

	pub fn stylesheets(&self) -> &[String] {
		&self.stylesheets
	}

	pub fn scripts(&self) -> &[String] {
		&self.scripts
	}

	/// Render the head contents as HTML, escaping every value.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_views::Head;
	///
	/// let mut head = Head::new();
	/// head.set_title("Home").set_meta("description", "Start page");
	/// assert_eq!(
	///     head.render(),
	///     "<title>Home</title>\n<meta name=\"description\" content=\"Start page\">"
	/// );
	/// ```
	pub fn render(&self) -> String {
		let mut lines = Vec::new();
		if !self.title.is_empty() {
			lines.push(format!("<title>{}</title>", escape_html(&self.title())));
		}
		for (name, content) in self.meta.values() {
			lines.push(format!(
				"<meta name=\"{}\" content=\"{}\">",
				escape_html(name),
				escape_html(content)
			));
		}
		for (rel, href) in self.links.values() {
			lines.push(format!("<link rel=\"{}\" href=\"{}\">", escape_html(rel), escape_html(href)));
		}
		for href in &self.stylesheets {
			lines.push(format!("<link rel=\"stylesheet\" href=\"{}\">", escape_html(href)));
		}
		for src in &self.scripts {
			lines.push(format!("<script src=\"{}\"></script>", escape_html(src)));
		}
		lines.join("\n")
	}
}
