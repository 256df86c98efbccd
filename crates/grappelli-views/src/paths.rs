use crate::{ViewError, ViewResult};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Which include path list to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
	View,
	Layout,
	Fragment,
}

/// Ordered include paths; earlier entries win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewPaths {
	pub views: Vec<PathBuf>,
	pub layouts: Vec<PathBuf>,
	pub fragments: Vec<PathBuf>,
}

impl ViewPaths {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty() && self.layouts.is_empty() && self.fragments.is_empty()
	}

	pub fn paths(&self, kind: ViewKind) -> &[PathBuf] {
		match kind {
			ViewKind::View => &self.views,
			ViewKind::Layout => &self.layouts,
			ViewKind::Fragment => &self.fragments,
		}
	}

	/// Find `{name}.{extension}` in the include paths of `kind`.
	///
	/// Names may contain `/` to address subdirectories but must stay inside
	/// the include path. The extension is always appended, so `post.v2`
	/// looks for `post.v2.html`.
	pub fn locate(&self, kind: ViewKind, name: &str, extension: &str) -> ViewResult<PathBuf> {
		let mut relative = validate_name(name)?.into_os_string();
		relative.push(".");
		relative.push(extension);
		let relative = PathBuf::from(relative);
		for dir in self.paths(kind) {
			let candidate = dir.join(&relative);
			if candidate.is_file() {
				tracing::debug!(view = name, path = %candidate.display(), "located view script");
				return Ok(candidate);
			}
		}
		Err(ViewError::NotFound(name.to_string()))
	}
}

fn validate_name(name: &str) -> ViewResult<PathBuf> {
	let normalized = name.trim_start_matches('/');
	if normalized.is_empty() {
		return Err(ViewError::InvalidName(name.to_string()));
	}
	let path = Path::new(normalized);
	if path
		.components()
		.any(|component| !matches!(component, Component::Normal(_)))
	{
		return Err(ViewError::InvalidName(name.to_string()));
	}
	Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;
	use std::fs;
	use tempfile::TempDir;

	#[fixture]
	fn dirs() -> (TempDir, ViewPaths) {
		let root = TempDir::new().expect("Failed to create temporary directory");
		let module = root.path().join("module/views");
		let app = root.path().join("app/views");
		fs::create_dir_all(module.join("post")).expect("Failed to create dirs");
		fs::create_dir_all(&app).expect("Failed to create dirs");
		fs::write(module.join("post/show.html"), "module show").expect("write");
		fs::write(app.join("show.html"), "app show").expect("write");
		fs::write(app.join("about.html"), "app about").expect("write");

		let paths = ViewPaths {
			views: vec![module.join("post"), module.clone(), app],
			..ViewPaths::default()
		};
		(root, paths)
	}

	#[rstest]
	fn test_most_specific_path_wins(dirs: (TempDir, ViewPaths)) {
		// Arrange
		let (_root, paths) = dirs;

		// Act
		let found = paths.locate(ViewKind::View, "show", "html").expect("view exists");

		// Assert
		assert_eq!(fs::read_to_string(found).expect("read"), "module show");
	}

	#[rstest]
	fn test_falls_back_to_application_path(dirs: (TempDir, ViewPaths)) {
		// Arrange
		let (_root, paths) = dirs;

		// Act
		let found = paths.locate(ViewKind::View, "about", "html").expect("view exists");

		// Assert
		assert_eq!(fs::read_to_string(found).expect("read"), "app about");
	}

	#[rstest]
	fn test_dotted_name_keeps_its_suffix(dirs: (TempDir, ViewPaths)) {
		// Arrange
		let (_root, paths) = dirs;
		fs::write(paths.views[2].join("post.v2.html"), "second edition").expect("write");

		// Act
		let found = paths.locate(ViewKind::View, "post.v2", "html").expect("view exists");

		// Assert
		assert_eq!(found.file_name().and_then(|name| name.to_str()), Some("post.v2.html"));
		assert_eq!(fs::read_to_string(found).expect("read"), "second edition");
	}

	#[rstest]
	#[case("../secret")]
	#[case("")]
	#[case("post/../../x")]
	fn test_rejects_escaping_names(dirs: (TempDir, ViewPaths), #[case] name: &str) {
		// Arrange
		let (_root, paths) = dirs;

		// Act
		let result = paths.locate(ViewKind::View, name, "html");

		// Assert
		assert!(matches!(result, Err(ViewError::InvalidName(_))));
	}

	#[rstest]
	fn test_missing_view(dirs: (TempDir, ViewPaths)) {
		// Arrange
		let (_root, paths) = dirs;

		// Act
		let result = paths.locate(ViewKind::Layout, "show", "html");

		// Assert
		assert!(matches!(result, Err(ViewError::NotFound(_))));
	}
}
