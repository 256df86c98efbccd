//! Rendering through module and application include paths.

use grappelli_views::{FileRenderer, Head, Renderer, ViewError, ViewModel, ViewPaths};
use rstest::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).expect("Failed to create dirs");
	}
	fs::write(path, content).expect("Failed to write file");
}

struct Project {
	_dir: TempDir,
	paths: ViewPaths,
}

#[fixture]
fn project() -> Project {
	let dir = TempDir::new().expect("Failed to create temporary directory");
	let root = dir.path();
	write(root, "module/views/post/show.html", "post {{ id }}");
	write(root, "module/views/about.html", "module about");
	write(root, "app/views/about.html", "app about");
	write(root, "app/views/contact.html", "contact{{ fragments.footer | safe }}");
	write(root, "app/layouts/main.html", "[{{ head | safe }}]{{ content | safe }}");
	write(root, "app/fragments/footer.html", " | {{ year }}");

	let paths = ViewPaths {
		views: vec![
			root.join("module/views/post"),
			root.join("module/views"),
			root.join("app/views"),
		],
		layouts: vec![root.join("module/layouts"), root.join("app/layouts")],
		fragments: vec![root.join("module/fragments"), root.join("app/fragments")],
	};
	Project { _dir: dir, paths }
}

fn render(project: &Project, mut view: ViewModel) -> Result<String, ViewError> {
	view.set_paths(project.paths.clone());
	FileRenderer::new().render(&view).map(|rendered| rendered.body)
}

#[rstest]
#[case("show", "post 7")]
#[case("about", "module about")]
fn test_most_specific_view_wins(project: Project, #[case] name: &str, #[case] expected: &str) {
	// Act
	let body = render(&project, ViewModel::new().with_view(name).with_data("id", 7));

	// Assert
	assert_eq!(body.expect("render should succeed"), expected);
}

#[rstest]
fn test_application_layout_and_fragment(project: Project) {
	// Arrange
	let mut head = Head::new();
	head.set_title("Contact");
	let view = ViewModel::new()
		.with_view("contact")
		.with_layout("main")
		.with_head(head)
		.with_fragment("footer", ViewModel::new().with_data("year", 2026));

	// Act
	let body = render(&project, view);

	// Assert
	assert_eq!(
		body.expect("render should succeed"),
		"[<title>Contact</title>]contact | 2026"
	);
}

#[rstest]
fn test_missing_layout(project: Project) {
	// Act
	let body = render(&project, ViewModel::new().with_view("about").with_layout("print"));

	// Assert
	assert!(matches!(body, Err(ViewError::NotFound(name)) if name == "print"));
}
