//! Integration tests for loading application and module settings from
//! profile-scoped TOML files.

use grappelli_conf::{AppSettings, ConfError, ModuleSettings, Profile};
use rstest::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const APP_CONFIG: &str = r#"
[production.app]
default_module = "portal"
modules_dir = "src/modules"
site_name = "Example"

[production.app.module_namespaces]
blog = "CompanyBlog"

[production.app.module_config_paths]
blog = "etc/blog.toml"

[development]
extends = "production"

[development.app]
views_dir = "views/dev"
"#;

const MODULE_CONFIG: &str = r#"
[production.module]
default_controller = "Post"
views_dir = "templates"

[development]
extends = "production"

[development.module]
default_action = "list"
"#;

#[fixture]
fn project_dir() -> TempDir {
	let dir = TempDir::new().expect("Failed to create temporary directory");
	fs::write(dir.path().join("config.toml"), APP_CONFIG).expect("Failed to write config.toml");
	fs::write(dir.path().join("module.toml"), MODULE_CONFIG).expect("Failed to write module.toml");
	dir
}

#[rstest]
fn test_app_settings_from_production(project_dir: TempDir) {
	// Act
	let settings = AppSettings::load(project_dir.path().join("config.toml"), &Profile::Production)
		.expect("settings should load");

	// Assert
	assert_eq!(settings.default_module, "portal");
	assert_eq!(settings.modules_dir, PathBuf::from("src/modules"));
	assert_eq!(settings.views_dir, PathBuf::from("application/views/scripts"));
	assert_eq!(settings.namespace_for("blog"), "CompanyBlog");
	assert_eq!(settings.module_config_path_for("blog"), PathBuf::from("etc/blog.toml"));
	assert_eq!(
		settings.custom.get("site_name").and_then(|v| v.as_str()),
		Some("Example")
	);
}

#[rstest]
#[case(Profile::Production, "application/views/scripts")]
#[case(Profile::Development, "views/dev")]
#[case(Profile::Staging, "application/views/scripts")]
fn test_app_settings_per_profile(
	project_dir: TempDir,
	#[case] profile: Profile,
	#[case] views_dir: &str,
) {
	// Act
	let settings = AppSettings::load(project_dir.path().join("config.toml"), &profile)
		.expect("settings should load");

	// Assert
	assert_eq!(settings.views_dir, PathBuf::from(views_dir));
}

#[rstest]
fn test_app_settings_reject_wrong_types(project_dir: TempDir) {
	// Arrange
	let path = project_dir.path().join("broken.toml");
	fs::write(&path, "[production.app]\ndefault_module = 3\n").expect("Failed to write file");

	// Act
	let result = AppSettings::load(&path, &Profile::Production);

	// Assert
	assert!(matches!(result, Err(ConfError::InvalidSettings { .. })));
}

#[rstest]
fn test_module_overlay_preserves_explicit_fields(project_dir: TempDir) {
	// Arrange
	let mut settings = ModuleSettings::new().with_views_dir("custom/views");

	// Act
	settings
		.overlay_from_file(project_dir.path().join("module.toml"), &Profile::Development)
		.expect("overlay should apply");

	// Assert
	assert_eq!(settings.views_dir(), Path::new("custom/views"));
	assert_eq!(settings.default_controller(), "Post");
	assert_eq!(settings.default_action(), "list");
	assert_eq!(settings.controller_namespace(), "controllers");
}

#[rstest]
fn test_module_overlay_missing_file_is_noop(project_dir: TempDir) {
	// Arrange
	let mut settings = ModuleSettings::new();

	// Act
	settings
		.overlay_from_file(project_dir.path().join("absent.toml"), &Profile::Production)
		.expect("missing file is not an error");

	// Assert
	assert_eq!(settings, ModuleSettings::new());
}
