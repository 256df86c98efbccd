//! Profile-scoped TOML configuration files

use crate::{ConfError, ConfResult, Profile};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Key naming the parent profile of a section.
pub const EXTENDS_KEY: &str = "extends";

/// A TOML file holding one table per profile.
#[derive(Debug, Clone)]
pub struct ProfileSource {
	path: PathBuf,
}

impl ProfileSource {
	/// Create a new profile-scoped configuration source
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_conf::ProfileSource;
	///
	/// let source = ProfileSource::new("application/config/config.toml");
	/// assert!(!source.exists());
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn exists(&self) -> bool {
		self.path.is_file()
	}

	/// Resolve the section for `profile`, following `extends` chains.
	///
	/// Returns `Ok(None)` when the file does not exist. A profile absent from an
	/// existing file resolves to an empty table.
	pub fn load(&self, profile: &Profile) -> ConfResult<Option<Table>> {
		if !self.exists() {
			tracing::debug!(path = %self.path.display(), "config file not present");
			return Ok(None);
		}

		let content = fs::read_to_string(&self.path).map_err(|source| ConfError::Io {
			path: self.path.clone(),
			source,
		})?;
		let document: Table = toml::from_str(&content).map_err(|source| ConfError::Toml {
			path: self.path.clone(),
			source,
		})?;

		self.resolve(&document, profile.as_str()).map(Some)
	}

	/// Resolve `profile` and return its `name` sub-table (`app`, `module`, ...).
	pub fn load_section(&self, profile: &Profile, name: &str) -> ConfResult<Option<Table>> {
		let Some(mut resolved) = self.load(profile)? else {
			return Ok(None);
		};
		match resolved.remove(name) {
			Some(Value::Table(table)) => Ok(Some(table)),
			Some(_) => Err(ConfError::InvalidSettings {
				path: self.path.clone(),
				message: format!("'{}.{}' must be a table", profile, name),
			}),
			None => Ok(Some(Table::new())),
		}
	}

	fn resolve(&self, document: &Table, profile: &str) -> ConfResult<Table> {
		// Walk from the requested profile up to its root ancestor
		let mut chain: Vec<(String, &Table)> = Vec::new();
		let mut current = profile.to_string();
		loop {
			if chain.iter().any(|(name, _)| *name == current) {
				let mut names: Vec<&str> = chain.iter().map(|(name, _)| name.as_str()).collect();
				names.push(&current);
				return Err(ConfError::InheritanceCycle {
					chain: names.join(" -> "),
					path: self.path.clone(),
				});
			}

			let section = match document.get(&current) {
				Some(Value::Table(table)) => table,
				Some(_) => {
					return Err(ConfError::InvalidSection {
						profile: current,
						path: self.path.clone(),
					});
				}
				None if chain.is_empty() => {
					tracing::debug!(
						path = %self.path.display(),
						profile = %current,
						"profile section absent, using defaults"
					);
					return Ok(Table::new());
				}
				None => {
					let child = chain.last().map(|(name, _)| name.clone()).unwrap_or_default();
					return Err(ConfError::UnknownParent {
						profile: child,
						parent: current,
						path: self.path.clone(),
					});
				}
			};

			let parent = section
				.get(EXTENDS_KEY)
				.and_then(Value::as_str)
				.map(str::to_string);
			chain.push((current, section));

			match parent {
				Some(parent) => current = parent,
				None => break,
			}
		}

		let mut merged = Table::new();
		for (_, section) in chain.into_iter().rev() {
			deep_merge(&mut merged, section);
		}
		merged.remove(EXTENDS_KEY);
		Ok(merged)
	}
}

/// Merge `overlay` into `base`; nested tables merge, everything else replaces.
fn deep_merge(base: &mut Table, overlay: &Table) {
	for (key, value) in overlay {
		match (base.get_mut(key), value) {
			(Some(Value::Table(existing)), Value::Table(incoming)) => deep_merge(existing, incoming),
			_ => {
				base.insert(key.clone(), value.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::*;
	use tempfile::TempDir;

	const LAYERED: &str = r#"
[production.app]
default_module = "home"
views_dir = "views/prod"

[production.app.module_namespaces]
blog = "CompanyBlog"

[staging]
extends = "production"

[staging.app]
views_dir = "views/staging"

[development]
extends = "staging"

[development.app.module_namespaces]
shop = "Store"
"#;

	#[fixture]
	fn temp_dir() -> TempDir {
		TempDir::new().expect("Failed to create temporary directory")
	}

	fn write(dir: &TempDir, content: &str) -> ProfileSource {
		let path = dir.path().join("config.toml");
		fs::write(&path, content).expect("Failed to write config.toml");
		ProfileSource::new(path)
	}

	#[rstest]
	fn test_missing_file_is_none(temp_dir: TempDir) {
		// Arrange
		let source = ProfileSource::new(temp_dir.path().join("absent.toml"));

		// Act
		let loaded = source.load(&Profile::Production).expect("load should succeed");

		// Assert
		assert!(loaded.is_none());
	}

	#[rstest]
	fn test_inheritance_chain_merges_child_last(temp_dir: TempDir) {
		// Arrange
		let source = write(&temp_dir, LAYERED);

		// Act
		let app = source
			.load_section(&Profile::Development, "app")
			.expect("load should succeed")
			.expect("file exists");

		// Assert
		assert_eq!(app["default_module"].as_str(), Some("home"));
		assert_eq!(app["views_dir"].as_str(), Some("views/staging"));
		let namespaces = app["module_namespaces"].as_table().expect("table");
		assert_eq!(namespaces["blog"].as_str(), Some("CompanyBlog"));
		assert_eq!(namespaces["shop"].as_str(), Some("Store"));
	}

	#[rstest]
	fn test_absent_profile_is_empty(temp_dir: TempDir) {
		// Arrange
		let source = write(&temp_dir, LAYERED);

		// Act
		let resolved = source
			.load(&Profile::Custom("qa".to_string()))
			.expect("load should succeed")
			.expect("file exists");

		// Assert
		assert!(resolved.is_empty());
	}

	#[rstest]
	fn test_cycle_is_rejected(temp_dir: TempDir) {
		// Arrange
		let source = write(
			&temp_dir,
			"[a]\nextends = \"b\"\n[b]\nextends = \"a\"\n",
		);

		// Act
		let result = source.load(&Profile::Custom("a".to_string()));

		// Assert
		match result {
			Err(ConfError::InheritanceCycle { chain, .. }) => assert_eq!(chain, "a -> b -> a"),
			other => panic!("expected cycle error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_unknown_parent_is_rejected(temp_dir: TempDir) {
		// Arrange
		let source = write(&temp_dir, "[development]\nextends = \"base\"\n");

		// Act
		let result = source.load(&Profile::Development);

		// Assert
		assert!(matches!(
			result,
			Err(ConfError::UnknownParent { ref parent, .. }) if parent == "base"
		));
	}

	#[rstest]
	fn test_malformed_toml_is_rejected(temp_dir: TempDir) {
		// Arrange
		let source = write(&temp_dir, "[production\n");

		// Act
		let result = source.load(&Profile::Production);

		// Assert
		assert!(matches!(result, Err(ConfError::Toml { .. })));
	}
}
