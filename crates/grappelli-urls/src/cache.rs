use crate::{RouteTable, RouterResult};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed route tables keyed by config file path.
///
/// Entries live as long as the cache and are never invalidated: a route file
/// edited after its first load is not re-read.
#[derive(Debug, Default)]
pub struct RouteTableCache {
	tables: RwLock<HashMap<PathBuf, Arc<RouteTable>>>,
	load_lock: Mutex<()>,
}

impl RouteTableCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the table parsed from `path`, parsing it on first use.
	///
	/// A failed parse is not cached, so the next call tries again.
	pub fn get_or_load(&self, path: impl AsRef<Path>) -> RouterResult<Arc<RouteTable>> {
		let path = path.as_ref();
		if let Some(table) = self.tables.read().get(path) {
			tracing::debug!(path = %path.display(), "route table cache hit");
			return Ok(Arc::clone(table));
		}

		let _guard = self.load_lock.lock();
		// Double-check: another caller may have loaded it while we waited
		if let Some(table) = self.tables.read().get(path) {
			return Ok(Arc::clone(table));
		}

		tracing::debug!(path = %path.display(), "route table cache miss");
		let mut table = RouteTable::new();
		table.add_routes(path.to_path_buf())?;
		let table = Arc::new(table);
		self.tables
			.write()
			.insert(path.to_path_buf(), Arc::clone(&table));
		Ok(table)
	}

	/// Like [`get_or_load`](Self::get_or_load), but a missing file yields
	/// `Ok(None)` instead of an error.
	pub fn load_if_present(&self, path: impl AsRef<Path>) -> RouterResult<Option<Arc<RouteTable>>> {
		let path = path.as_ref();
		if !path.is_file() {
			tracing::debug!(path = %path.display(), "no route file");
			return Ok(None);
		}
		self.get_or_load(path).map(Some)
	}

	pub fn contains(&self, path: impl AsRef<Path>) -> bool {
		self.tables.read().contains_key(path.as_ref())
	}

	pub fn len(&self) -> usize {
		self.tables.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::RouterError;
	use rstest::*;
	use std::fs;
	use tempfile::TempDir;

	#[fixture]
	fn temp_dir() -> TempDir {
		TempDir::new().expect("Failed to create temporary directory")
	}

	#[rstest]
	fn test_second_load_shares_table(temp_dir: TempDir) {
		// Arrange
		let path = temp_dir.path().join("routes.toml");
		fs::write(&path, "[routes]\nhome.from = \"/\"\n").expect("Failed to write routes");
		let cache = RouteTableCache::new();

		// Act
		let first = cache.get_or_load(&path).expect("routes should load");
		fs::write(&path, "[routes]\nother.from = \"/x\"\n").expect("Failed to rewrite routes");
		let second = cache.get_or_load(&path).expect("routes should load");

		// Assert
		assert!(Arc::ptr_eq(&first, &second));
		assert!(second.get("home").is_some());
		assert_eq!(cache.len(), 1);
	}

	#[rstest]
	fn test_failed_load_is_not_cached(temp_dir: TempDir) {
		// Arrange
		let path = temp_dir.path().join("routes.toml");
		fs::write(&path, "[bogus]\n").expect("Failed to write routes");
		let cache = RouteTableCache::new();

		// Act
		let result = cache.get_or_load(&path);

		// Assert
		assert!(matches!(result, Err(RouterError::InvalidRouteConfig { .. })));
		assert!(!cache.contains(&path));
	}

	#[rstest]
	fn test_missing_file_is_none(temp_dir: TempDir) {
		// Arrange
		let cache = RouteTableCache::new();

		// Act
		let loaded = cache
			.load_if_present(temp_dir.path().join("absent.toml"))
			.expect("missing file is not an error");

		// Assert
		assert!(loaded.is_none());
		assert!(cache.is_empty());
	}
}
