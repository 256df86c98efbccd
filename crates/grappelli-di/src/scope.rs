//! Shared (application-lifetime) values keyed by type

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Type-keyed store of values shared by everything the container resolves.
#[derive(Clone, Default)]
pub struct SharedScope {
	cache: Arc<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>,
}

impl SharedScope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Retrieves a shared value by type.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_di::SharedScope;
	///
	/// let scope = SharedScope::new();
	/// scope.set(100u64);
	///
	/// assert_eq!(*scope.get::<u64>().unwrap(), 100);
	/// assert!(scope.get::<u32>().is_none());
	/// ```
	pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache
			.get(&TypeId::of::<T>())
			.and_then(|arc| arc.clone().downcast::<T>().ok())
	}

	pub fn set<T: Any + Send + Sync>(&self, value: T) {
		self.set_arc(Arc::new(value));
	}

	pub fn set_arc<T: Any + Send + Sync>(&self, value: Arc<T>) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.insert(TypeId::of::<T>(), value);
	}

	/// Return the stored value, creating it with `init` on first access.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_di::SharedScope;
	/// use std::sync::Arc;
	///
	/// let scope = SharedScope::new();
	/// let first = scope.get_or_insert_with(|| String::from("head"));
	/// let second = scope.get_or_insert_with(|| String::from("other"));
	///
	/// assert!(Arc::ptr_eq(&first, &second));
	/// ```
	pub fn get_or_insert_with<T, F>(&self, init: F) -> Arc<T>
	where
		T: Any + Send + Sync,
		F: FnOnce() -> T,
	{
		if let Some(existing) = self.get::<T>() {
			return existing;
		}

		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		// Double-check after acquiring the write lock
		if let Some(existing) = cache
			.get(&TypeId::of::<T>())
			.and_then(|arc| arc.clone().downcast::<T>().ok())
		{
			return existing;
		}
		let value = Arc::new(init());
		cache.insert(TypeId::of::<T>(), value.clone());
		value
	}
}
