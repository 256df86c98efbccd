use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::Serialize;

/// Ordered GET-equivalent parameter bag.
///
/// Populated from the query string when the request is built, then extended
/// by the module router with positional `key/value` path segments. Keys that
/// already exist are never overwritten by positional parameters, so the query
/// string always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
	values: IndexMap<String, String>,
}

impl Params {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a raw query string (without the leading `?`).
	///
	/// Keys and values are percent-decoded and `+` is read as a space. A pair
	/// without `=` yields an empty value. When a key repeats, the first
	/// occurrence is kept.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Params;
	///
	/// let params = Params::from_query("name=John%20Doe&flag&name=ignored");
	/// assert_eq!(params.get("name"), Some("John Doe"));
	/// assert_eq!(params.get("flag"), Some(""));
	/// ```
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::new();
		for pair in query.split('&').filter(|pair| !pair.is_empty()) {
			// Split on first '=' only to preserve '=' in values
			let mut parts = pair.splitn(2, '=');
			let key = decode_component(parts.next().unwrap_or_default());
			if key.is_empty() {
				continue;
			}
			let value = decode_component(parts.next().unwrap_or_default());
			params.insert_if_absent(key, value);
		}
		params
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Insert or replace a value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), value.into());
	}

	/// Insert a value only when the key is not present yet.
	///
	/// Returns `true` if the value was stored.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Params;
	///
	/// let mut params = Params::from_query("sku=99");
	/// assert!(!params.insert_if_absent("sku", "42"));
	/// assert!(params.insert_if_absent("qty", "1"));
	/// assert_eq!(params.get("sku"), Some("99"));
	/// ```
	pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
		let key = key.into();
		if self.values.contains_key(&key) {
			return false;
		}
		self.values.insert(key, value.into());
		true
	}

	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.values.shift_remove(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Self::new();
		for (key, value) in iter {
			params.insert(key, value);
		}
		params
	}
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
