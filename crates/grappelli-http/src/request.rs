use crate::{Error, Params, Result};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};

/// Incoming request as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct Request {
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	params: Params,
}

impl Request {
	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::{Method, Request};
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/account/auth/login")
	///     .header("x-requested-with", "XMLHttpRequest")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.method(), &Method::POST);
	/// assert!(request.headers().contains_key("x-requested-with"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Shorthand for a `GET` request without headers.
	pub fn get(uri: &str) -> Result<Self> {
		Self::builder().uri(uri).build()
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn uri(&self) -> &Uri {
		&self.uri
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw request path, including leading slash.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query string without the leading `?`, if any.
	///
	/// An empty query (`/path?`) is reported as `None`.
	pub fn query_string(&self) -> Option<&str> {
		self.uri.query().filter(|query| !query.is_empty())
	}

	/// GET-equivalent parameter bag.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Mutable access to the parameter bag, used by the module router to add
	/// positional parameters.
	pub fn params_mut(&mut self) -> &mut Params {
		&mut self.params
	}

	/// Whether the client asked for an XHR response.
	pub fn is_xhr(&self) -> bool {
		self.headers
			.get("x-requested-with")
			.and_then(|value| value.to_str().ok())
			.is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	headers: Vec<(String, String)>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn build(self) -> Result<Request> {
		let raw = self.uri.unwrap_or_else(|| "/".to_string());
		let uri: Uri = raw.parse().map_err(|err: http::uri::InvalidUri| Error::InvalidUri {
			uri: raw.clone(),
			reason: err.to_string(),
		})?;

		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let header_name =
				HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader(name.clone()))?;
			let header_value =
				HeaderValue::from_str(&value).map_err(|_| Error::InvalidHeader(name.clone()))?;
			headers.append(header_name, header_value);
		}

		let params = uri.query().map(Params::from_query).unwrap_or_default();

		Ok(Request {
			method: self.method,
			uri,
			headers,
			params,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/", None)]
	#[case("/blog/post/show", "/blog/post/show", None)]
	#[case("/shop?sku=1", "/shop", Some("sku=1"))]
	#[case("/shop?", "/shop", None)]
	fn test_path_and_query(
		#[case] uri: &str,
		#[case] path: &str,
		#[case] query: Option<&str>,
	) {
		// Act
		let request = Request::get(uri).expect("uri should parse");

		// Assert
		assert_eq!(request.path(), path);
		assert_eq!(request.query_string(), query);
	}

	#[rstest]
	fn test_invalid_uri_is_rejected() {
		// Act
		let result = Request::get("/bad path with spaces");

		// Assert
		assert!(matches!(result, Err(Error::InvalidUri { .. })));
	}

	#[rstest]
	fn test_invalid_header_is_rejected() {
		// Act
		let result = Request::builder().uri("/").header("bad header", "x").build();

		// Assert
		assert!(matches!(result, Err(Error::InvalidHeader(_))));
	}

	#[rstest]
	fn test_xhr_detection() {
		// Arrange
		let plain = Request::get("/").expect("uri should parse");
		let xhr = Request::builder()
			.uri("/")
			.header("X-Requested-With", "xmlhttprequest")
			.build()
			.expect("request should build");

		// Assert
		assert!(!plain.is_xhr());
		assert!(xhr.is_xhr());
	}

	#[rstest]
	fn test_params_are_mutable() {
		// Arrange
		let mut request = Request::get("/shop/cart/add?sku=99").expect("uri should parse");

		// Act
		request.params_mut().insert_if_absent("sku", "42");
		request.params_mut().insert_if_absent("qty", "3");

		// Assert
		assert_eq!(request.params().get("sku"), Some("99"));
		assert_eq!(request.params().get("qty"), Some("3"));
	}
}
