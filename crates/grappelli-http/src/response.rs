use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

/// Outgoing response produced by the dispatcher.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Build a redirect response with a `Location` header.
	///
	/// Unknown or out-of-range codes fall back to `302 Found`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::redirect("/new/42?x=1", 301);
	/// assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
	/// assert_eq!(response.location(), Some("/new/42?x=1"));
	/// ```
	pub fn redirect(location: impl AsRef<str>, status: u16) -> Self {
		let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND);
		Self::new(status).with_location(location.as_ref())
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header; invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(header::LOCATION, value);
		}
		self
	}

	/// Serialize `data` as the JSON body and set `Content-Type`.
	pub fn with_json<T: Serialize>(mut self, data: &T) -> serde_json::Result<Self> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers.insert(
			header::CONTENT_TYPE,
			HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	pub fn location(&self) -> Option<&str> {
		self.headers
			.get(header::LOCATION)
			.and_then(|value| value.to_str().ok())
	}

	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}

	/// Body as UTF-8 text, lossily decoded.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}
