//! # Grappelli HTTP
//!
//! Minimal request/response value types consumed by the routers and the
//! dispatcher.
//!
//! The dispatcher only needs a narrow slice of HTTP: the request path, the
//! query string, a mutable GET-equivalent parameter bag that the module router
//! writes positional parameters into, and a response carrying a status code,
//! headers and a body. Redirects are ordinary responses with a `Location`
//! header.
//!
//! ## Examples
//!
//! ```
//! use grappelli_http::{Request, Response};
//! use http::StatusCode;
//!
//! let request = Request::get("/shop/cart/add?sku=42").unwrap();
//! assert_eq!(request.path(), "/shop/cart/add");
//! assert_eq!(request.params().get("sku"), Some("42"));
//!
//! let response = Response::redirect("/login", 302);
//! assert_eq!(response.status, StatusCode::FOUND);
//! ```

mod params;
mod request;
mod response;

pub use params::Params;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export the http types that appear in public signatures
pub use http::{HeaderMap, Method, StatusCode, Uri};

/// Errors raised while building HTTP value types.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The request URI could not be parsed
	#[error("Invalid request URI '{uri}': {reason}")]
	InvalidUri { uri: String, reason: String },

	/// A header name or value was rejected
	#[error("Invalid header '{0}'")]
	InvalidHeader(String),
}

/// Result alias for HTTP value construction.
pub type Result<T> = std::result::Result<T, Error>;
