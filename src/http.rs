//! Request and response value types.
//!
//! # Examples
//!
//! ```rust
//! use grappelli::http::Request;
//!
//! let request = Request::get("/shop/cart/add?sku=42").unwrap();
//! assert_eq!(request.params().get("sku"), Some("42"));
//! ```

pub use grappelli_http::*;
