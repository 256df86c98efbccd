//! Route tables and the two routing tiers.
//!
//! # Examples
//!
//! ```rust
//! use grappelli::urls::{AppRouter, McaDefaults};
//! use grappelli::http::Params;
//!
//! let router = AppRouter::new().with_defaults(McaDefaults::new("home", "Index", "index"));
//! let target = router
//!     .parse("/shop/cart/add", None, &mut Params::new())
//!     .unwrap()
//!     .matched()
//!     .unwrap();
//! assert_eq!(target.module, "shop");
//! ```

pub use grappelli_urls::*;
