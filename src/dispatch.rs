//! Bootstrapping and request dispatch.

pub use grappelli_dispatch::*;
