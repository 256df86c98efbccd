//! Profile-scoped application and module settings.

pub use grappelli_conf::*;
