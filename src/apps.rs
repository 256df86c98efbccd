//! Module and controller contracts and their resolvers.

pub use grappelli_apps::*;
