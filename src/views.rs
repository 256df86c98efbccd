//! View models, the shared page head and renderers.

pub use grappelli_views::*;
