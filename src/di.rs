//! Name -> factory container used to resolve modules and controllers.

pub use grappelli_di::*;
