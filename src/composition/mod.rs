//! Breed compositing - layering part frames onto one raster

mod blend;
mod context;
mod error;
mod render;

// Re-export public API
pub use context::{SheetCache, SheetProvider};
pub use error::{ComposeError, FetchError};
pub use render::{compose, ComposeOptions, MAX_CANVAS_PIXELS};

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
