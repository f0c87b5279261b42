//! Error types for sprite-sheet decoding

use thiserror::Error;

/// Error when decoding a sprite-sheet blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Bad magic, unsupported version or flags, or a malformed run-length stream
    #[error("Invalid sprite sheet: {0}")]
    Format(String),
    /// A declared span runs past the end of the input
    #[error("Truncated sprite sheet: {context} needs {needed} bytes, {available} available")]
    Truncated { context: String, needed: usize, available: usize },
    /// A frame declares zero width or height
    #[error("Frame {frame} has invalid dimensions {width}x{height}")]
    Dimension { frame: usize, width: u16, height: u16 },
}

impl SheetError {
    pub(crate) fn truncated(context: impl Into<String>, needed: usize, available: usize) -> Self {
        SheetError::Truncated { context: context.into(), needed, available }
    }
}
