//! Error types for resource containers

use thiserror::Error;

/// Error when opening a container or reading one of its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Bad magic or a malformed chunk header
    #[error("Invalid resource container: {0}")]
    Format(String),
    /// A chunk header or stored span runs past the end of the buffer
    #[error("Truncated resource container: {context} needs {needed} bytes, {available} available")]
    Truncated { context: String, needed: usize, available: usize },
    /// Two blocks share a name
    #[error("Duplicate block name '{0}'")]
    DuplicateBlock(String),
    /// No block with the requested name
    #[error("Block '{0}' not found")]
    NotFound(String),
    /// Inflating a compressed block failed or produced the wrong length
    #[error("Failed to decompress block '{name}': {reason}")]
    Decompression { name: String, reason: String },
}
