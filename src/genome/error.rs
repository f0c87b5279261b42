//! Error types for genome parsing

use thiserror::Error;

use crate::container::ContainerError;

/// Error when reading a genome or egg.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// The genome bytes do not follow the record layout
    #[error("Invalid genome: {0}")]
    Format(String),
    /// The genome parsed but does not describe a renderable breed
    #[error("Genome schema error: {0}")]
    Schema(String),
    /// The egg container could not be opened
    #[error(transparent)]
    Container(#[from] ContainerError),
}
