//! Chunked resource containers
//!
//! A container starts with the `PRAY` magic and is followed by chunks until
//! end of input. Each chunk has a 4-byte ASCII tag, a 128-byte NUL-padded
//! name, then little-endian u32 stored length, uncompressed length and flags.
//! Flag bit 0 marks the stored bytes as a zlib stream; compressed blocks are
//! inflated only when read.

mod block;
mod error;
mod reader;
mod writer;

pub use block::{BlockInfo, ResourceBlock};
pub use error::ContainerError;
pub use reader::{ResourceContainer, CONTAINER_MAGIC, FLAG_COMPRESSED};
pub use writer::ContainerWriter;

/// Block tag for sprite sheets.
pub const TAG_SPRITE: &str = "SPRT";
/// Block tag for genomes inside an egg.
pub const TAG_GENOME: &str = "GENE";
/// Block tag for standalone 768-byte palettes.
pub const TAG_PALETTE: &str = "PALT";

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
