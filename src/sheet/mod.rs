//! Indexed-color sprite sheets
//!
//! A sheet is a little-endian binary blob: a 12-byte header (`ISPR` magic,
//! version, flags, frame count), an optional 768-byte palette, a 16-byte
//! entry per frame (width, height, absolute offset, stored length, encoding)
//! and the frame data. Frames are stored raw or run-length encoded and are
//! always handed out uncompressed.

mod decode;
mod encode;
mod error;
mod rle;

pub use decode::{decode_sheet, read_header, FrameEncoding, FrameEntry, SheetHeader, SHEET_MAGIC};
pub use encode::SheetEncoder;
pub use error::SheetError;

/// Result type alias for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;
