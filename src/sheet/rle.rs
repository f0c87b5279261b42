//! Run-length row encoding
//!
//! Each row is a sequence of little-endian `u16` run tags ending with a `0`
//! tag. For any other tag, `tag >> 1` is the run length; the low bit set
//! means an opaque run followed by that many index bytes, clear means that
//! many transparent (index 0) pixels.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use super::error::SheetError;

/// Longest run a single tag can describe.
pub(crate) const MAX_RUN: usize = (u16::MAX >> 1) as usize;

const END_OF_ROW: u16 = 0;
const OPAQUE_BIT: u16 = 1;

/// Expand a run-length frame into `width * height` palette indices.
pub(crate) fn decode_rle(data: &[u8], width: u32, height: u32, frame: usize) -> Result<Vec<u8>, SheetError> {
    let width = width as usize;
    // Headers are untrusted; reserve no more than the input could plausibly fill.
    let mut pixels = Vec::with_capacity((width * height as usize).min(data.len()));
    let mut cursor = Cursor::new(data);

    for row in 0..height {
        let mut filled = 0usize;
        loop {
            let at = cursor.position() as usize;
            let tag = cursor.read_u16::<LittleEndian>().map_err(|_| {
                SheetError::truncated(format!("frame {} row {} run tag", frame, row), at + 2, data.len())
            })?;

            if tag == END_OF_ROW {
                if filled != width {
                    return Err(SheetError::Format(format!(
                        "frame {} row {} ends after {} of {} pixels",
                        frame, row, filled, width
                    )));
                }
                break;
            }

            let count = (tag >> 1) as usize;
            if count == 0 {
                return Err(SheetError::Format(format!("frame {} row {} has an empty opaque run", frame, row)));
            }
            if filled + count > width {
                return Err(SheetError::Format(format!(
                    "frame {} row {} overruns width {} ({} pixels)",
                    frame,
                    row,
                    width,
                    filled + count
                )));
            }

            if tag & OPAQUE_BIT == OPAQUE_BIT {
                let start = pixels.len();
                let at = cursor.position() as usize;
                pixels.resize(start + count, 0);
                cursor.read_exact(&mut pixels[start..]).map_err(|_| {
                    SheetError::truncated(format!("frame {} row {} opaque run", frame, row), at + count, data.len())
                })?;
            } else {
                pixels.resize(pixels.len() + count, 0);
            }
            filled += count;
        }
    }

    Ok(pixels)
}

/// Encode `width * height` palette indices as run-length rows.
pub(crate) fn encode_rle(pixels: &[u8], width: u32) -> Vec<u8> {
    let mut out = Vec::new();
    for row in pixels.chunks(width as usize) {
        let mut i = 0;
        while i < row.len() {
            let opaque = row[i] != 0;
            let mut end = i;
            while end < row.len() && (row[end] != 0) == opaque && end - i < MAX_RUN {
                end += 1;
            }
            let kind = if opaque { OPAQUE_BIT } else { 0 };
            let tag = (((end - i) as u16) << 1) | kind;
            out.extend_from_slice(&tag.to_le_bytes());
            if opaque {
                out.extend_from_slice(&row[i..end]);
            }
            i = end;
        }
        out.extend_from_slice(&END_OF_ROW.to_le_bytes());
    }
    out
}
