//! Sprite-sheet header parsing and frame decoding

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Cursor, Read};

use crate::models::{Frame, Palette, SpriteSheet, PALETTE_SIZE};

use super::error::SheetError;
use super::rle::decode_rle;

/// Leading bytes of every sprite sheet.
pub const SHEET_MAGIC: [u8; 4] = *b"ISPR";
/// The only header version this decoder understands.
pub const SHEET_VERSION: u16 = 1;
/// Header flag: a 768-byte palette follows the fixed header.
pub const FLAG_EMBEDDED_PALETTE: u16 = 0x0001;

pub(crate) const HEADER_LEN: usize = 12;
pub(crate) const FRAME_ENTRY_LEN: usize = 16;
pub(crate) const PALETTE_BYTES: usize = PALETTE_SIZE * 3;

/// How a frame's rows are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameEncoding {
    /// `width * height` bytes, row-major
    Raw = 0,
    /// Run-length rows, see [`super::rle`]
    RunLength = 1,
}

impl FrameEncoding {
    pub fn from_u8(value: u8) -> Option<FrameEncoding> {
        match value {
            0 => Some(FrameEncoding::Raw),
            1 => Some(FrameEncoding::RunLength),
            _ => None,
        }
    }
}

/// One frame-table entry, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameEntry {
    pub width: u16,
    pub height: u16,
    /// Absolute byte offset of the frame data within the sheet
    pub offset: u32,
    /// Stored byte span of the frame data
    pub length: u32,
    pub encoding: FrameEncoding,
}

/// Parsed fixed header and frame table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetHeader {
    pub version: u16,
    pub has_palette: bool,
    pub frames: Vec<FrameEntry>,
}

fn read_u16(cursor: &mut Cursor<&[u8]>, context: &str) -> Result<u16, SheetError> {
    let at = cursor.position() as usize;
    let len = cursor.get_ref().len();
    cursor.read_u16::<LittleEndian>().map_err(|_| SheetError::truncated(context, at + 2, len))
}

fn read_u32(cursor: &mut Cursor<&[u8]>, context: &str) -> Result<u32, SheetError> {
    let at = cursor.position() as usize;
    let len = cursor.get_ref().len();
    cursor.read_u32::<LittleEndian>().map_err(|_| SheetError::truncated(context, at + 4, len))
}

/// Parse the header and frame table without decoding any pixels.
pub fn read_header(bytes: &[u8]) -> Result<SheetHeader, SheetError> {
    if bytes.len() < SHEET_MAGIC.len() || bytes[..4] != SHEET_MAGIC {
        return Err(SheetError::Format("missing ISPR magic".to_string()));
    }
    if bytes.len() < HEADER_LEN {
        return Err(SheetError::truncated("header", HEADER_LEN, bytes.len()));
    }

    let mut cursor = Cursor::new(bytes);
    cursor.set_position(4);
    let version = read_u16(&mut cursor, "header")?;
    if version != SHEET_VERSION {
        return Err(SheetError::Format(format!("unsupported version {}", version)));
    }
    let flags = read_u16(&mut cursor, "header")?;
    if flags & !FLAG_EMBEDDED_PALETTE != 0 {
        return Err(SheetError::Format(format!("unknown header flags {:#06x}", flags)));
    }
    let frame_count = read_u16(&mut cursor, "header")? as usize;
    let _reserved = read_u16(&mut cursor, "header")?;

    let has_palette = flags & FLAG_EMBEDDED_PALETTE != 0;
    let table_start = HEADER_LEN + if has_palette { PALETTE_BYTES } else { 0 };
    let table_end = table_start + frame_count * FRAME_ENTRY_LEN;
    if bytes.len() < table_end {
        let context = if bytes.len() < table_start { "embedded palette" } else { "frame table" };
        return Err(SheetError::truncated(context, table_end, bytes.len()));
    }

    cursor.set_position(table_start as u64);
    let mut frames = Vec::with_capacity(frame_count);
    for i in 0..frame_count {
        let context = format!("frame table entry {}", i);
        let width = read_u16(&mut cursor, &context)?;
        let height = read_u16(&mut cursor, &context)?;
        let offset = read_u32(&mut cursor, &context)?;
        let length = read_u32(&mut cursor, &context)?;
        let mut tail = [0u8; 4];
        cursor
            .read_exact(&mut tail)
            .map_err(|_| SheetError::truncated(context.as_str(), table_end, bytes.len()))?;
        let encoding = FrameEncoding::from_u8(tail[0])
            .ok_or_else(|| SheetError::Format(format!("frame {} has unknown encoding {}", i, tail[0])))?;
        frames.push(FrameEntry { width, height, offset, length, encoding });
    }

    Ok(SheetHeader { version, has_palette, frames })
}

/// Decode a sprite-sheet blob into frames and its embedded palette.
///
/// Every frame comes back as uncompressed row-major palette indices, whatever
/// encoding it was stored with.
///
/// # Errors
///
/// - [`SheetError::Format`] for bad magic, version, flags or encoding, and
///   malformed run-length rows
/// - [`SheetError::Truncated`] when a declared span exceeds the input
/// - [`SheetError::Dimension`] when a frame has zero width or height
///
/// # Examples
///
/// ```
/// use breedrender::models::Frame;
/// use breedrender::sheet::{decode_sheet, FrameEncoding, SheetEncoder};
///
/// let frame = Frame::new(2, 1, vec![0, 3]).unwrap();
/// let bytes = SheetEncoder::new().frame(frame.clone(), FrameEncoding::RunLength).encode();
///
/// let sheet = decode_sheet(&bytes).unwrap();
/// assert_eq!(sheet.frames, vec![frame]);
/// assert!(sheet.palette.is_none());
/// ```
pub fn decode_sheet(bytes: &[u8]) -> Result<SpriteSheet, SheetError> {
    let header = read_header(bytes)?;

    let palette = if header.has_palette {
        let raw = &bytes[HEADER_LEN..HEADER_LEN + PALETTE_BYTES];
        let palette =
            Palette::from_rgb_bytes(raw).map_err(|e| SheetError::Format(format!("embedded palette: {}", e)))?;
        Some(palette)
    } else {
        None
    };

    let mut frames = Vec::with_capacity(header.frames.len());
    for (i, entry) in header.frames.iter().enumerate() {
        frames.push(decode_frame(bytes, i, entry)?);
    }

    Ok(SpriteSheet::new(frames, palette))
}

fn decode_frame(bytes: &[u8], index: usize, entry: &FrameEntry) -> Result<Frame, SheetError> {
    if entry.width == 0 || entry.height == 0 {
        return Err(SheetError::Dimension { frame: index, width: entry.width, height: entry.height });
    }

    let start = entry.offset as usize;
    let end = start + entry.length as usize;
    if end > bytes.len() {
        return Err(SheetError::truncated(format!("frame {} data", index), end, bytes.len()));
    }
    let data = &bytes[start..end];

    let (width, height) = (entry.width as u32, entry.height as u32);
    let pixels = match entry.encoding {
        FrameEncoding::Raw => {
            let needed = width as usize * height as usize;
            if data.len() < needed {
                return Err(SheetError::truncated(format!("frame {} pixels", index), needed, data.len()));
            }
            data[..needed].to_vec()
        }
        FrameEncoding::RunLength => decode_rle(data, width, height, index)?,
    };

    Frame::new(width, height, pixels).ok_or(SheetError::Dimension {
        frame: index,
        width: entry.width,
        height: entry.height,
    })
}
