//! Sprite-sheet writer

use crate::models::{Frame, Palette};

use super::decode::{
    FrameEncoding, FLAG_EMBEDDED_PALETTE, FRAME_ENTRY_LEN, HEADER_LEN, PALETTE_BYTES, SHEET_MAGIC, SHEET_VERSION,
};
use super::rle::encode_rle;

/// Builds sprite-sheet bytes in the layout [`super::decode_sheet`] reads.
///
/// Frame data is laid out after the frame table, in frame order.
#[derive(Debug, Clone, Default)]
pub struct SheetEncoder {
    palette: Option<Palette>,
    frames: Vec<(Frame, FrameEncoding)>,
}

impl SheetEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed a palette in the sheet.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Append a frame stored with `encoding`.
    pub fn frame(mut self, frame: Frame, encoding: FrameEncoding) -> Self {
        self.frames.push((frame, encoding));
        self
    }

    /// Serialize the sheet.
    pub fn encode(&self) -> Vec<u8> {
        let flags = if self.palette.is_some() { FLAG_EMBEDDED_PALETTE } else { 0 };
        let table_start = HEADER_LEN + if self.palette.is_some() { PALETTE_BYTES } else { 0 };
        let data_start = table_start + self.frames.len() * FRAME_ENTRY_LEN;

        let payloads: Vec<Vec<u8>> = self
            .frames
            .iter()
            .map(|(frame, encoding)| match encoding {
                FrameEncoding::Raw => frame.pixels().to_vec(),
                FrameEncoding::RunLength => encode_rle(frame.pixels(), frame.width()),
            })
            .collect();

        let mut out = Vec::with_capacity(data_start + payloads.iter().map(Vec::len).sum::<usize>());
        out.extend_from_slice(&SHEET_MAGIC);
        out.extend_from_slice(&SHEET_VERSION.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&(self.frames.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        if let Some(ref palette) = self.palette {
            out.extend_from_slice(&palette.to_rgb_bytes());
        }

        let mut offset = data_start;
        for ((frame, encoding), payload) in self.frames.iter().zip(&payloads) {
            out.extend_from_slice(&(frame.width() as u16).to_le_bytes());
            out.extend_from_slice(&(frame.height() as u16).to_le_bytes());
            out.extend_from_slice(&(offset as u32).to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&[*encoding as u8, 0, 0, 0]);
            offset += payload.len();
        }

        for payload in payloads {
            out.extend_from_slice(&payload);
        }
        out
    }
}
