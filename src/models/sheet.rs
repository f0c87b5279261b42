//! Decoded sprite sheets and their frames.

use super::palette::Palette;

/// One decoded bitmap of palette indices.
///
/// `pixels` is row-major, top to bottom, and always `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Create a frame. Returns `None` if either dimension is zero or the pixel
    /// buffer does not match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette index at `(x, y)`.
    #[inline]
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// One row of palette indices.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

/// An ordered set of frames that were decoded together, plus the palette
/// embedded in the sheet, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub frames: Vec<Frame>,
    pub palette: Option<Palette>,
}

impl SpriteSheet {
    pub fn new(frames: Vec<Frame>, palette: Option<Palette>) -> Self {
        Self { frames, palette }
    }

    /// Frame by 0-based index.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
