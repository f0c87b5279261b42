//! The composited output canvas.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use serde::Serialize;

use super::breed::VariantKey;

/// An RGB canvas plus a mask of which pixels were painted.
///
/// Unpainted pixels hold the background color (black) in `image` and become
/// transparent when converted with [`Raster::to_rgba`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbImage,
    painted: Vec<bool>,
    origin: (i32, i32),
}

impl Raster {
    /// Blank canvas whose top-left corner sits at `origin` in anchor space.
    pub fn new(width: u32, height: u32, origin: (i32, i32)) -> Self {
        Self {
            image: RgbImage::new(width, height),
            painted: vec![false; width as usize * height as usize],
            origin,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Anchor-space coordinate of pixel (0, 0).
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Overwrite one pixel. Coordinates are canvas coordinates.
    #[inline]
    pub(crate) fn paint(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.image.put_pixel(x, y, Rgb(rgb));
        let i = self.index(x, y);
        self.painted[i] = true;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.image.width() as usize + x as usize
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Whether any part painted `(x, y)`.
    pub fn is_painted(&self, x: u32, y: u32) -> bool {
        self.painted[self.index(x, y)]
    }

    /// Number of painted pixels.
    pub fn painted_count(&self) -> usize {
        self.painted.iter().filter(|p| **p).count()
    }

    /// The raw RGB buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Convert to RGBA with unpainted pixels fully transparent.
    pub fn to_rgba(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (x, y, px) in self.image.enumerate_pixels() {
            let alpha = if self.is_painted(x, y) { 255 } else { 0 };
            out.put_pixel(x, y, Rgba([px[0], px[1], px[2], alpha]));
        }
        out
    }
}

/// A slot that was left out of a render, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSlot {
    pub slot: String,
    pub reason: String,
}

impl SkippedSlot {
    pub fn new(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { slot: slot.into(), reason: reason.into() }
    }
}

/// A finished render: the raster and every slot that was skipped.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The variant actually drawn, which differs from the requested one
    /// after an age fallback
    pub variant: VariantKey,
    pub raster: Raster,
    pub skipped: Vec<SkippedSlot>,
}

impl RenderOutcome {
    /// True when every slot was drawn.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
