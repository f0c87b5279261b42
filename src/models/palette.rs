//! Fixed-size indexed color tables.

use thiserror::Error;

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// Palette index that compositing treats as fully transparent.
pub const TRANSPARENT_INDEX: u8 = 0;

/// Error when building a palette from caller-supplied data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Supplied palette did not have exactly 256 entries
    #[error("palette must have exactly 256 entries, found {entries}")]
    Size { entries: usize },
    /// Raw palette bytes were not a whole number of RGB triples
    #[error("palette data length {len} is not a multiple of 3")]
    Ragged { len: usize },
}

/// A 256-entry RGB color table.
///
/// Index 0 is reserved as transparent by convention; the entry still holds
/// a color so that palettes round-trip through files unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [[u8; 3]; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette from exactly 256 RGB entries.
    pub fn from_entries(entries: &[[u8; 3]]) -> Result<Self, PaletteError> {
        if entries.len() != PALETTE_SIZE {
            return Err(PaletteError::Size { entries: entries.len() });
        }
        let mut table = [[0u8; 3]; PALETTE_SIZE];
        table.copy_from_slice(entries);
        Ok(Self { entries: table })
    }

    /// Build a palette from packed `r, g, b` bytes (768 bytes for a full table).
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        if bytes.len() % 3 != 0 {
            return Err(PaletteError::Ragged { len: bytes.len() });
        }
        let entries: Vec<[u8; 3]> = bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::from_entries(&entries)
    }

    /// Build a palette by evaluating `f` for every index.
    pub fn from_fn(mut f: impl FnMut(u8) -> [u8; 3]) -> Self {
        let mut entries = [[0u8; 3]; PALETTE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = f(i as u8);
        }
        Self { entries }
    }

    /// RGB value for a palette index.
    #[inline]
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.entries[index as usize]
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[[u8; 3]; PALETTE_SIZE] {
        &self.entries
    }

    /// Pack the palette back into 768 `r, g, b` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flatten().copied().collect()
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 256 triples drown out everything else in test failures
        f.debug_struct("Palette")
            .field("first", &self.entries[0])
            .field("last", &self.entries[PALETTE_SIZE - 1])
            .finish_non_exhaustive()
    }
}
