//! Data models shared by the decoders and the compositor

mod breed;
mod palette;
mod raster;
mod sheet;

// Re-export all public types
pub use breed::{AgeStage, BreedDescriptor, ColorOverrides, ColorTransform, PartTarget, Sex, VariantKey};
pub use palette::{Palette, PaletteError, PALETTE_SIZE, TRANSPARENT_INDEX};
pub use raster::{Raster, RenderOutcome, SkippedSlot};
pub use sheet::{Frame, SpriteSheet};
