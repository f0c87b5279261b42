//! Error types for breed compositing

use thiserror::Error;

use crate::container::ContainerError;
use crate::models::SkippedSlot;
use crate::sheet::SheetError;

/// Why a sheet could not be supplied to the compositor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No resource source holds a block with this name
    #[error("Sheet '{0}' not found in any resource source")]
    NotFound(String),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Error when compositing one breed variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A slot names a frame its sheet does not have
    #[error("Frame {frame} out of range for sheet '{sheet}' ({available} frames)")]
    FrameIndex { sheet: String, frame: u16, available: usize },
    /// The variant cannot be rendered as described
    #[error("Breed schema error: {0}")]
    Schema(String),
    /// The bounding box of the placed frames exceeds [`super::MAX_CANVAS_PIXELS`]
    #[error("Canvas {width}x{height} exceeds the limit of {limit} pixels")]
    CanvasTooLarge { width: u64, height: u64, limit: u64 },
    /// The cancel token was raised or its deadline passed
    #[error("Render cancelled")]
    Cancelled,
    /// Every slot was skipped
    #[error("Nothing rendered: {}", describe_skips(skipped))]
    NothingRendered { skipped: Vec<SkippedSlot> },
}

fn describe_skips(skipped: &[SkippedSlot]) -> String {
    if skipped.is_empty() {
        return "no visible slots".to_string();
    }
    skipped.iter().map(|s| format!("{} ({})", s.slot, s.reason)).collect::<Vec<_>>().join("; ")
}
