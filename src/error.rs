//! Crate-level error aggregating every stage's failures

use thiserror::Error;

use crate::composition::ComposeError;
use crate::container::ContainerError;
use crate::genome::GenomeError;
use crate::models::PaletteError;
use crate::sheet::SheetError;

/// Fatal error from a render request.
///
/// Per-slot problems never surface here; they are reported as skips in the
/// [`RenderOutcome`](crate::models::RenderOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Genome(#[from] GenomeError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}
