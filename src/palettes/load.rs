//! Loading override palettes from builtins, raw files and containers

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::container::{ContainerError, ResourceContainer, CONTAINER_MAGIC, TAG_PALETTE};
use crate::models::{Palette, PaletteError};

use super::{get_builtin, list_builtins};

/// Error when loading a palette named on the command line or in config.
#[derive(Debug, Error)]
pub enum PaletteLoadError {
    #[error("Unknown builtin palette '@{name}' (available: {available})")]
    UnknownBuiltin { name: String, available: String },
    #[error("Failed to read palette '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Palette '{path}': {source}")]
    Size { path: PathBuf, source: PaletteError },
    #[error("Palette container '{path}': {source}")]
    Container { path: PathBuf, source: ContainerError },
    #[error("Container '{0}' has no PALT block")]
    NoPaletteBlock(PathBuf),
}

/// Load a palette from `@name` (a builtin) or a file path.
///
/// A file is either 768 raw RGB bytes or a resource container whose first
/// `PALT` block holds them.
pub fn load_palette(source: &str) -> Result<Palette, PaletteLoadError> {
    if let Some(name) = source.strip_prefix('@') {
        return get_builtin(name).ok_or_else(|| PaletteLoadError::UnknownBuiltin {
            name: name.to_string(),
            available: list_builtins().join(", "),
        });
    }

    let path = Path::new(source);
    let bytes = fs::read(path).map_err(|source| PaletteLoadError::Io { path: path.to_path_buf(), source })?;
    if bytes.starts_with(&CONTAINER_MAGIC) {
        let container = ResourceContainer::open(bytes)
            .map_err(|source| PaletteLoadError::Container { path: path.to_path_buf(), source })?;
        return palette_from_container(&container)
            .ok_or_else(|| PaletteLoadError::NoPaletteBlock(path.to_path_buf()))?
            .map_err(|source| PaletteLoadError::Container { path: path.to_path_buf(), source });
    }
    Palette::from_rgb_bytes(&bytes).map_err(|source| PaletteLoadError::Size { path: path.to_path_buf(), source })
}

/// The palette stored in a container's first `PALT` block, if it has one.
///
/// A block of the wrong size is reported as a container format error.
pub fn palette_from_container(container: &ResourceContainer) -> Option<Result<Palette, ContainerError>> {
    let block = container.blocks_with_tag(TAG_PALETTE).next()?;
    Some(block.read().and_then(|bytes| {
        Palette::from_rgb_bytes(&bytes)
            .map_err(|e| ContainerError::Format(format!("palette block '{}': {}", block.name(), e)))
    }))
}
