//! Sheets looked up across resource containers

use crate::composition::{FetchError, SheetProvider};
use crate::container::ResourceContainer;
use crate::models::SpriteSheet;
use crate::sheet::decode_sheet;

/// Finds sheets by block name in an ordered list of containers.
///
/// The first container holding a block with the requested name wins, so
/// earlier sources shadow later ones.
#[derive(Debug, Clone, Copy)]
pub struct ContainerSheetProvider<'a> {
    sources: &'a [ResourceContainer],
}

impl<'a> ContainerSheetProvider<'a> {
    pub fn new(sources: &'a [ResourceContainer]) -> Self {
        Self { sources }
    }
}

impl SheetProvider for ContainerSheetProvider<'_> {
    fn fetch(&self, sheet_id: &str) -> Result<SpriteSheet, FetchError> {
        let block = self
            .sources
            .iter()
            .find_map(|container| container.block(sheet_id))
            .ok_or_else(|| FetchError::NotFound(sheet_id.to_string()))?;
        let bytes = block.read()?;
        Ok(decode_sheet(&bytes)?)
    }
}
