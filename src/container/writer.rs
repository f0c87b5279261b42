//! Container writer

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Write};

use super::reader::{CONTAINER_MAGIC, FLAG_COMPRESSED, NAME_LEN, TAG_LEN};

#[derive(Debug, Clone)]
struct PendingBlock {
    tag: String,
    name: String,
    data: Vec<u8>,
    compress: bool,
}

/// Builds container bytes in the layout [`super::ResourceContainer::open`] reads.
#[derive(Debug, Clone, Default)]
pub struct ContainerWriter {
    blocks: Vec<PendingBlock>,
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block stored as-is.
    pub fn block(mut self, tag: &str, name: &str, data: Vec<u8>) -> Self {
        self.blocks.push(PendingBlock { tag: tag.to_string(), name: name.to_string(), data, compress: false });
        self
    }

    /// Append a block stored as a zlib stream.
    pub fn compressed_block(mut self, tag: &str, name: &str, data: Vec<u8>) -> Self {
        self.blocks.push(PendingBlock { tag: tag.to_string(), name: name.to_string(), data, compress: true });
        self
    }

    /// Serialize all blocks in insertion order.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] when a tag is not four
    /// ASCII characters or a name is empty or longer than 127 bytes.
    pub fn finish(&self) -> io::Result<Vec<u8>> {
        let mut out = CONTAINER_MAGIC.to_vec();
        for block in &self.blocks {
            if block.tag.len() != TAG_LEN || !block.tag.bytes().all(|b| b.is_ascii_graphic()) {
                return Err(invalid(format!("block tag '{}' must be four ASCII characters", block.tag)));
            }
            if block.name.is_empty() || block.name.len() >= NAME_LEN || block.name.contains('\0') {
                return Err(invalid(format!("block name '{}' must be 1..{} bytes", block.name, NAME_LEN - 1)));
            }

            let stored = if block.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&block.data)?;
                encoder.finish()?
            } else {
                block.data.clone()
            };

            out.extend_from_slice(block.tag.as_bytes());
            let mut name = [0u8; NAME_LEN];
            name[..block.name.len()].copy_from_slice(block.name.as_bytes());
            out.extend_from_slice(&name);
            out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
            out.extend_from_slice(&(block.data.len() as u32).to_le_bytes());
            let flags = if block.compress { FLAG_COMPRESSED } else { 0 };
            out.extend_from_slice(&flags.to_le_bytes());
            out.extend_from_slice(&stored);
        }
        Ok(out)
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
