//! Container parsing

use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use super::block::{BlockInfo, ResourceBlock};
use super::error::ContainerError;

/// Leading bytes of every resource container.
pub const CONTAINER_MAGIC: [u8; 4] = *b"PRAY";
/// Chunk flag: the stored bytes are a zlib stream.
pub const FLAG_COMPRESSED: u32 = 0x0001;

pub(crate) const TAG_LEN: usize = 4;
pub(crate) const NAME_LEN: usize = 128;
pub(crate) const CHUNK_HEADER_LEN: usize = TAG_LEN + NAME_LEN + 12;

/// An opened resource container.
///
/// Opening validates every chunk header and indexes blocks by name. Block
/// contents stay in the shared buffer until read, so a container is cheap to
/// clone and safe to read from several threads.
#[derive(Debug, Clone)]
pub struct ResourceContainer {
    blocks: Vec<ResourceBlock>,
    by_name: HashMap<String, usize>,
}

impl ResourceContainer {
    /// Parse a container from its bytes.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::Format`] for a missing magic, a non-ASCII tag or
    ///   a name that is not NUL-padded UTF-8
    /// - [`ContainerError::Truncated`] when a header or stored span runs past
    ///   the end of the buffer
    /// - [`ContainerError::DuplicateBlock`] when two blocks share a name
    pub fn open(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ContainerError> {
        let buffer: Arc<[u8]> = bytes.into();
        if buffer.len() < CONTAINER_MAGIC.len() || buffer[..4] != CONTAINER_MAGIC {
            return Err(ContainerError::Format("missing PRAY magic".to_string()));
        }

        let mut blocks = Vec::new();
        let mut by_name = HashMap::new();
        let mut pos = CONTAINER_MAGIC.len();

        while pos < buffer.len() {
            let index = blocks.len();
            let header_end = pos + CHUNK_HEADER_LEN;
            if header_end > buffer.len() {
                return Err(ContainerError::Truncated {
                    context: format!("chunk header {}", index),
                    needed: header_end,
                    available: buffer.len(),
                });
            }

            let tag_bytes = &buffer[pos..pos + TAG_LEN];
            if !tag_bytes.iter().all(|b| b.is_ascii_graphic()) {
                return Err(ContainerError::Format(format!("chunk {} has a non-ASCII tag", index)));
            }
            let tag = String::from_utf8_lossy(tag_bytes).into_owned();
            let name = parse_name(&buffer[pos + TAG_LEN..pos + TAG_LEN + NAME_LEN], index)?;

            let mut cursor = Cursor::new(&buffer[pos + TAG_LEN + NAME_LEN..header_end]);
            let fields = (
                cursor.read_u32::<LittleEndian>(),
                cursor.read_u32::<LittleEndian>(),
                cursor.read_u32::<LittleEndian>(),
            );
            let (stored_len, uncompressed_len, flags) = match fields {
                (Ok(s), Ok(u), Ok(f)) => (s as usize, u as usize, f),
                _ => {
                    return Err(ContainerError::Truncated {
                        context: format!("chunk header {}", index),
                        needed: header_end,
                        available: buffer.len(),
                    })
                }
            };

            let compressed = flags & FLAG_COMPRESSED != 0;
            if !compressed && stored_len != uncompressed_len {
                return Err(ContainerError::Format(format!(
                    "block '{}' is uncompressed but declares {} stored and {} uncompressed bytes",
                    name, stored_len, uncompressed_len
                )));
            }

            let data_end = header_end + stored_len;
            if data_end > buffer.len() {
                return Err(ContainerError::Truncated {
                    context: format!("block '{}'", name),
                    needed: data_end,
                    available: buffer.len(),
                });
            }

            if by_name.insert(name.clone(), index).is_some() {
                return Err(ContainerError::DuplicateBlock(name));
            }
            blocks.push(ResourceBlock::new(
                tag,
                name,
                Arc::clone(&buffer),
                header_end..data_end,
                uncompressed_len,
                compressed,
            ));
            pos = data_end;
        }

        log::debug!("Opened resource container with {} blocks", blocks.len());
        Ok(Self { blocks, by_name })
    }

    /// Content of the named block, inflated if needed.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, ContainerError> {
        self.block(name).ok_or_else(|| ContainerError::NotFound(name.to_string()))?.read()
    }

    pub fn block(&self, name: &str) -> Option<&ResourceBlock> {
        self.by_name.get(name).map(|&i| &self.blocks[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All blocks in file order.
    pub fn blocks(&self) -> &[ResourceBlock] {
        &self.blocks
    }

    /// Blocks of one type, in file order.
    pub fn blocks_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ResourceBlock> + 'a {
        self.blocks.iter().filter(move |b| b.tag() == tag)
    }

    pub fn list(&self) -> Vec<BlockInfo> {
        self.blocks.iter().map(ResourceBlock::info).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn parse_name(raw: &[u8], index: usize) -> Result<String, ContainerError> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    if raw[end..].iter().any(|&b| b != 0) {
        return Err(ContainerError::Format(format!("chunk {} name is not NUL-padded", index)));
    }
    if end == 0 {
        return Err(ContainerError::Format(format!("chunk {} has an empty name", index)));
    }
    std::str::from_utf8(&raw[..end])
        .map(str::to_string)
        .map_err(|_| ContainerError::Format(format!("chunk {} name is not valid UTF-8", index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerWriter;

    fn sample() -> Vec<u8> {
        ContainerWriter::new()
            .block("SPRT", "head.spr", b"head-bytes".to_vec())
            .compressed_block("SPRT", "body.spr", vec![7u8; 300])
            .block("GENE", "norn.gen", b"genome".to_vec())
            .finish()
            .unwrap()
    }

    #[test]
    fn test_open_lists_blocks_in_file_order() {
        let container = ResourceContainer::open(sample()).unwrap();
        let names: Vec<&str> = container.blocks().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["head.spr", "body.spr", "norn.gen"]);
        assert_eq!(container.len(), 3);
        assert!(container.contains("norn.gen"));
    }

    #[test]
    fn test_read_uncompressed_and_compressed() {
        let container = ResourceContainer::open(sample()).unwrap();
        assert_eq!(container.read("head.spr").unwrap(), b"head-bytes");

        let body = container.block("body.spr").unwrap();
        assert!(body.is_compressed());
        assert!(body.stored_len() < 300);
        assert_eq!(body.uncompressed_len(), 300);
        assert_eq!(container.read("body.spr").unwrap(), vec![7u8; 300]);
    }

    #[test]
    fn test_blocks_with_tag() {
        let container = ResourceContainer::open(sample()).unwrap();
        let sprites: Vec<&str> = container.blocks_with_tag("SPRT").map(|b| b.name()).collect();
        assert_eq!(sprites, vec!["head.spr", "body.spr"]);
        assert_eq!(container.blocks_with_tag("PALT").count(), 0);
    }

    #[test]
    fn test_missing_block() {
        let container = ResourceContainer::open(sample()).unwrap();
        assert_eq!(container.read("tail.spr"), Err(ContainerError::NotFound("tail.spr".to_string())));
    }

    #[test]
    fn test_magic_only_is_empty() {
        let container = ResourceContainer::open(CONTAINER_MAGIC.to_vec()).unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        assert!(matches!(ResourceContainer::open(b"PRAX".to_vec()), Err(ContainerError::Format(_))));
        assert!(matches!(ResourceContainer::open(Vec::new()), Err(ContainerError::Format(_))));
    }

    #[test]
    fn test_truncated_header() {
        let mut bytes = sample();
        bytes.truncate(4 + CHUNK_HEADER_LEN - 1);
        assert!(matches!(ResourceContainer::open(bytes), Err(ContainerError::Truncated { .. })));
    }

    #[test]
    fn test_stored_length_past_end() {
        let mut bytes = sample();
        bytes.pop();
        match ResourceContainer::open(bytes) {
            Err(ContainerError::Truncated { context, .. }) => assert_eq!(context, "block 'norn.gen'"),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names() {
        let bytes = ContainerWriter::new()
            .block("SPRT", "a.spr", vec![1])
            .block("GENE", "a.spr", vec![2])
            .finish()
            .unwrap();
        assert_eq!(ResourceContainer::open(bytes).unwrap_err(), ContainerError::DuplicateBlock("a.spr".to_string()));
    }

    #[test]
    fn test_uncompressed_length_mismatch_is_format_error() {
        let mut bytes = ContainerWriter::new().block("SPRT", "a.spr", vec![1, 2, 3]).finish().unwrap();
        // uncompressed length field of the first chunk
        let at = 4 + TAG_LEN + NAME_LEN + 4;
        bytes[at..at + 4].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(ResourceContainer::open(bytes), Err(ContainerError::Format(_))));
    }

    #[test]
    fn test_corrupt_zlib_stream() {
        let mut bytes = ContainerWriter::new().compressed_block("SPRT", "a.spr", vec![5u8; 64]).finish().unwrap();
        let data_start = 4 + CHUNK_HEADER_LEN;
        bytes[data_start] ^= 0xff;
        bytes[data_start + 1] ^= 0xff;

        let container = ResourceContainer::open(bytes).unwrap();
        assert!(matches!(container.read("a.spr"), Err(ContainerError::Decompression { .. })));
    }

    #[test]
    fn test_declared_length_disagrees_with_stream() {
        let mut bytes = ContainerWriter::new().compressed_block("SPRT", "a.spr", vec![5u8; 64]).finish().unwrap();
        let at = 4 + TAG_LEN + NAME_LEN + 4;
        bytes[at..at + 4].copy_from_slice(&10u32.to_le_bytes());

        let container = ResourceContainer::open(bytes).unwrap();
        match container.read("a.spr") {
            Err(ContainerError::Decompression { name, .. }) => assert_eq!(name, "a.spr"),
            other => panic!("expected decompression error, got {:?}", other),
        }
    }

    #[test]
    fn test_name_must_be_nul_padded() {
        let mut bytes = ContainerWriter::new().block("SPRT", "a.spr", vec![1]).finish().unwrap();
        bytes[4 + TAG_LEN + 10] = b'x';
        assert!(matches!(ResourceContainer::open(bytes), Err(ContainerError::Format(_))));
    }

    #[test]
    fn test_blocks_readable_from_threads() {
        let container = ResourceContainer::open(sample()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| container.read("body.spr").unwrap())).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), vec![7u8; 300]);
            }
        });
    }
}
