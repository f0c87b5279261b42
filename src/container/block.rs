//! Named, typed spans of a container

use flate2::read::ZlibDecoder;
use serde::Serialize;
use std::io::Read;
use std::ops::Range;
use std::sync::Arc;

use super::error::ContainerError;

/// Up-front reservation per stored byte when inflating; the vector grows past
/// this only as the stream actually produces output.
const INFLATE_RESERVE_RATIO: usize = 8;

/// One block of a resource container.
///
/// The block shares the container's buffer; its stored bytes are only
/// inflated when [`ResourceBlock::read`] is called.
#[derive(Debug, Clone)]
pub struct ResourceBlock {
    tag: String,
    name: String,
    buffer: Arc<[u8]>,
    span: Range<usize>,
    uncompressed_len: usize,
    compressed: bool,
}

/// Summary of a block for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
    pub tag: String,
    pub name: String,
    pub stored_len: usize,
    pub uncompressed_len: usize,
    pub compressed: bool,
}

impl ResourceBlock {
    pub(crate) fn new(
        tag: String,
        name: String,
        buffer: Arc<[u8]>,
        span: Range<usize>,
        uncompressed_len: usize,
        compressed: bool,
    ) -> Self {
        Self { tag, name, buffer, span, uncompressed_len, compressed }
    }

    /// Four-character block type, e.g. `SPRT`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn stored_len(&self) -> usize {
        self.span.len()
    }

    pub fn uncompressed_len(&self) -> usize {
        self.uncompressed_len
    }

    /// The bytes as stored in the container.
    pub fn stored_bytes(&self) -> &[u8] {
        &self.buffer[self.span.clone()]
    }

    /// The block's content, inflating it first if it is stored compressed.
    pub fn read(&self) -> Result<Vec<u8>, ContainerError> {
        if !self.compressed {
            return Ok(self.stored_bytes().to_vec());
        }

        log::debug!(
            "Inflating block '{}' ({} -> {} bytes)",
            self.name,
            self.stored_len(),
            self.uncompressed_len
        );

        // Read one byte past the declared length so oversized output is caught
        // without inflating an unbounded stream.
        let limit = self.uncompressed_len as u64 + 1;
        let reserve = self.uncompressed_len.min(self.stored_len().saturating_mul(INFLATE_RESERVE_RATIO));
        let mut out = Vec::with_capacity(reserve);
        ZlibDecoder::new(self.stored_bytes())
            .take(limit)
            .read_to_end(&mut out)
            .map_err(|e| ContainerError::Decompression { name: self.name.clone(), reason: e.to_string() })?;

        if out.len() != self.uncompressed_len {
            return Err(ContainerError::Decompression {
                name: self.name.clone(),
                reason: format!(
                    "inflated to {}{} bytes, header declares {}",
                    if out.len() as u64 == limit { "more than " } else { "" },
                    out.len().min(self.uncompressed_len),
                    self.uncompressed_len
                ),
            });
        }
        Ok(out)
    }

    pub fn info(&self) -> BlockInfo {
        BlockInfo {
            tag: self.tag.clone(),
            name: self.name.clone(),
            stored_len: self.stored_len(),
            uncompressed_len: self.uncompressed_len,
            compressed: self.compressed,
        }
    }
}
