//! Genome reader
//!
//! A genome is a little-endian record stream: the `dna3` magic, a version,
//! a list of claimed (age, sex) variants, `gene` records and the `gend`
//! terminator. Eggs wrap a genome in a resource container block tagged
//! `GENE`. Parsing yields a [`BreedDescriptor`](crate::models::BreedDescriptor)
//! mapping each variant's body-part slots to sheet frames.

mod error;
mod parse;
mod record;
mod writer;

pub use error::GenomeError;
pub use parse::{genome_payload, parse_genome, read_records, GenomeListing};
pub use record::{GeneRecord, PigmentChannel, GENE_MARKER, GENOME_END, GENOME_MAGIC, GENOME_VERSION};
pub use writer::GenomeWriter;

/// Result type alias for genome operations.
pub type Result<T> = std::result::Result<T, GenomeError>;
