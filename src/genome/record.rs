//! Gene records

use serde::Serialize;

use crate::models::{AgeStage, PartTarget, Sex};

/// Leading bytes of a raw genome.
pub const GENOME_MAGIC: [u8; 4] = *b"dna3";
/// Marker in front of every record.
pub const GENE_MARKER: [u8; 4] = *b"gene";
/// Trailing bytes of a raw genome.
pub const GENOME_END: [u8; 4] = *b"gend";
/// The only genome version this reader understands.
pub const GENOME_VERSION: u16 = 1;

pub(crate) const KIND_CREATURE: u8 = 2;
pub(crate) const SUBTYPE_APPEARANCE: u8 = 3;
pub(crate) const SUBTYPE_PIGMENT: u8 = 5;
pub(crate) const SUBTYPE_PIGMENT_BLEED: u8 = 6;

/// Which palette channel a pigment gene scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PigmentChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl PigmentChannel {
    pub fn from_u8(value: u8) -> Option<PigmentChannel> {
        match value {
            0 => Some(PigmentChannel::Red),
            1 => Some(PigmentChannel::Green),
            2 => Some(PigmentChannel::Blue),
            _ => None,
        }
    }
}

/// One decoded gene.
///
/// Records with a kind/subtype this reader does not know are kept as
/// [`GeneRecord::Unknown`] so listings can show them; they never affect the
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GeneRecord {
    Appearance { age: AgeStage, sex: Sex, slot: String, target: PartTarget },
    Pigment { age: AgeStage, sex: Sex, channel: PigmentChannel, amount: u8 },
    PigmentBleed { age: AgeStage, sex: Sex, rotation: u8, swap: u8 },
    Unknown { kind: u8, subtype: u8, length: u16 },
}

impl GeneRecord {
    /// Kind and subtype bytes as stored.
    pub fn kind(&self) -> (u8, u8) {
        match self {
            GeneRecord::Appearance { .. } => (KIND_CREATURE, SUBTYPE_APPEARANCE),
            GeneRecord::Pigment { .. } => (KIND_CREATURE, SUBTYPE_PIGMENT),
            GeneRecord::PigmentBleed { .. } => (KIND_CREATURE, SUBTYPE_PIGMENT_BLEED),
            GeneRecord::Unknown { kind, subtype, .. } => (*kind, *subtype),
        }
    }
}
