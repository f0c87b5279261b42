//! Genome encoder

use crate::models::{AgeStage, PartTarget, Sex};

use super::record::{
    PigmentChannel, GENE_MARKER, GENOME_END, GENOME_MAGIC, GENOME_VERSION, KIND_CREATURE, SUBTYPE_APPEARANCE,
    SUBTYPE_PIGMENT, SUBTYPE_PIGMENT_BLEED,
};

/// Builds raw genome bytes in the layout [`super::parse_genome`] reads.
///
/// Slot and sheet names longer than 255 bytes are cut to fit their length
/// prefix.
#[derive(Debug, Clone, Default)]
pub struct GenomeWriter {
    claims: Vec<(AgeStage, Sex)>,
    records: Vec<(u8, u8, Vec<u8>)>,
}

impl GenomeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that the genome defines `(age, sex)`.
    pub fn claim(mut self, age: AgeStage, sex: Sex) -> Self {
        self.claims.push((age, sex));
        self
    }

    pub fn appearance(mut self, age: AgeStage, sex: Sex, slot: &str, target: PartTarget) -> Self {
        let mut payload = vec![age.as_u8(), sex.as_u8()];
        push_string(&mut payload, slot);
        push_string(&mut payload, &target.sheet);
        payload.extend_from_slice(&target.frame.to_le_bytes());
        for value in [target.anchor_x, target.anchor_y, target.z] {
            payload.extend_from_slice(&value.to_le_bytes());
        }
        self.records.push((KIND_CREATURE, SUBTYPE_APPEARANCE, payload));
        self
    }

    pub fn pigment(mut self, age: AgeStage, sex: Sex, channel: PigmentChannel, amount: u8) -> Self {
        let payload = vec![age.as_u8(), sex.as_u8(), channel as u8, amount];
        self.records.push((KIND_CREATURE, SUBTYPE_PIGMENT, payload));
        self
    }

    pub fn bleed(mut self, age: AgeStage, sex: Sex, rotation: u8, swap: u8) -> Self {
        let payload = vec![age.as_u8(), sex.as_u8(), rotation, swap];
        self.records.push((KIND_CREATURE, SUBTYPE_PIGMENT_BLEED, payload));
        self
    }

    /// Append a record with an arbitrary kind, subtype and payload.
    pub fn raw_record(mut self, kind: u8, subtype: u8, payload: Vec<u8>) -> Self {
        self.records.push((kind, subtype, payload));
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = GENOME_MAGIC.to_vec();
        out.extend_from_slice(&GENOME_VERSION.to_le_bytes());
        out.push(self.claims.len().min(u8::MAX as usize) as u8);
        for (age, sex) in self.claims.iter().take(u8::MAX as usize) {
            out.push(age.as_u8());
            out.push(sex.as_u8());
        }
        for (kind, subtype, payload) in &self.records {
            out.extend_from_slice(&GENE_MARKER);
            out.push(*kind);
            out.push(*subtype);
            out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            out.extend_from_slice(payload);
        }
        out.extend_from_slice(&GENOME_END);
        out
    }
}

fn push_string(out: &mut Vec<u8>, value: &str) {
    let bytes = &value.as_bytes()[..value.len().min(u8::MAX as usize)];
    out.push(bytes.len() as u8);
    out.extend_from_slice(bytes);
}
