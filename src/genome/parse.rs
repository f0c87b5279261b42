//! Genome and egg parsing

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Cursor, Read};

use crate::container::{ResourceContainer, CONTAINER_MAGIC, TAG_GENOME};
use crate::models::{AgeStage, BreedDescriptor, PartTarget, Sex, VariantKey};

use super::error::GenomeError;
use super::record::{
    GeneRecord, PigmentChannel, GENE_MARKER, GENOME_END, GENOME_MAGIC, GENOME_VERSION, KIND_CREATURE,
    SUBTYPE_APPEARANCE, SUBTYPE_PIGMENT, SUBTYPE_PIGMENT_BLEED,
};

/// Header claims and records of a genome, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenomeListing {
    pub claims: Vec<VariantKey>,
    pub records: Vec<GeneRecord>,
}

/// Raw genome bytes, unwrapping an egg if `bytes` is a resource container.
///
/// An egg's genome is its first block tagged `GENE`.
pub fn genome_payload(bytes: &[u8]) -> Result<Vec<u8>, GenomeError> {
    if !bytes.starts_with(&CONTAINER_MAGIC) {
        return Ok(bytes.to_vec());
    }
    let container = ResourceContainer::open(bytes.to_vec())?;
    let block = container
        .blocks_with_tag(TAG_GENOME)
        .next()
        .ok_or_else(|| GenomeError::Format("egg has no GENE block".to_string()))?;
    log::debug!("Reading genome from egg block '{}'", block.name());
    Ok(block.read()?)
}

/// Decode every record of a genome or egg without building a descriptor.
pub fn read_records(bytes: &[u8]) -> Result<GenomeListing, GenomeError> {
    let payload = genome_payload(bytes)?;
    let mut cursor = Cursor::new(payload.as_slice());

    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|_| GenomeError::Format("input shorter than the genome magic".to_string()))?;
    if magic != GENOME_MAGIC {
        return Err(GenomeError::Format("missing dna3 magic".to_string()));
    }
    let version = cursor.read_u16::<LittleEndian>().map_err(|_| eof("version"))?;
    if version != GENOME_VERSION {
        return Err(GenomeError::Format(format!("unsupported genome version {}", version)));
    }

    let claim_count = cursor.read_u8().map_err(|_| eof("claim count"))?;
    let mut claims = Vec::with_capacity(claim_count as usize);
    for _ in 0..claim_count {
        let age = cursor.read_u8().map_err(|_| eof("claim list"))?;
        let sex = cursor.read_u8().map_err(|_| eof("claim list"))?;
        claims.push(variant(age, sex)?);
    }

    let mut records = Vec::new();
    loop {
        let offset = cursor.position();
        let mut marker = [0u8; 4];
        cursor.read_exact(&mut marker).map_err(|_| GenomeError::Format("missing gend terminator".to_string()))?;
        if marker == GENOME_END {
            break;
        }
        if marker != GENE_MARKER {
            return Err(GenomeError::Format(format!("expected gene marker at offset {}", offset)));
        }

        let kind = cursor.read_u8().map_err(|_| eof("record header"))?;
        let subtype = cursor.read_u8().map_err(|_| eof("record header"))?;
        let length = cursor.read_u16::<LittleEndian>().map_err(|_| eof("record header"))?;
        let start = cursor.position() as usize;
        let end = start + length as usize;
        if end > payload.len() {
            return Err(GenomeError::Format(format!(
                "record at offset {} declares {} payload bytes, {} remain",
                offset,
                length,
                payload.len() - start
            )));
        }
        records.push(decode_record(kind, subtype, &payload[start..end], offset)?);
        cursor.set_position(end as u64);
    }

    Ok(GenomeListing { claims, records })
}

/// Parse a raw genome or egg into a breed descriptor.
///
/// Records apply in file order, so a later record for the same
/// (age, sex, slot), pigment channel or bleed replaces an earlier one.
///
/// # Errors
///
/// - [`GenomeError::Format`] for layout problems, including age or sex values
///   outside their ranges
/// - [`GenomeError::Schema`] when a claimed (age, sex) has no appearance records
/// - [`GenomeError::Container`] when an egg cannot be opened
pub fn parse_genome(bytes: &[u8]) -> Result<BreedDescriptor, GenomeError> {
    let listing = read_records(bytes)?;
    let mut descriptor = BreedDescriptor::new();
    for (age, sex) in &listing.claims {
        descriptor.claim(*age, *sex);
    }

    let mut skipped = 0usize;
    for record in listing.records {
        match record {
            GeneRecord::Appearance { age, sex, slot, target } => descriptor.insert_part(age, sex, slot, target),
            GeneRecord::Pigment { age, sex, channel, amount } => {
                let transform = descriptor.color_transform_mut(age, sex);
                match channel {
                    PigmentChannel::Red => transform.red = amount,
                    PigmentChannel::Green => transform.green = amount,
                    PigmentChannel::Blue => transform.blue = amount,
                }
            }
            GeneRecord::PigmentBleed { age, sex, rotation, swap } => {
                let transform = descriptor.color_transform_mut(age, sex);
                transform.rotation = rotation;
                transform.swap = swap;
            }
            GeneRecord::Unknown { .. } => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("Skipped {} unrecognized gene records", skipped);
    }

    for (age, sex) in listing.claims {
        if descriptor.parts(age, sex).is_none() {
            return Err(GenomeError::Schema(format!(
                "genome claims {} {} but has no appearance records for it",
                age, sex
            )));
        }
    }

    Ok(descriptor)
}

fn eof(what: &str) -> GenomeError {
    GenomeError::Format(format!("unexpected end of genome in {}", what))
}

fn variant(age: u8, sex: u8) -> Result<VariantKey, GenomeError> {
    let age = AgeStage::from_u8(age).ok_or_else(|| GenomeError::Format(format!("age stage {} out of range", age)))?;
    let sex = Sex::from_u8(sex).ok_or_else(|| GenomeError::Format(format!("sex {} out of range", sex)))?;
    Ok((age, sex))
}

fn decode_record(kind: u8, subtype: u8, payload: &[u8], offset: u64) -> Result<GeneRecord, GenomeError> {
    if kind != KIND_CREATURE || !matches!(subtype, SUBTYPE_APPEARANCE | SUBTYPE_PIGMENT | SUBTYPE_PIGMENT_BLEED) {
        return Ok(GeneRecord::Unknown { kind, subtype, length: payload.len() as u16 });
    }

    let malformed = || GenomeError::Format(format!("malformed gene {}/{} at offset {}", kind, subtype, offset));
    let mut cursor = Cursor::new(payload);
    let age = cursor.read_u8().map_err(|_| malformed())?;
    let sex = cursor.read_u8().map_err(|_| malformed())?;
    let (age, sex) = variant(age, sex)?;

    let record = match subtype {
        SUBTYPE_APPEARANCE => {
            let slot = read_string(&mut cursor).ok_or_else(malformed)?;
            let sheet = read_string(&mut cursor).ok_or_else(malformed)?;
            let frame = cursor.read_u16::<LittleEndian>().map_err(|_| malformed())?;
            let anchor_x = cursor.read_i16::<LittleEndian>().map_err(|_| malformed())?;
            let anchor_y = cursor.read_i16::<LittleEndian>().map_err(|_| malformed())?;
            let z = cursor.read_i16::<LittleEndian>().map_err(|_| malformed())?;
            GeneRecord::Appearance { age, sex, slot, target: PartTarget { sheet, frame, anchor_x, anchor_y, z } }
        }
        SUBTYPE_PIGMENT => {
            let channel = cursor.read_u8().map_err(|_| malformed())?;
            let channel = PigmentChannel::from_u8(channel)
                .ok_or_else(|| GenomeError::Format(format!("pigment channel {} out of range", channel)))?;
            let amount = cursor.read_u8().map_err(|_| malformed())?;
            GeneRecord::Pigment { age, sex, channel, amount }
        }
        _ => {
            let rotation = cursor.read_u8().map_err(|_| malformed())?;
            let swap = cursor.read_u8().map_err(|_| malformed())?;
            GeneRecord::PigmentBleed { age, sex, rotation, swap }
        }
    };

    if cursor.position() as usize != payload.len() {
        return Err(malformed());
    }
    Ok(record)
}

/// Length-prefixed, non-empty UTF-8 string.
fn read_string(cursor: &mut Cursor<&[u8]>) -> Option<String> {
    let len = cursor.read_u8().ok()? as usize;
    if len == 0 {
        return None;
    }
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf).ok()?;
    String::from_utf8(buf).ok()
}
