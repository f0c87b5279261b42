//! Shared fixtures: a small two-variant breed and the containers it draws from.
//!
//! Adult male: `HEAD` from sheet `a04a` (2x2, diagonal) at (0, 0) over
//! `BODY` from `b04a` (2x2, solid) at (0, 2). Child female: `HEAD` from
//! `c04a` (1x1). Every sheet embeds [`warm_palette`].

#![allow(dead_code)]

use breedrender::container::{ContainerWriter, ResourceContainer};
use breedrender::genome::GenomeWriter;
use breedrender::models::{AgeStage, Frame, Palette, PartTarget, Sex};
use breedrender::sheet::{FrameEncoding, SheetEncoder};

pub const HEAD_INDEX: u8 = 10;
pub const BODY_INDEX: u8 = 20;
pub const CHILD_INDEX: u8 = 30;

/// The palette embedded in every fixture sheet.
pub fn warm_palette() -> Palette {
    Palette::from_fn(|i| [i, i / 2, 255 - i])
}

pub fn warm(index: u8) -> [u8; 3] {
    warm_palette().color(index)
}

pub fn target(sheet: &str, anchor_x: i16, anchor_y: i16, z: i16) -> PartTarget {
    PartTarget { sheet: sheet.to_string(), frame: 0, anchor_x, anchor_y, z }
}

pub fn sheet(width: u32, height: u32, pixels: Vec<u8>) -> Vec<u8> {
    let frame = Frame::new(width, height, pixels).expect("pixel count matches");
    SheetEncoder::new().palette(warm_palette()).frame(frame, FrameEncoding::RunLength).encode()
}

/// Genome writer preloaded with both variants.
pub fn norn_genome_writer() -> GenomeWriter {
    GenomeWriter::new()
        .claim(AgeStage::Adult, Sex::Male)
        .claim(AgeStage::Child, Sex::Female)
        .appearance(AgeStage::Adult, Sex::Male, "HEAD", target("a04a", 0, 0, 1))
        .appearance(AgeStage::Adult, Sex::Male, "BODY", target("b04a", 0, 2, 0))
        .appearance(AgeStage::Child, Sex::Female, "HEAD", target("c04a", 0, 0, 0))
}

pub fn norn_genome() -> Vec<u8> {
    norn_genome_writer().encode()
}

/// Container writer holding all three sheets, `b04a` compressed.
pub fn norn_sprites_writer() -> ContainerWriter {
    ContainerWriter::new()
        .block("SPRT", "a04a", sheet(2, 2, vec![0, HEAD_INDEX, HEAD_INDEX, 0]))
        .compressed_block("SPRT", "b04a", sheet(2, 2, vec![BODY_INDEX; 4]))
        .block("SPRT", "c04a", sheet(1, 1, vec![CHILD_INDEX]))
}

pub fn norn_sprites() -> Vec<u8> {
    norn_sprites_writer().finish().expect("valid container")
}

pub fn norn_sources() -> Vec<ResourceContainer> {
    vec![ResourceContainer::open(norn_sprites()).expect("valid container")]
}

/// An egg: the genome and the sprites in one container.
pub fn norn_egg() -> Vec<u8> {
    norn_sprites_writer().compressed_block("GENE", "norn.gen", norn_genome()).finish().expect("valid container")
}
