//! Inspect commands: human-readable or JSON summaries of the binary inputs

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::container::ResourceContainer;
use crate::genome::{read_records, GeneRecord};
use crate::sheet::read_header;

use super::{EXIT_ERROR, EXIT_SUCCESS};

fn read_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", path.display(), e);
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the inspect-sheet command
pub fn run_inspect_sheet(path: &Path, block: Option<&str>, json: bool) -> ExitCode {
    let Some(bytes) = read_file(path) else {
        return ExitCode::from(EXIT_ERROR);
    };

    let bytes = match block {
        None => bytes,
        Some(name) => match ResourceContainer::open(bytes).and_then(|c| c.read(name)) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error: '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let header = match read_header(&bytes) {
        Ok(header) => header,
        Err(e) => {
            eprintln!("Error: '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        return print_json(&header);
    }

    println!("Sheet: {}{}", path.display(), block.map(|b| format!(" [{}]", b)).unwrap_or_default());
    println!("  version: {}", header.version);
    println!("  palette: {}", if header.has_palette { "embedded" } else { "none" });
    println!("  frames:  {}", header.frames.len());
    for (i, frame) in header.frames.iter().enumerate() {
        println!(
            "  {:4}  {}x{}  {:?}  {} bytes at {}",
            i, frame.width, frame.height, frame.encoding, frame.length, frame.offset
        );
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the inspect-container command
pub fn run_inspect_container(path: &Path, json: bool) -> ExitCode {
    let Some(bytes) = read_file(path) else {
        return ExitCode::from(EXIT_ERROR);
    };
    let container = match ResourceContainer::open(bytes) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("Error: '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let blocks = container.list();
    if json {
        return print_json(&blocks);
    }

    println!("Container: {} ({} blocks)", path.display(), blocks.len());
    for info in &blocks {
        let stored = if info.compressed {
            format!("{} bytes, zlib {} bytes", info.uncompressed_len, info.stored_len)
        } else {
            format!("{} bytes", info.uncompressed_len)
        };
        println!("  {}  {}  ({})", info.tag, info.name, stored);
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn describe_record(record: &GeneRecord) -> String {
    match record {
        GeneRecord::Appearance { age, sex, slot, target } => format!(
            "appearance  {} {}  {} <- {}[{}] at ({}, {}) z={}",
            age, sex, slot, target.sheet, target.frame, target.anchor_x, target.anchor_y, target.z
        ),
        GeneRecord::Pigment { age, sex, channel, amount } => {
            format!("pigment     {} {}  {:?} = {}", age, sex, channel, amount)
        }
        GeneRecord::PigmentBleed { age, sex, rotation, swap } => {
            format!("bleed       {} {}  rotation = {}, swap = {}", age, sex, rotation, swap)
        }
        GeneRecord::Unknown { kind, subtype, length } => {
            format!("unknown     kind {} subtype {} ({} bytes)", kind, subtype, length)
        }
    }
}

/// Execute the inspect-genome command
pub fn run_inspect_genome(path: &Path, json: bool) -> ExitCode {
    let Some(bytes) = read_file(path) else {
        return ExitCode::from(EXIT_ERROR);
    };
    let listing = match read_records(&bytes) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("Error: '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        return print_json(&listing);
    }

    println!("Genome: {}", path.display());
    let claims: Vec<String> = listing.claims.iter().map(|(age, sex)| format!("{} {}", age, sex)).collect();
    println!("  claims:  {}", if claims.is_empty() { "none".to_string() } else { claims.join(", ") });
    println!("  records: {}", listing.records.len());
    for record in &listing.records {
        println!("  {}", describe_record(record));
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeStage, PartTarget, Sex};

    #[test]
    fn test_describe_record() {
        let record = GeneRecord::Appearance {
            age: AgeStage::Adult,
            sex: Sex::Female,
            slot: "HEAD".to_string(),
            target: PartTarget { sheet: "a04a".to_string(), frame: 2, anchor_x: -1, anchor_y: 3, z: 5 },
        };
        assert_eq!(describe_record(&record), "appearance  adult female  HEAD <- a04a[2] at (-1, 3) z=5");

        let unknown = GeneRecord::Unknown { kind: 9, subtype: 1, length: 4 };
        assert!(describe_record(&unknown).contains("kind 9 subtype 1"));
    }
}
