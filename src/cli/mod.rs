//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod inspect;
mod render;
mod sources;

use clap::{Parser, Subcommand};
use rand::Rng;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::models::{AgeStage, Sex, VariantKey};

pub use info::PaletteAction;
pub use render::{PartSource, RenderArgs};
pub use sources::{expand_sources, find_container_files, open_containers, SourceError};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Breed-render - decode creature breed sprites and composite them to PNG
#[derive(Parser)]
#[command(name = "breed-render")]
#[command(about = "Breed-render - composite creature breed sprites from genomes and resource containers to PNG")]
#[command(version)]
pub struct Cli {
    /// Show library logs (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this breedrender.toml instead of searching for one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render breed variants to PNG
    Render(RenderArgs),

    /// Show the header and frame table of a sprite sheet
    InspectSheet {
        /// Sheet file, or a resource container when --block is given
        file: PathBuf,

        /// Read the sheet from this block of a resource container
        #[arg(long)]
        block: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the blocks of a resource container
    InspectContainer {
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the claims and gene records of a genome or egg
    InspectGenome {
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Built-in palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
}

/// Parse `age:sex`, e.g. `adult:f` or `4:male`.
pub(crate) fn parse_variant(s: &str) -> Result<VariantKey, String> {
    let (age, sex) = s.split_once(':').ok_or_else(|| format!("Expected age:sex, found '{}'", s))?;
    Ok((age.parse::<AgeStage>()?, sex.parse::<Sex>()?))
}

/// Spellings that ask for a random color value.
const RANDOM_WORDS: [&str; 4] = ["rand", "random", "?", "*"];

/// A color argument: a fixed value, or one drawn at random per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorValue {
    Fixed(u8),
    Random,
}

impl ColorValue {
    pub(crate) fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        match self {
            ColorValue::Fixed(value) => value,
            ColorValue::Random => rng.gen(),
        }
    }
}

/// Red, green and blue tint values; `None` leaves a channel to the genome.
pub type Tint = [Option<ColorValue>; 3];

/// Parse one color value: `0..=255`, or `rand`, `random`, `?`, `*` or any
/// negative number for a random value.
pub(crate) fn parse_color_value(s: &str) -> Result<ColorValue, String> {
    let value = s.trim().to_lowercase();
    if RANDOM_WORDS.contains(&value.as_str()) {
        return Ok(ColorValue::Random);
    }
    match value.parse::<i32>() {
        Ok(n) if n < 0 => Ok(ColorValue::Random),
        Ok(n) => u8::try_from(n)
            .map(ColorValue::Fixed)
            .map_err(|_| format!("Color values must be integers 0..=255, found '{}'", s)),
        Err(_) => Err(format!("Color values must be integers 0..=255 or rand, found '{}'", s)),
    }
}

/// Parse a tint as `r:g:b`, `#rrggbb` or `#rgb`.
///
/// Components may be left blank or omitted from the end (`200` or `:90:`)
/// to keep the genome's value, and any component may be random. A single
/// random spelling randomizes all three.
pub(crate) fn parse_tint(s: &str) -> Result<Tint, String> {
    if let Some(hex) = s.strip_prefix('#') {
        let digits: Vec<u8> = match hex.len() {
            3 => hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| format!("Invalid hex tint '{}'", s))?,
            6 => (0..3)
                .map(|i| hex.get(i * 2..i * 2 + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| format!("Invalid hex tint '{}'", s))?,
            _ => return Err(format!("Hex tint must be #rgb or #rrggbb, found '{}'", s)),
        };
        return Ok([digits[0], digits[1], digits[2]].map(|d| Some(ColorValue::Fixed(d))));
    }

    if !s.contains(':') && parse_color_value(s) == Ok(ColorValue::Random) {
        return Ok([Some(ColorValue::Random); 3]);
    }

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("Tint takes at most 3 values (r:g:b), found {} in '{}'", parts.len(), s));
    }
    let mut tint: Tint = [None; 3];
    for (slot, part) in tint.iter_mut().zip(&parts) {
        if !part.trim().is_empty() {
            *slot = Some(parse_color_value(part)?);
        }
    }
    Ok(tint)
}

/// Log level from `-v`; RUST_LOG takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Main CLI entry point
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render(args) => render::run_render(&args, cli.config.as_deref()),
        Commands::InspectSheet { file, block, json } => inspect::run_inspect_sheet(&file, block.as_deref(), json),
        Commands::InspectContainer { file, json } => inspect::run_inspect_container(&file, json),
        Commands::InspectGenome { file, json } => inspect::run_inspect_genome(&file, json),
        Commands::Palettes { action } => info::run_palettes(action),
    }
}
