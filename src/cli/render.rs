//! Render command implementation

use clap::Args;
use rand::Rng;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::config::{load_config, merge_cli_overrides, BreedRenderConfig, CliOverrides, MAX_SCALE};
use crate::genome::parse_genome;
use crate::models::{AgeStage, ColorOverrides, RenderOutcome, Sex, VariantKey};
use crate::output::{finish_raster, numbered_output_paths, save_png, single_output_path, PngOptions};
use crate::palettes::load_palette;
use crate::pipeline::{render_variants, RenderRequest};

use super::sources::{expand_sources, is_container, open_containers};
use super::{
    parse_color_value, parse_tint, parse_variant, ColorValue, Tint, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS,
};

/// A `--part SLOT=GENOME` argument: draw `slot` as another breed does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSource {
    pub slot: String,
    pub genome: PathBuf,
}

fn parse_part(s: &str) -> Result<PartSource, String> {
    let (slot, genome) = s.split_once('=').ok_or_else(|| format!("Expected SLOT=GENOME, found '{}'", s))?;
    let slot = slot.trim();
    if slot.is_empty() || genome.trim().is_empty() {
        return Err(format!("Expected SLOT=GENOME, found '{}'", s));
    }
    Ok(PartSource { slot: slot.to_string(), genome: PathBuf::from(genome.trim()) })
}

/// Arguments of `breed-render render`
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output file or directory.
    /// One variant: OUTPUT (with .png added), or OUTPUT/render.png for a directory.
    /// Several variants or --increment: {stem}.{i}.png
    pub output: PathBuf,

    /// Genome or egg describing the breed
    #[arg(long)]
    pub genome: PathBuf,

    /// Resource containers or directories holding them, searched in order
    pub sources: Vec<PathBuf>,

    /// Age stage: 0..6 or baby, child, adolescent, youth, adult, old, senile
    #[arg(short, long, requires = "sex")]
    pub age: Option<AgeStage>,

    /// Sex: [m]ale or [f]emale
    #[arg(short = 'g', long, requires = "age")]
    pub sex: Option<Sex>,

    /// Additional variant to render, as age:sex (repeatable)
    #[arg(long = "variant", value_parser = parse_variant)]
    pub variants: Vec<VariantKey>,

    /// Override palette: a 768-byte file, a container with a PALT block, or @builtin
    #[arg(long)]
    pub palette: Option<String>,

    /// Tint as r:g:b, #rrggbb or #rgb (128 leaves a channel unchanged).
    /// Blank values keep the genome's; rand, ?, * or -1 pick one at random
    #[arg(long, value_parser = parse_tint, allow_negative_numbers = true)]
    pub tint: Option<Tint>,

    /// Red/blue swap amount (128 is none, rand for random)
    #[arg(long, value_parser = parse_color_value, allow_negative_numbers = true)]
    pub swap: Option<ColorValue>,

    /// Hue rotation amount (128 is none, rand for random)
    #[arg(long, value_parser = parse_color_value, allow_negative_numbers = true)]
    pub rotation: Option<ColorValue>,

    /// Draw SLOT as the breed in GENOME does, e.g. HEAD=grendel.gen (repeatable)
    #[arg(long = "part", value_name = "SLOT=GENOME", value_parser = parse_part)]
    pub parts: Vec<PartSource>,

    /// Slots to leave out, comma separated
    #[arg(long, value_delimiter = ',')]
    pub hidden: Vec<String>,

    /// Fail instead of falling back to the nearest age stage
    #[arg(short = 'x', long)]
    pub exact_match: bool,

    /// Scale output by integer factor
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
    pub scale: Option<u32>,

    /// Crop transparent edges
    #[arg(long)]
    pub trim: bool,

    /// Transparent border in output pixels
    #[arg(short = 'd', long)]
    pub padding: Option<u32>,

    /// Number outputs after the last existing {stem}.{i}.png
    #[arg(short, long)]
    pub increment: bool,

    /// Fetch sheets on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Abandon rendering after this many milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Treat skipped slots as errors
    #[arg(long)]
    pub strict: bool,
}

impl RenderArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            scale: self.scale,
            padding: self.padding,
            trim: self.trim.then_some(true),
            exact_match: self.exact_match.then_some(true),
            parallel: self.sequential.then_some(false),
            palette: self.palette.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    /// Random values are drawn here, once per invocation.
    fn color_overrides<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorOverrides {
        let mut resolve = |value: Option<ColorValue>| value.map(|v| v.resolve(rng));
        let [red, green, blue] = self.tint.unwrap_or([None; 3]);
        ColorOverrides {
            red: resolve(red),
            green: resolve(green),
            blue: resolve(blue),
            swap: resolve(self.swap),
            rotation: resolve(self.rotation),
        }
    }

    /// `--age/--sex` first, then every `--variant`, without repeats.
    fn requested_variants(&self) -> Vec<VariantKey> {
        let mut variants = Vec::new();
        if let (Some(age), Some(sex)) = (self.age, self.sex) {
            variants.push((age, sex));
        }
        for variant in &self.variants {
            if !variants.contains(variant) {
                variants.push(*variant);
            }
        }
        variants
    }
}

/// Execute the render command
pub fn run_render(args: &RenderArgs, config_path: Option<&Path>) -> ExitCode {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut config, &args.overrides());

    let variants = args.requested_variants();
    if variants.is_empty() {
        eprintln!("Error: Nothing to render; give --age and --sex or at least one --variant");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let genome_bytes = match fs::read(&args.genome) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot open genome '{}': {}", args.genome.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let mut descriptor = match parse_genome(&genome_bytes) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!("Error: Genome '{}': {}", args.genome.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut eggs = Vec::new();
    if is_container(&genome_bytes) {
        eggs.push(args.genome.clone());
    }
    for part in &args.parts {
        let bytes = match fs::read(&part.genome) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error: Cannot open genome '{}': {}", part.genome.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        let donor = match parse_genome(&bytes) {
            Ok(donor) => donor,
            Err(e) => {
                eprintln!("Error: Genome '{}': {}", part.genome.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        if descriptor.graft_slot(&part.slot, &donor) == 0 {
            eprintln!("Warning: '{}' has no '{}' part; keeping the breed's own", part.genome.display(), part.slot);
        }
        if is_container(&bytes) && !eggs.contains(&part.genome) {
            eggs.push(part.genome.clone());
        }
    }

    let source_paths = match collect_source_paths(args, &config, &eggs) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let sources = match open_containers(&source_paths) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if sources.is_empty() {
        eprintln!("Warning: No resource containers given; every slot will be skipped");
    }

    let mut request = RenderRequest::new(variants[0].0, variants[0].1);
    if let Some(ref source) = config.render.palette {
        match load_palette(source) {
            Ok(palette) => request.palette = Some(palette),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }
    request.colors = args.color_overrides(&mut rand::thread_rng());
    if !request.colors.is_empty() {
        log::info!("Color overrides: {:?}", request.colors);
    }
    request.hidden = args
        .hidden
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>();
    request.exact_match = config.render.exact_match;
    request.parallel = config.render.parallel;
    request.deadline = config.render.timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms));

    let png = PngOptions { scale: config.render.scale, trim: config.render.trim, padding: config.render.padding };
    let outputs = if variants.len() == 1 && !args.increment {
        vec![single_output_path(&args.output)]
    } else {
        numbered_output_paths(&args.output, variants.len(), args.increment)
    };

    let mut failed = false;
    let results = render_variants(&descriptor, &sources, &variants, &request);
    for ((requested, result), path) in results.into_iter().zip(outputs) {
        let label = format!("{} {}", requested.0, requested.1);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Error: {}: {}", label, e);
                failed = true;
                continue;
            }
        };
        if !report_outcome(&label, requested, &outcome, args.strict) {
            failed = true;
            continue;
        }

        let image = finish_raster(&outcome.raster, &png);
        if let Err(e) = save_png(&image, &path) {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            failed = true;
            continue;
        }
        println!("Saved: {}", path.display());
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// CLI sources first, then configured ones, then eggs given as genomes so
/// their own sprite blocks are found.
fn collect_source_paths(
    args: &RenderArgs,
    config: &BreedRenderConfig,
    eggs: &[PathBuf],
) -> Result<Vec<PathBuf>, super::SourceError> {
    let mut paths = args.sources.clone();
    paths.extend(config.sources.paths.iter().cloned());
    let mut expanded = expand_sources(&paths, &config.sources.extensions)?;
    for egg in eggs {
        if !expanded.contains(egg) {
            expanded.push(egg.clone());
        }
    }
    Ok(expanded)
}

/// Print warnings for an outcome. Returns false when `strict` turns the
/// skips into a failure.
fn report_outcome(label: &str, requested: VariantKey, outcome: &RenderOutcome, strict: bool) -> bool {
    if outcome.variant != requested {
        eprintln!("Warning: {}: no parts defined, drew {} {} instead", label, outcome.variant.0, outcome.variant.1);
    }
    let prefix = if strict { "Error" } else { "Warning" };
    for skip in &outcome.skipped {
        eprintln!("{}: {}: skipped slot '{}': {}", prefix, label, skip.slot, skip.reason);
    }
    !(strict && !outcome.is_complete())
}
