//! End-to-end breed rendering
//!
//! Ties the genome reader, resource containers and compositor together:
//! parse the genome, pick the variant, look sheets up across the sources
//! and composite.

mod provider;

pub use provider::ContainerSheetProvider;

use std::collections::BTreeSet;
use std::time::Instant;

use crate::cancel::CancelToken;
use crate::composition::{compose, ComposeError, ComposeOptions};
use crate::container::ResourceContainer;
use crate::error::CoreError;
use crate::genome::parse_genome;
use crate::models::{AgeStage, BreedDescriptor, ColorOverrides, Palette, RenderOutcome, Sex, VariantKey};

/// Everything that shapes one render beyond the genome and sources.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub age: AgeStage,
    pub sex: Sex,
    /// Replaces every sheet's embedded palette
    pub palette: Option<Palette>,
    /// Replace individual fields of the genome color transform
    pub colors: ColorOverrides,
    /// Slots left out of the render
    pub hidden: BTreeSet<String>,
    /// Fail instead of falling back to the nearest age stage
    pub exact_match: bool,
    /// Fetch sheets in parallel
    pub parallel: bool,
    pub cancel: CancelToken,
    pub deadline: Option<Instant>,
}

impl RenderRequest {
    pub fn new(age: AgeStage, sex: Sex) -> Self {
        Self {
            age,
            sex,
            palette: None,
            colors: ColorOverrides::default(),
            hidden: BTreeSet::new(),
            exact_match: false,
            parallel: true,
            cancel: CancelToken::new(),
            deadline: None,
        }
    }

    /// The same request for another variant.
    pub fn for_variant(&self, (age, sex): VariantKey) -> Self {
        Self { age, sex, ..self.clone() }
    }

    fn compose_options(&self) -> ComposeOptions {
        let cancel = match self.deadline {
            Some(deadline) => self.cancel.clone().with_deadline(deadline),
            None => self.cancel.clone(),
        };
        ComposeOptions {
            hidden: self.hidden.clone(),
            palette: self.palette.clone(),
            colors: self.colors,
            parallel: self.parallel,
            cancel,
        }
    }
}

/// Render one variant of the breed described by `genome_bytes`.
///
/// `genome_bytes` may be a raw genome or an egg. Sheets are looked up by
/// block name across `sources` in order.
///
/// # Examples
///
/// ```
/// use breedrender::container::{ContainerWriter, ResourceContainer};
/// use breedrender::genome::GenomeWriter;
/// use breedrender::models::{AgeStage, Frame, PartTarget, Sex};
/// use breedrender::pipeline::render_breed;
/// use breedrender::sheet::{FrameEncoding, SheetEncoder};
///
/// let target = PartTarget { sheet: "S".to_string(), frame: 0, anchor_x: 0, anchor_y: 0, z: 0 };
/// let genome = GenomeWriter::new().appearance(AgeStage::Adult, Sex::Male, "HEAD", target).encode();
///
/// let frame = Frame::new(2, 2, vec![0, 1, 1, 0]).unwrap();
/// let sheet = SheetEncoder::new().frame(frame, FrameEncoding::RunLength).encode();
/// let container = ContainerWriter::new().compressed_block("SPRT", "S", sheet).finish().unwrap();
/// let sources = vec![ResourceContainer::open(container).unwrap()];
///
/// let outcome = render_breed(&genome, &sources, AgeStage::Adult, Sex::Male, None).unwrap();
/// assert_eq!(outcome.raster.width(), 2);
/// assert!(!outcome.raster.is_painted(0, 0));
/// assert!(outcome.raster.is_painted(1, 0));
/// ```
pub fn render_breed(
    genome_bytes: &[u8],
    sources: &[ResourceContainer],
    age: AgeStage,
    sex: Sex,
    palette_override: Option<&Palette>,
) -> Result<RenderOutcome, CoreError> {
    let mut request = RenderRequest::new(age, sex);
    request.palette = palette_override.cloned();
    render_request(genome_bytes, sources, &request)
}

/// Render with every option of a [`RenderRequest`].
pub fn render_request(
    genome_bytes: &[u8],
    sources: &[ResourceContainer],
    request: &RenderRequest,
) -> Result<RenderOutcome, CoreError> {
    let descriptor = parse_genome(genome_bytes)?;
    render_descriptor(&descriptor, sources, request)
}

/// Render an already parsed breed.
pub fn render_descriptor(
    descriptor: &BreedDescriptor,
    sources: &[ResourceContainer],
    request: &RenderRequest,
) -> Result<RenderOutcome, CoreError> {
    let age = select_age(descriptor, request.age, request.sex, request.exact_match)?;
    log::debug!("Rendering {} {} from {} sources", age, request.sex, sources.len());
    let provider = ContainerSheetProvider::new(sources);
    Ok(compose(descriptor, age, request.sex, &provider, &request.compose_options())?)
}

/// Render several variants of one breed.
///
/// Each variant succeeds or fails on its own; results come back in the
/// order of `variants`.
pub fn render_variants(
    descriptor: &BreedDescriptor,
    sources: &[ResourceContainer],
    variants: &[VariantKey],
    base: &RenderRequest,
) -> Vec<(VariantKey, Result<RenderOutcome, CoreError>)> {
    variants
        .iter()
        .map(|&variant| (variant, render_descriptor(descriptor, sources, &base.for_variant(variant))))
        .collect()
}

/// The age stage to draw for `(age, sex)`.
///
/// Without `exact_match` a missing stage falls back to the nearest younger
/// stage with parts, then the nearest older one.
pub fn select_age(
    descriptor: &BreedDescriptor,
    age: AgeStage,
    sex: Sex,
    exact_match: bool,
) -> Result<AgeStage, ComposeError> {
    if descriptor.parts(age, sex).is_some() {
        return Ok(age);
    }
    if exact_match {
        return Err(ComposeError::Schema(format!("no parts defined for {} {}", age, sex)));
    }
    match descriptor.nearest_age(age, sex) {
        Some(found) => {
            log::warn!("No parts for {} {}; using {} instead", age, sex, found);
            Ok(found)
        }
        None => Err(ComposeError::Schema(format!("no parts defined for any {} age stage", sex))),
    }
}
