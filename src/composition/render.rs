//! Breed compositing

use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::models::{
    AgeStage, BreedDescriptor, ColorOverrides, Frame, Palette, PartTarget, Raster, RenderOutcome, Sex, SkippedSlot,
    SpriteSheet,
};
use crate::palettes::resolve_palette;

use super::blend::blit_indexed;
use super::context::{SheetCache, SheetProvider};
use super::error::{ComposeError, FetchError};

/// Largest canvas, in pixels, that [`compose`] will allocate (4096 x 4096).
pub const MAX_CANVAS_PIXELS: u64 = 4096 * 4096;

/// Knobs for one [`compose`] call.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Slots that are neither drawn nor reported as skipped
    pub hidden: BTreeSet<String>,
    /// Replaces every sheet's embedded palette
    pub palette: Option<Palette>,
    /// Layered over the variant's genome color transform
    pub colors: ColorOverrides,
    /// Fetch distinct sheets on the rayon pool
    pub parallel: bool,
    pub cancel: CancelToken,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            hidden: BTreeSet::new(),
            palette: None,
            colors: ColorOverrides::default(),
            parallel: true,
            cancel: CancelToken::new(),
        }
    }
}

struct Placement<'s> {
    sheet: &'s SpriteSheet,
    frame: &'s Frame,
    sheet_id: &'s str,
    x: i64,
    y: i64,
}

/// Composite one (age, sex) variant of a breed.
///
/// Slots are drawn in ascending z, ties broken by slot name. A slot whose
/// sheet cannot be fetched or whose frame is out of range is skipped and
/// recorded in the outcome; the rest of the variant still renders. The
/// canvas is the bounding box of every placed frame, with its top-left at
/// the smallest anchor.
///
/// # Errors
///
/// - [`ComposeError::Schema`] when the variant has no slots
/// - [`ComposeError::NothingRendered`] when no slot could be placed
/// - [`ComposeError::CanvasTooLarge`] when the bounding box exceeds [`MAX_CANVAS_PIXELS`]
/// - [`ComposeError::Cancelled`] when the cancel token fires before the last blit
pub fn compose(
    descriptor: &BreedDescriptor,
    age: AgeStage,
    sex: Sex,
    provider: &dyn SheetProvider,
    options: &ComposeOptions,
) -> Result<RenderOutcome, ComposeError> {
    let cancel = &options.cancel;
    if cancel.is_cancelled() {
        return Err(ComposeError::Cancelled);
    }

    let order = descriptor.draw_order(age, sex);
    if order.is_empty() {
        return Err(ComposeError::Schema(format!("no parts defined for {} {}", age, sex)));
    }
    let visible: Vec<(&str, &PartTarget)> =
        order.into_iter().filter(|(slot, _)| !options.hidden.contains(*slot)).collect();

    // Fetch stage
    let cache = SheetCache::new(provider);
    let sheet_ids: BTreeSet<&str> = visible.iter().map(|(_, t)| t.sheet.as_str()).collect();
    let fetch = |id: &&str| -> Option<(String, Result<Arc<SpriteSheet>, FetchError>)> {
        if cancel.is_cancelled() {
            return None;
        }
        Some((id.to_string(), cache.get(id)))
    };
    let fetched: Vec<_> = if options.parallel {
        sheet_ids.par_iter().filter_map(fetch).collect()
    } else {
        sheet_ids.iter().filter_map(fetch).collect()
    };
    if cancel.is_cancelled() {
        return Err(ComposeError::Cancelled);
    }
    let sheets: HashMap<String, Result<Arc<SpriteSheet>, FetchError>> = fetched.into_iter().collect();
    log::debug!("Fetched {} distinct sheets for {} {}", sheets.len(), age, sex);

    let mut skipped = Vec::new();
    let mut placements = Vec::with_capacity(visible.len());
    for (slot, target) in &visible {
        let sheet = match sheets.get(target.sheet.as_str()) {
            Some(Ok(sheet)) => sheet,
            Some(Err(e)) => {
                log::warn!("Skipping slot '{}': {}", slot, e);
                skipped.push(SkippedSlot::new(*slot, e.to_string()));
                continue;
            }
            None => return Err(ComposeError::Cancelled),
        };
        let Some(frame) = sheet.frame(target.frame as usize) else {
            let e = ComposeError::FrameIndex { sheet: target.sheet.clone(), frame: target.frame, available: sheet.len() };
            log::warn!("Skipping slot '{}': {}", slot, e);
            skipped.push(SkippedSlot::new(*slot, e.to_string()));
            continue;
        };
        placements.push(Placement {
            sheet,
            frame,
            sheet_id: target.sheet.as_str(),
            x: i64::from(target.anchor_x),
            y: i64::from(target.anchor_y),
        });
    }

    if placements.is_empty() {
        return Err(ComposeError::NothingRendered { skipped });
    }

    let min_x = placements.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = placements.iter().map(|p| p.y).min().unwrap_or(0);
    let max_x = placements.iter().map(|p| p.x + i64::from(p.frame.width())).max().unwrap_or(0);
    let max_y = placements.iter().map(|p| p.y + i64::from(p.frame.height())).max().unwrap_or(0);
    let (width, height) = ((max_x - min_x) as u64, (max_y - min_y) as u64);
    if width * height > MAX_CANVAS_PIXELS {
        return Err(ComposeError::CanvasTooLarge { width, height, limit: MAX_CANVAS_PIXELS });
    }
    let mut raster = Raster::new(width as u32, height as u32, (min_x as i32, min_y as i32));

    let transform = options.colors.apply_to(descriptor.color_transform(age, sex));
    let mut palettes: HashMap<&str, Palette> = HashMap::new();
    for placement in &placements {
        if cancel.is_cancelled() {
            return Err(ComposeError::Cancelled);
        }
        let palette = palettes
            .entry(placement.sheet_id)
            .or_insert_with(|| transform.apply(resolve_palette(placement.sheet, options.palette.as_ref())));
        blit_indexed(&mut raster, placement.frame, palette, placement.x - min_x, placement.y - min_y);
    }

    Ok(RenderOutcome { variant: (age, sex), raster, skipped })
}
