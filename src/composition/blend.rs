//! Indexed blitting onto the output raster

use crate::models::{Frame, Palette, Raster, TRANSPARENT_INDEX};

/// Blit an indexed frame onto the raster with its top-left at `(x, y)`.
///
/// Index 0 leaves the destination untouched; every other index overwrites
/// it with the palette color. Pixels falling outside the raster are dropped.
pub(crate) fn blit_indexed(raster: &mut Raster, frame: &Frame, palette: &Palette, x: i64, y: i64) {
    let (raster_w, raster_h) = (i64::from(raster.width()), i64::from(raster.height()));
    for fy in 0..frame.height() {
        let dy = y + i64::from(fy);
        if dy < 0 || dy >= raster_h {
            continue;
        }
        for (fx, &index) in frame.row(fy).iter().enumerate() {
            if index == TRANSPARENT_INDEX {
                continue;
            }
            let dx = x + fx as i64;
            if dx < 0 || dx >= raster_w {
                continue;
            }
            raster.paint(dx as u32, dy as u32, palette.color(index));
        }
    }
}
