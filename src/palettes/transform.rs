//! Tint, swap and rotation of palette entries

use crate::models::{ColorTransform, Palette, TRANSPARENT_INDEX};

impl ColorTransform {
    /// Apply the transform to every entry except the transparent index.
    ///
    /// Steps run in order: per-channel tint, red/blue swap, then hue rotation.
    /// A neutral transform returns an identical palette.
    pub fn apply(&self, palette: &Palette) -> Palette {
        if self.is_neutral() {
            return palette.clone();
        }
        Palette::from_fn(|index| {
            let rgb = palette.color(index);
            if index == TRANSPARENT_INDEX {
                return rgb;
            }
            self.apply_color(rgb)
        })
    }

    /// Transform a single RGB value.
    pub fn apply_color(&self, rgb: [u8; 3]) -> [u8; 3] {
        let tinted = [tint(rgb[0], self.red), tint(rgb[1], self.green), tint(rgb[2], self.blue)];
        let [r, g, b] = tinted.map(f32::from);

        let t = centred(self.swap);
        let (r, b) = if t > 0.0 { (r + (b - r) * t, b + (r - b) * t) } else { (r, b) };

        let t = centred(self.rotation);
        let (r, g, b) = if t > 0.0 {
            (r * (1.0 - t) + b * t, g * (1.0 - t) + r * t, b * (1.0 - t) + g * t)
        } else if t < 0.0 {
            let t = -t;
            (r * (1.0 - t) + g * t, g * (1.0 - t) + b * t, b * (1.0 - t) + r * t)
        } else {
            (r, g, b)
        };

        [channel(r), channel(g), channel(b)]
    }
}

fn tint(value: u8, amount: u8) -> u8 {
    (u32::from(value) * u32::from(amount) / u32::from(ColorTransform::NEUTRAL)).min(255) as u8
}

/// Map a 0..=255 gene value onto [-1, 1] around the neutral 128.
fn centred(value: u8) -> f32 {
    (f32::from(value) - f32::from(ColorTransform::NEUTRAL)) / f32::from(ColorTransform::NEUTRAL)
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
