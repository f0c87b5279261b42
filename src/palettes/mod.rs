//! Built-in palettes and palette resolution.
//!
//! Built-ins can be referenced by name using the `@name` syntax. A sheet
//! is drawn with the caller's override palette when one is given, else its
//! embedded palette, else the `default` built-in.

mod load;
mod transform;

pub use load::{load_palette, palette_from_container, PaletteLoadError};

use crate::models::{Palette, SpriteSheet};
use std::sync::OnceLock;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["default", "grayscale"];

/// Intensity steps of the 6x6x6 color cube.
const CUBE_LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
const CUBE_SIZE: usize = 216;

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<Palette> {
    match name {
        "default" => Some(default_palette().clone()),
        "grayscale" => Some(grayscale()),
        _ => None,
    }
}

/// The fallback palette for sheets without an embedded one.
///
/// Index 0 is black, 1..=215 walk a 6x6x6 color cube (blue fastest) and
/// 216..=255 are a gray ramp from black to white.
pub fn default_palette() -> &'static Palette {
    static DEFAULT: OnceLock<Palette> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        Palette::from_fn(|i| {
            let i = i as usize;
            if i < CUBE_SIZE {
                [CUBE_LEVELS[i / 36], CUBE_LEVELS[(i / 6) % 6], CUBE_LEVELS[i % 6]]
            } else {
                let step = (i - CUBE_SIZE) * 255 / (255 - CUBE_SIZE);
                [step as u8; 3]
            }
        })
    })
}

fn grayscale() -> Palette {
    Palette::from_fn(|i| [i, i, i])
}

/// Pick the palette a sheet is drawn with.
pub fn resolve_palette<'a>(sheet: &'a SpriteSheet, override_palette: Option<&'a Palette>) -> &'a Palette {
    override_palette.or(sheet.palette.as_ref()).unwrap_or_else(|| default_palette())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frame;

    fn sheet_with(palette: Option<Palette>) -> SpriteSheet {
        SpriteSheet::new(vec![Frame::new(1, 1, vec![1]).unwrap()], palette)
    }

    #[test]
    fn test_list_builtins() {
        let builtins = list_builtins();
        assert!(builtins.contains(&"default"));
        assert!(builtins.contains(&"grayscale"));
        assert_eq!(builtins.len(), 2);
    }

    #[test]
    fn test_default_palette_layout() {
        let palette = default_palette();
        assert_eq!(palette.color(0), [0, 0, 0]);
        assert_eq!(palette.color(1), [0, 0, 51]);
        assert_eq!(palette.color(6), [0, 51, 0]);
        assert_eq!(palette.color(36), [51, 0, 0]);
        assert_eq!(palette.color(215), [255, 255, 255]);
        assert_eq!(palette.color(216), [0, 0, 0]);
        assert_eq!(palette.color(255), [255, 255, 255]);
    }

    #[test]
    fn test_get_builtin_grayscale() {
        let palette = get_builtin("grayscale").unwrap();
        assert_eq!(palette.color(0), [0, 0, 0]);
        assert_eq!(palette.color(128), [128, 128, 128]);
    }

    #[test]
    fn test_get_builtin_nonexistent() {
        assert!(get_builtin("nonexistent").is_none());
        assert!(get_builtin("").is_none());
        assert!(get_builtin("Default").is_none()); // case-sensitive
    }

    #[test]
    fn test_resolve_precedence() {
        let embedded = Palette::from_fn(|_| [1, 2, 3]);
        let override_palette = Palette::from_fn(|_| [9, 9, 9]);

        let with_embedded = sheet_with(Some(embedded.clone()));
        let bare = sheet_with(None);

        assert_eq!(resolve_palette(&with_embedded, Some(&override_palette)), &override_palette);
        assert_eq!(resolve_palette(&with_embedded, None), &embedded);
        assert_eq!(resolve_palette(&bare, Some(&override_palette)), &override_palette);
        assert_eq!(resolve_palette(&bare, None), default_palette());
    }
}
