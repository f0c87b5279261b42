//! PNG output, post-processing and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::Raster;

/// File stem used when the output target is a directory.
pub const DEFAULT_FILE_STEM: &str = "render";

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// How a raster becomes the written image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    pub scale: u32,
    pub trim: bool,
    /// Transparent border in output pixels
    pub padding: u32,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self { scale: 1, trim: false, padding: 0 }
    }
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Convert a raster to RGBA and apply trim, scale and padding in that order.
pub fn finish_raster(raster: &Raster, options: &PngOptions) -> RgbaImage {
    let mut image = raster.to_rgba();
    if options.trim {
        image = trim_image(&image);
    }
    image = scale_image(image, options.scale);
    pad_image(&image, options.padding)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Factors of 0 and 1 return the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Crop fully transparent rows and columns from the edges.
///
/// An image with no opaque pixel is returned unchanged.
pub fn trim_image(image: &RgbaImage) -> RgbaImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    match bounds {
        Some((x0, y0, x1, y1)) => image::imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image(),
        None => image.clone(),
    }
}

/// Surround the image with a transparent border.
pub fn pad_image(image: &RgbaImage, padding: u32) -> RgbaImage {
    if padding == 0 {
        return image.clone();
    }
    let mut out = RgbaImage::new(image.width() + padding * 2, image.height() + padding * 2);
    image::imageops::replace(&mut out, image, i64::from(padding), i64::from(padding));
    out
}

fn has_png_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Output path for a single render.
///
/// | Target | Output |
/// |--------|--------|
/// | `norn.png` | `norn.png` |
/// | existing directory `out/` | `out/render.png` |
/// | `norn` | `norn.png` |
pub fn single_output_path(target: &Path) -> PathBuf {
    if has_png_extension(target) {
        target.to_path_buf()
    } else if target.is_dir() {
        target.join(format!("{}.png", DEFAULT_FILE_STEM))
    } else {
        let mut name = target.as_os_str().to_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Prefix that numbered outputs are built from: the target without its
/// `.png` extension, or `render` inside a directory target.
pub fn output_prefix(target: &Path) -> PathBuf {
    if has_png_extension(target) {
        target.with_extension("")
    } else if target.is_dir() {
        target.join(DEFAULT_FILE_STEM)
    } else {
        target.to_path_buf()
    }
}

fn numbered(prefix: &Path, i: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!(".{}.png", i));
    PathBuf::from(name)
}

/// Paths `{prefix}.{i}.png` for `count` renders.
///
/// Numbering starts at 0. With `increment`, it starts at the first index
/// where none of the `count` consecutive files exist yet.
pub fn numbered_output_paths(target: &Path, count: usize, increment: bool) -> Vec<PathBuf> {
    let prefix = output_prefix(target);
    let mut start = 0;
    if increment {
        while (start..start + count).any(|i| numbered(&prefix, i).exists()) {
            start += 1;
        }
    }
    (start..start + count).map(|i| numbered(&prefix, i)).collect()
}
