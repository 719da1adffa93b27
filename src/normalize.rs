//! Resize/normalize: the common thumbnail input every preset consumes.
//!
//! [`normalize`] center-crops an image to a square on its shorter edge, then
//! scales it down to a fixed target edge with Lanczos3 resampling. It never
//! upscales: a source smaller than the target keeps its cropped size. The
//! crop-box arithmetic is a pure function so it can be tested without
//! touching pixels.

use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;

/// Default edge length of gallery thumbnails, in pixels.
pub const DEFAULT_THUMB_EDGE: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Target edge length of the square output.
    pub edge: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            edge: DEFAULT_THUMB_EDGE,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("cannot normalize a {width}x{height} image to edge {edge}")]
    Degenerate { width: u32, height: u32, edge: u32 },
}

/// The centered square crop box for a `width` × `height` image:
/// `(x, y, side)` with `side = min(width, height)`.
pub fn square_crop_box(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

/// Center-crop to a square and scale down to `options.edge`.
///
/// Deterministic: equal inputs produce byte-equal outputs.
pub fn normalize(
    image: &DynamicImage,
    options: &NormalizeOptions,
) -> Result<DynamicImage, NormalizeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 || options.edge == 0 {
        return Err(NormalizeError::Degenerate {
            width,
            height,
            edge: options.edge,
        });
    }

    let (x, y, side) = square_crop_box(width, height);
    let square = image.crop_imm(x, y, side, side);

    if side <= options.edge {
        return Ok(square);
    }
    Ok(square.resize_exact(options.edge, options.edge, FilterType::Lanczos3))
}
