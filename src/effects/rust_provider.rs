//! Pure Rust effect provider — zero external dependencies.
//!
//! Implements every [`Transform`] kind over the `image` crate:
//!
//! | Kind | Implementation |
//! |---|---|
//! | Contrast | percent curve per pixel ([`pixels::contrast_percent`], alpha-safe) |
//! | Brightness | `DynamicImage::brighten` |
//! | Saturation | per-pixel gray lerp ([`pixels::saturate`]) |
//! | Noise | unsharp mask: gaussian blur + per-pixel push ([`pixels::unsharp`]) |
//! | Filter | the named looks below, all per-pixel math |
//!
//! Named looks are deliberately simple single-pass operations — tone scaling,
//! tints, matrices, a radial falloff — not attempts to clone any vendor's
//! exact curves.

use super::pixels;
use super::provider::{EffectError, EffectProvider};
use crate::transform::{FilterKind, Transform};
use image::{DynamicImage, Rgba};

/// Blur radius of the grain-style sharpening pass (`Transform::Noise`).
const UNSHARP_SIGMA: f32 = 7.0;

/// Radial falloff strength of the vignette look.
const VIGNETTE_STRENGTH: f32 = 0.65;

/// Pure Rust provider using the `image` crate.
pub struct RustProvider;

impl RustProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProvider for RustProvider {
    fn apply(
        &self,
        transform: &Transform,
        image: &DynamicImage,
    ) -> Result<DynamicImage, EffectError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EffectError::NoOutput {
                effect: transform.kind_name().to_string(),
                reason: format!("empty input ({}x{})", image.width(), image.height()),
            });
        }

        let output = match *transform {
            Transform::Contrast { amount } => {
                map_rgb(image, |rgb| pixels::contrast_percent(rgb, amount))
            }
            Transform::Brightness { amount } => image.brighten(amount.round() as i32),
            Transform::Saturation { amount } => map_rgb(image, |rgb| pixels::saturate(rgb, amount)),
            Transform::Noise { amount } => unsharp_mask(image, amount),
            Transform::Filter { filter } => named_look(filter, image),
        };
        Ok(output)
    }
}

/// Apply a pure RGB function to every pixel, preserving alpha.
fn map_rgb(image: &DynamicImage, f: impl Fn([u8; 3]) -> [u8; 3]) -> DynamicImage {
    let mut buf = image.to_rgba8();
    for px in buf.pixels_mut() {
        let [r, g, b, a] = px.0;
        let [r, g, b] = f([r, g, b]);
        *px = Rgba([r, g, b, a]);
    }
    DynamicImage::ImageRgba8(buf)
}

/// Like [`map_rgb`] but the function also sees pixel coordinates.
fn map_rgb_xy(image: &DynamicImage, f: impl Fn(u32, u32, [u8; 3]) -> [u8; 3]) -> DynamicImage {
    let mut buf = image.to_rgba8();
    for (x, y, px) in buf.enumerate_pixels_mut() {
        let [r, g, b, a] = px.0;
        let [r, g, b] = f(x, y, [r, g, b]);
        *px = Rgba([r, g, b, a]);
    }
    DynamicImage::ImageRgba8(buf)
}

fn unsharp_mask(image: &DynamicImage, amount: f32) -> DynamicImage {
    let blurred = image.blur(UNSHARP_SIGMA).to_rgba8();
    let mut buf = image.to_rgba8();
    for (x, y, px) in buf.enumerate_pixels_mut() {
        let soft = blurred.get_pixel(x, y).0;
        for i in 0..3 {
            px.0[i] = pixels::unsharp(px.0[i], soft[i], amount);
        }
    }
    DynamicImage::ImageRgba8(buf)
}

fn grayscale_with_contrast(image: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(image, |rgb| {
        let l = pixels::clamp_channel(pixels::luma(rgb[0], rgb[1], rgb[2]));
        pixels::scale_contrast([l, l, l], factor)
    })
}

fn named_look(filter: FilterKind, image: &DynamicImage) -> DynamicImage {
    match filter {
        FilterKind::None => image.clone(),
        FilterKind::Mono => grayscale_with_contrast(image, 1.0),
        FilterKind::Noir => grayscale_with_contrast(image, 1.35),
        FilterKind::Tonal => grayscale_with_contrast(image, 0.85),
        FilterKind::Sepia => map_rgb(image, pixels::sepia),
        FilterKind::Fade => map_rgb(image, |rgb| {
            pixels::scale_contrast(pixels::saturate(rgb, 0.7), 0.8)
        }),
        FilterKind::Chrome => map_rgb(image, |rgb| {
            pixels::scale_contrast(pixels::saturate(rgb, 1.25), 1.1)
        }),
        FilterKind::Instant => map_rgb(image, |rgb| {
            pixels::scale_contrast(pixels::tint(rgb, [1.1, 1.0, 0.85]), 0.85)
        }),
        FilterKind::Process => map_rgb(image, |rgb| {
            pixels::scale_contrast(pixels::tint(rgb, [0.95, 1.0, 1.12]), 1.08)
        }),
        FilterKind::Transfer => map_rgb(image, |rgb| pixels::tint(rgb, [1.15, 1.02, 0.8])),
        FilterKind::Curve => map_rgb(image, |rgb| {
            rgb.map(|c| pixels::clamp_channel(pixels::encode_srgb(c as f32 / 255.0) * 255.0))
        }),
        FilterKind::Linear => map_rgb(image, |rgb| {
            rgb.map(|c| pixels::clamp_channel(pixels::decode_srgb(c as f32 / 255.0) * 255.0))
        }),
        FilterKind::Vignette => map_rgb_xy(image, |x, y, rgb| {
            let factor = pixels::vignette_factor(x, y, image.width(), image.height(), VIGNETTE_STRENGTH);
            rgb.map(|c| pixels::clamp_channel(c as f32 * factor))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{center_dot, solid};

    fn apply(transform: Transform, image: &DynamicImage) -> DynamicImage {
        RustProvider::new().apply(&transform, image).unwrap()
    }

    #[test]
    fn zero_sized_input_is_rejected() {
        let empty = DynamicImage::new_rgba8(0, 0);
        let err = RustProvider::new()
            .apply(&Transform::Contrast { amount: 10.0 }, &empty)
            .unwrap_err();
        assert!(matches!(err, EffectError::NoOutput { .. }));
    }

    #[test]
    fn contrast_zero_is_identity() {
        let image = solid(3, 3, [90, 120, 200, 255]);
        let out = apply(Transform::Contrast { amount: 0.0 }, &image);
        assert_eq!(out.to_rgba8().as_raw(), image.to_rgba8().as_raw());
    }

    #[test]
    fn brightness_shifts_channels() {
        let image = solid(2, 2, [100, 100, 100, 255]);
        let out = apply(Transform::Brightness { amount: 20.0 }, &image);
        assert_eq!(out.to_rgba8().get_pixel(0, 0).0, [120, 120, 120, 255]);
    }

    #[test]
    fn saturation_one_is_identity_zero_is_gray() {
        let image = solid(2, 2, [200, 40, 90, 255]);

        let same = apply(Transform::Saturation { amount: 1.0 }, &image);
        assert_eq!(same.to_rgba8().as_raw(), image.to_rgba8().as_raw());

        let gray = apply(Transform::Saturation { amount: 0.0 }, &image);
        let [r, g, b, _] = gray.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn noise_is_identity_on_flat_regions() {
        // A solid image equals its own blur, so the unsharp push is zero.
        let image = solid(16, 16, [77, 150, 33, 255]);
        let out = apply(Transform::Noise { amount: 0.8 }, &image);
        assert_eq!(
            out.to_rgba8().get_pixel(8, 8).0,
            image.to_rgba8().get_pixel(8, 8).0
        );
    }

    #[test]
    fn noise_amplifies_edges() {
        // Bright dot on dark ground: the dot stands above its blur.
        let image = center_dot(17, 17, [20, 20, 20, 255], [220, 220, 220, 255]);
        let before = image.to_rgba8().get_pixel(8, 8).0[0];
        let out = apply(Transform::Noise { amount: 1.0 }, &image);
        let after = out.to_rgba8().get_pixel(8, 8).0[0];
        assert!(after >= before);
    }

    #[test]
    fn mono_and_noir_are_neutral() {
        let image = solid(4, 4, [180, 60, 60, 255]);
        for filter in [FilterKind::Mono, FilterKind::Noir, FilterKind::Tonal] {
            let out = apply(Transform::Filter { filter }, &image);
            let [r, g, b, _] = out.to_rgba8().get_pixel(1, 1).0;
            assert_eq!(r, g, "{filter} not neutral");
            assert_eq!(g, b, "{filter} not neutral");
        }
    }

    #[test]
    fn sepia_orders_channels() {
        let image = solid(2, 2, [128, 128, 128, 255]);
        let out = apply(
            Transform::Filter {
                filter: FilterKind::Sepia,
            },
            &image,
        );
        let [r, g, b, _] = out.to_rgba8().get_pixel(0, 0).0;
        assert!(r > g && g > b);
    }

    #[test]
    fn vignette_darkens_corners_not_center() {
        let image = solid(31, 31, [200, 200, 200, 255]);
        let out = apply(
            Transform::Filter {
                filter: FilterKind::Vignette,
            },
            &image,
        );
        let buf = out.to_rgba8();
        assert_eq!(buf.get_pixel(15, 15).0[0], 200);
        assert!(buf.get_pixel(0, 0).0[0] < 120);
    }

    #[test]
    fn none_filter_is_byte_identical() {
        let image = center_dot(8, 8, [3, 14, 15, 255], [92, 65, 35, 255]);
        let out = apply(
            Transform::Filter {
                filter: FilterKind::None,
            },
            &image,
        );
        assert_eq!(out.as_bytes(), image.as_bytes());
    }

    #[test]
    fn curve_and_linear_approximately_invert() {
        let image = solid(2, 2, [64, 128, 192, 255]);
        let encoded = apply(
            Transform::Filter {
                filter: FilterKind::Curve,
            },
            &image,
        );
        let back = apply(
            Transform::Filter {
                filter: FilterKind::Linear,
            },
            &encoded,
        );
        let original = image.to_rgba8();
        let roundtrip = back.to_rgba8();
        for (a, b) in original.as_raw().iter().zip(roundtrip.as_raw()) {
            assert!((*a as i16 - *b as i16).abs() <= 2);
        }
    }

    #[test]
    fn alpha_survives_every_kind() {
        let image = solid(2, 2, [50, 100, 150, 77]);
        let transforms = [
            Transform::Contrast { amount: 15.0 },
            Transform::Saturation { amount: 1.4 },
            Transform::Noise { amount: 0.4 },
            Transform::Filter {
                filter: FilterKind::Sepia,
            },
        ];
        for t in transforms {
            let out = apply(t, &image);
            assert_eq!(out.to_rgba8().get_pixel(1, 1).0[3], 77, "{}", t.kind_name());
        }
    }
}
