//! Pure per-pixel math for the built-in effect provider.
//!
//! Everything here is a plain function on channel values — no images, no I/O —
//! so the color arithmetic is testable in isolation from encoding and
//! dispatch. Channels are `u8`, intermediate math is `f32` in the 0–255 range
//! unless a function says otherwise.

/// Rec. 601 luma of an RGB triple, in the 0–255 range.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Clamp a float channel back into `u8`.
pub fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Scale saturation by lerping each channel against the pixel's luma.
/// `amount` 0.0 = gray, 1.0 = identity, >1.0 = boosted.
pub fn saturate(rgb: [u8; 3], amount: f32) -> [u8; 3] {
    let gray = luma(rgb[0], rgb[1], rgb[2]);
    rgb.map(|c| clamp_channel(gray + amount * (c as f32 - gray)))
}

/// Scale contrast around the mid-gray point. `factor` 1.0 = identity,
/// <1.0 flattens, >1.0 steepens.
pub fn scale_contrast(rgb: [u8; 3], factor: f32) -> [u8; 3] {
    rgb.map(|c| clamp_channel(128.0 + factor * (c as f32 - 128.0)))
}

/// Percent-style contrast curve: `amount` 0.0 = identity, positive steepens,
/// negative flattens. Color channels only — alpha is the caller's to keep.
pub fn contrast_percent(rgb: [u8; 3], amount: f32) -> [u8; 3] {
    let factor = ((100.0 + amount) / 100.0).powi(2);
    rgb.map(|c| clamp_channel(((c as f32 / 255.0 - 0.5) * factor + 0.5) * 255.0))
}

/// Multiply channels by independent gains (white-balance style tint).
pub fn tint(rgb: [u8; 3], gains: [f32; 3]) -> [u8; 3] {
    [
        clamp_channel(rgb[0] as f32 * gains[0]),
        clamp_channel(rgb[1] as f32 * gains[1]),
        clamp_channel(rgb[2] as f32 * gains[2]),
    ]
}

/// The classic sepia matrix.
pub fn sepia(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    [
        clamp_channel(0.393 * r + 0.769 * g + 0.189 * b),
        clamp_channel(0.349 * r + 0.686 * g + 0.168 * b),
        clamp_channel(0.272 * r + 0.534 * g + 0.131 * b),
    ]
}

/// Linear-light to sRGB transfer on a 0–1 channel.
pub fn encode_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB to linear-light transfer on a 0–1 channel.
pub fn decode_srgb(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Darkening factor for a pixel at `(x, y)` in a `width` × `height` image.
/// 1.0 at the center, falling off quadratically toward the corners; a corner
/// pixel keeps `1.0 - strength` of its value.
pub fn vignette_factor(x: u32, y: u32, width: u32, height: u32, strength: f32) -> f32 {
    let cx = (width.saturating_sub(1)) as f32 / 2.0;
    let cy = (height.saturating_sub(1)) as f32 / 2.0;
    let corner = (cx * cx + cy * cy).sqrt().max(1.0);
    let dx = x as f32 - cx;
    let dy = y as f32 - cy;
    let d = (dx * dx + dy * dy).sqrt() / corner;
    1.0 - strength * d * d
}

/// Unsharp-mask blend: push each channel away from its blurred counterpart.
pub fn unsharp(original: u8, blurred: u8, amount: f32) -> u8 {
    clamp_channel(original as f32 + amount * (original as f32 - blurred as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_of_white_and_black() {
        assert_eq!(luma(255, 255, 255).round() as u32, 255);
        assert_eq!(luma(0, 0, 0), 0.0);
    }

    #[test]
    fn luma_weights_green_heaviest() {
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
        assert!(luma(255, 0, 0) > luma(0, 0, 255));
    }

    #[test]
    fn saturate_identity_at_one() {
        assert_eq!(saturate([200, 40, 90], 1.0), [200, 40, 90]);
    }

    #[test]
    fn saturate_zero_collapses_to_gray() {
        let [r, g, b] = saturate([200, 40, 90], 0.0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn scale_contrast_fixes_mid_gray() {
        assert_eq!(scale_contrast([128, 128, 128], 1.6), [128, 128, 128]);
        // Flattening pulls extremes toward the middle
        let [r, ..] = scale_contrast([255, 0, 0], 0.5);
        assert!(r < 255);
    }

    #[test]
    fn contrast_percent_identity_at_zero() {
        assert_eq!(contrast_percent([10, 128, 240], 0.0), [10, 128, 240]);
    }

    #[test]
    fn contrast_percent_pushes_extremes_apart() {
        let [dark, mid, bright] = contrast_percent([60, 128, 200], 25.0);
        assert!(dark < 60);
        assert_eq!(mid, 128);
        assert!(bright > 200);
    }

    #[test]
    fn sepia_warms_neutral_gray() {
        let [r, g, b] = sepia([128, 128, 128]);
        assert!(r > g);
        assert!(g > b);
    }

    #[test]
    fn srgb_transfer_roundtrips() {
        for &c in &[0.0, 0.02, 0.18, 0.5, 1.0] {
            let there_and_back = decode_srgb(encode_srgb(c));
            assert!((there_and_back - c).abs() < 1e-5, "channel {c}");
        }
    }

    #[test]
    fn vignette_full_at_center_darker_at_corner() {
        let center = vignette_factor(50, 50, 101, 101, 0.65);
        let corner = vignette_factor(0, 0, 101, 101, 0.65);
        assert!((center - 1.0).abs() < 1e-6);
        assert!((corner - 0.35).abs() < 1e-3);
    }

    #[test]
    fn unsharp_identity_when_blur_matches() {
        assert_eq!(unsharp(100, 100, 2.0), 100);
        // Edge pixel brighter than its blur gets pushed up
        assert!(unsharp(150, 100, 0.5) > 150);
    }
}
