//! Shared test utilities: deterministic image constructors and completion
//! helpers used across the module test suites.

use crate::blending::ChainResult;
use crate::types::ImageRef;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A `width` × `height` image filled with one RGBA color.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

pub fn solid_ref(width: u32, height: u32, rgba: [u8; 4]) -> ImageRef {
    Arc::new(solid(width, height, rgba))
}

/// A deterministic non-uniform image: channel values derived from pixel
/// coordinates, so crops and resizes are observable.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
}

pub fn gradient_ref(width: u32, height: u32) -> ImageRef {
    Arc::new(gradient(width, height))
}

/// A background-filled image with a single differing pixel at the center.
pub fn center_dot(width: u32, height: u32, background: [u8; 4], dot: [u8; 4]) -> DynamicImage {
    let mut buf = RgbaImage::from_pixel(width, height, Rgba(background));
    buf.put_pixel(width / 2, height / 2, Rgba(dot));
    DynamicImage::ImageRgba8(buf)
}

/// Wait for a chain completion delivered over a channel, with a generous
/// timeout so a broken exactly-once path fails loudly instead of hanging.
pub fn recv_result(rx: &Receiver<ChainResult>) -> ChainResult {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("chain completion within timeout")
}
