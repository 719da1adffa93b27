//! The effect-provider seam.
//!
//! [`EffectProvider`] is the single trait the chain engine calls into: one
//! transform in, one image out, or an explicit error. The engine never
//! interprets pixels and never retries — a failed apply terminates the chain
//! run with [`crate::blending::ChainError::Effect`].
//!
//! The production implementation is
//! [`RustProvider`](super::rust_provider::RustProvider) — pure Rust, built on
//! the `image` crate.

use crate::transform::Transform;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("{effect} produced no output: {reason}")]
    NoOutput { effect: String, reason: String },
}

/// An opaque `Image -> Image` function per transform kind.
///
/// Implementations must be `Send + Sync`: the same provider instance is
/// shared across every lane of a model and across models in a gallery pass.
pub trait EffectProvider: Send + Sync {
    /// Apply one transform to one input image.
    fn apply(
        &self,
        transform: &Transform,
        image: &DynamicImage,
    ) -> Result<DynamicImage, EffectError>;
}
