//! Effect application: the provider seam and the built-in implementation.
//!
//! The engine treats every transform as an opaque `Image -> Image` function
//! behind the [`EffectProvider`] trait; this module owns that seam plus the
//! production pure-Rust provider built on the `image` crate.

pub mod pixels;
pub mod provider;
pub mod rust_provider;

pub use provider::{EffectError, EffectProvider};
pub use rust_provider::RustProvider;
