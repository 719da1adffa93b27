//! # photoblend
//!
//! Preset-driven photo compositing: a base photograph, an overlay image, and
//! an ordered chain of parametric adjustments ("transforms") produce a
//! finished composite — and the same machinery, fanned out across N presets,
//! produces a gallery of preview thumbnails.
//!
//! # Architecture: The Chain Engine
//!
//! The heart of the crate is the transform-chain execution engine:
//!
//! ```text
//! BlendModel ("retro overlay")
//! ├── chain: [filter(chrome), contrast(10), saturation(1.5)]
//! ├── primary BlendingSet ── ExecutionLane ── unit │ unit │ unit
//! └── thumb   BlendingSet ── ExecutionLane ── unit │ unit │ unit
//! ```
//!
//! Each [`blending::BlendingSet`] owns one [`lane::ExecutionLane`] — a
//! single-worker FIFO queue — so transforms within a chain run strictly in
//! order, while independent chains (other presets, or a preset's thumbnail
//! next to its full-resolution run) execute in parallel. A chain run carries
//! its own context: a remaining-unit counter and a take-once callback, which
//! makes completion exactly-once on every terminal path (finished, failed,
//! canceled). Finished results are memoized on the set, so repeated requests
//! are free.
//!
//! Pixels are somebody else's problem: every transform is an opaque
//! `Image -> Image` call behind [`effects::EffectProvider`]. The crate ships
//! a pure-Rust provider ([`effects::RustProvider`]) built on the `image`
//! crate, and tests inject recording providers through the same seam.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | Transform data model: kinds, parameters, serde forms |
//! | [`lane`] | Single-worker execution lanes and cooperative cancellation |
//! | [`blending`] | Chain driver: per-run context, memoization, blend units |
//! | [`model`] | One preset at two resolutions (`run_full` / `run_thumb`) |
//! | [`gallery`] | Fan-out over N presets with an exactly-once aggregate |
//! | [`normalize`] | Center-crop + downscale to the common thumbnail input |
//! | [`effects`] | Effect-provider seam and the built-in pure-Rust provider |
//! | [`preset`] | TOML preset catalogs → ready-to-run models |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Layer stacks and shared image handles |
//!
//! # Design Decisions
//!
//! ## Counter-Based Completion, Not Queue Draining
//!
//! A chain could infer "I am done" from its lane going idle, but that reads
//! queue depth as a proxy for progress and breaks the moment two runs share a
//! lane. Every run instead counts its own remaining units and completes
//! through a take-once callback slot; lane idleness stays available as an
//! observability hook.
//!
//! ## Explicit Failure, No Silent Stalls
//!
//! A transform that produces no output terminates its run with
//! [`blending::ChainError::Effect`] through the same exactly-once completion
//! path as success. In a gallery pass a failed preset is simply one terminal
//! state among N — it never blocks the other presets or the aggregate signal.
//!
//! ## The Working Layer Is a Role, Not an Index
//!
//! Transform chains mutate the photographic base layer. Which layer that is
//! gets tagged explicitly when the [`types::LayerStack`] is built —
//! full-resolution and thumbnail runs cannot disagree about it.
//!
//! ## In-Memory Only
//!
//! Memoization lives on the [`blending::BlendingSet`] instance and dies with
//! it. There is deliberately no on-disk cache of intermediate images: presets
//! are cheap to re-run and a session's state should not survive the session.

pub mod blending;
pub mod effects;
pub mod gallery;
pub mod lane;
pub mod model;
pub mod normalize;
pub mod output;
pub mod preset;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
