//! One preset, runnable at two resolutions.
//!
//! A [`BlendModel`] pairs a layer stack and an ordered transform chain with a
//! primary (full-resolution) [`BlendingSet`] and a thumbnail set created
//! lazily on the first gallery pass. The effect provider is injected at
//! construction — models never look anything up globally.

use crate::blending::{BlendingSet, ChainResult, ConfigError};
use crate::effects::provider::EffectProvider;
use crate::lane::CancelToken;
use crate::normalize::{self, NormalizeError, NormalizeOptions};
use crate::transform::Transform;
use crate::types::{ImageRef, LayerStack};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Problems that keep a model's chain from starting.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot build thumbnail layers: {0}")]
    Normalize(#[from] NormalizeError),
}

/// A named preset: layer stack + transform chain + the sets that run them.
pub struct BlendModel {
    name: String,
    chain: Vec<Transform>,
    provider: Arc<dyn EffectProvider>,
    stack: LayerStack,
    primary: BlendingSet,
    thumb: OnceLock<BlendingSet>,
}

impl std::fmt::Debug for BlendModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlendModel")
            .field("name", &self.name)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl BlendModel {
    /// Build a model from a fully formed stack and chain. The primary set
    /// exists from construction; the thumbnail set is created on the first
    /// [`run_thumb`](Self::run_thumb).
    pub fn new(
        name: impl Into<String>,
        stack: LayerStack,
        chain: Vec<Transform>,
        provider: Arc<dyn EffectProvider>,
    ) -> Self {
        let name = name.into();
        let primary = BlendingSet::new(stack.clone(), &format!("blend-{name}"));
        Self {
            name,
            chain,
            provider,
            stack,
            primary,
            thumb: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain(&self) -> &[Transform] {
        &self.chain
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// The full-resolution set.
    pub fn primary(&self) -> &BlendingSet {
        &self.primary
    }

    /// The thumbnail set, once a gallery pass has created it.
    pub fn thumb(&self) -> Option<&BlendingSet> {
        self.thumb.get()
    }

    /// Run the whole chain against the full-resolution stack. `on_done` fires
    /// exactly once; a memoized model completes immediately.
    pub fn run_full(
        &self,
        cancel: &CancelToken,
        on_done: impl FnOnce(ChainResult) + Send + 'static,
    ) -> Result<(), ModelError> {
        self.primary
            .run_chain(&self.chain, &self.provider, cancel, on_done)?;
        Ok(())
    }

    /// Run the chain at thumbnail resolution against `source` (the normalized
    /// gallery input). The thumbnail set is built on first call — a
    /// pre-finished single-layer set when the chain is empty, otherwise the
    /// normalized overlay over `source` — and is never rebuilt.
    pub fn run_thumb(
        &self,
        source: ImageRef,
        options: &NormalizeOptions,
        cancel: &CancelToken,
        on_done: impl FnOnce(ChainResult) + Send + 'static,
    ) -> Result<(), ModelError> {
        let set = match self.thumb.get() {
            Some(set) => set,
            None => {
                let built = self.build_thumb_set(&source, options)?;
                self.thumb.get_or_init(|| built)
            }
        };
        set.run_chain(&self.chain, &self.provider, cancel, on_done)?;
        Ok(())
    }

    fn build_thumb_set(
        &self,
        source: &ImageRef,
        options: &NormalizeOptions,
    ) -> Result<BlendingSet, ModelError> {
        let lane_name = format!("thumb-{}", self.name);
        if self.chain.is_empty() {
            let stack = LayerStack::single(Arc::clone(source));
            return Ok(BlendingSet::preseeded(stack, Arc::clone(source), &lane_name));
        }

        let overlay = self
            .stack
            .overlay()
            .ok_or(ConfigError::TooFewLayers(0))?;
        let overlay_thumb = Arc::new(normalize::normalize(overlay, options)?);
        let stack = LayerStack::overlay_over_base(overlay_thumb, Arc::clone(source));
        Ok(BlendingSet::new(stack, &lane_name))
    }
}
