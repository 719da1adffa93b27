//! Shared types used across the blending pipeline.
//!
//! A [`LayerStack`] is the immutable input of a blending run: an ordered list
//! of images, index 0 conventionally the overlay/top layer, with the working
//! layer (the one the transform chain mutates) tagged by role at construction.
//! Images are shared via [`ImageRef`] so stacks, memoized results, and reports
//! can be cloned without copying pixels.

use image::DynamicImage;
use std::sync::Arc;

/// A cheaply cloneable, immutable image handle.
pub type ImageRef = Arc<DynamicImage>;

/// An ordered, fixed-length stack of image layers.
///
/// The stack itself never changes once built; a blending run produces a *new*
/// vector of layers with the processed image substituted at the working index
/// (see [`LayerStack::substitute`]).
///
/// The working layer is always the photographic base — the non-overlay layer —
/// and is tagged explicitly by the constructor rather than inferred from
/// position, so full-resolution and thumbnail runs agree on which layer the
/// chain consumes.
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<ImageRef>,
    working: Option<usize>,
}

impl LayerStack {
    /// A stack with no working layer selected. Running a chain against it is a
    /// configuration error; useful as a placeholder in catalogs under
    /// construction.
    pub fn unselected(layers: Vec<ImageRef>) -> Self {
        Self {
            layers,
            working: None,
        }
    }

    /// The canonical two-layer stack: overlay on top, photographic base below.
    /// The base is the working layer.
    pub fn overlay_over_base(overlay: ImageRef, base: ImageRef) -> Self {
        Self {
            layers: vec![overlay, base],
            working: Some(1),
        }
    }

    /// A single-image stack whose only layer is also the working layer.
    ///
    /// Too short to drive a blend chain; used for pre-seeded (already
    /// finished) thumbnail sets.
    pub fn single(image: ImageRef) -> Self {
        Self {
            layers: vec![image],
            working: Some(0),
        }
    }

    /// The overlay/top layer, if any.
    pub fn overlay(&self) -> Option<&ImageRef> {
        self.layers.first()
    }

    /// Index of the role-tagged working layer.
    pub fn working_index(&self) -> Option<usize> {
        self.working
    }

    /// The image the first transform of a chain will consume.
    pub fn working_image(&self) -> Option<&ImageRef> {
        self.working.and_then(|i| self.layers.get(i))
    }

    pub fn layers(&self) -> &[ImageRef] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// A copy of the stack's layers with `image` substituted at the working
    /// index. The stack itself is left untouched.
    pub fn substitute(&self, image: ImageRef) -> Vec<ImageRef> {
        let mut layers = self.layers.clone();
        if let Some(index) = self.working
            && index < layers.len()
        {
            layers[index] = image;
        }
        layers
    }
}
