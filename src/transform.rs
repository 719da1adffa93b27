//! The transform data model.
//!
//! A [`Transform`] is an immutable description of one parametric adjustment:
//! a kind tag plus the numeric fields that kind needs. The engine never
//! interprets these values — it hands the whole transform to the effect
//! provider (see [`crate::effects`]) and sequences the results.
//!
//! Transforms serialize as internally tagged tables (`kind = "contrast"`),
//! which keeps preset catalogs readable TOML:
//!
//! ```toml
//! chain = [
//!     { kind = "filter", filter = "vignette" },
//!     { kind = "contrast", amount = 0.15 },
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// One parametric image adjustment.
///
/// Parameter spaces follow the `image` crate's conventions rather than Core
/// Image's: `Contrast` and `Brightness` are offsets with 0.0 as identity,
/// `Saturation` is a multiplier with 1.0 as identity, and `Noise` is the
/// strength of a fixed-radius unsharp mask with 0.0 as identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// A named stylistic look, resolved by the effect provider.
    Filter { filter: FilterKind },
    /// Contrast adjustment in percent; positive increases contrast.
    Contrast {
        #[serde(default)]
        amount: f32,
    },
    /// Per-channel brightness offset; positive brightens.
    Brightness {
        #[serde(default)]
        amount: f32,
    },
    /// Saturation multiplier; 0.0 desaturates to gray, 1.0 is identity.
    Saturation {
        #[serde(default = "identity_multiplier")]
        amount: f32,
    },
    /// Grain-style sharpening strength (unsharp mask, fixed radius).
    Noise {
        #[serde(default)]
        amount: f32,
    },
}

fn identity_multiplier() -> f32 {
    1.0
}

impl Transform {
    /// Stable name of the transform's kind, for reports and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Transform::Filter { .. } => "filter",
            Transform::Contrast { .. } => "contrast",
            Transform::Brightness { .. } => "brightness",
            Transform::Saturation { .. } => "saturation",
            Transform::Noise { .. } => "noise",
        }
    }
}

/// The named stylistic looks a [`Transform::Filter`] can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    None,
    Chrome,
    Fade,
    Instant,
    Mono,
    Noir,
    Process,
    Tonal,
    Transfer,
    Curve,
    Linear,
    Sepia,
    Vignette,
}

impl FilterKind {
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Chrome => "chrome",
            FilterKind::Fade => "fade",
            FilterKind::Instant => "instant",
            FilterKind::Mono => "mono",
            FilterKind::Noir => "noir",
            FilterKind::Process => "process",
            FilterKind::Tonal => "tonal",
            FilterKind::Transfer => "transfer",
            FilterKind::Curve => "curve",
            FilterKind::Linear => "linear",
            FilterKind::Sepia => "sepia",
            FilterKind::Vignette => "vignette",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
