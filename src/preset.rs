//! The preset catalog: named overlay + transform-chain definitions.
//!
//! Catalogs are plain TOML files with one `[[preset]]` table per preset:
//!
//! ```toml
//! [[preset]]
//! name = "retro overlay"
//! overlay = "overlays/retro.png"
//! chain = [
//!     { kind = "filter", filter = "chrome" },
//!     { kind = "contrast", amount = 10.0 },
//! ]
//! ```
//!
//! Overlay paths are resolved relative to the catalog file — presets carry
//! explicit configuration, nothing is looked up from an ambient bundle.
//! [`PresetCatalog::build_models`] decodes every overlay (in parallel) and
//! pairs it with the base photograph into ready-to-run [`BlendModel`]s.

use crate::effects::provider::EffectProvider;
use crate::model::BlendModel;
use crate::transform::Transform;
use crate::types::{ImageRef, LayerStack};
use image::ImageReader;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid preset catalog: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("catalog defines no presets")]
    Empty,
    #[error("cannot decode overlay {path}: {reason}")]
    Overlay { path: PathBuf, reason: String },
}

/// One preset definition as written in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetSpec {
    /// Display name, also used to derive output file names.
    pub name: String,
    /// Overlay image path, relative to the catalog file.
    pub overlay: PathBuf,
    /// Ordered transform chain; empty means "overlay only".
    #[serde(default)]
    pub chain: Vec<Transform>,
}

/// A parsed catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCatalog {
    #[serde(default, rename = "preset")]
    pub presets: Vec<PresetSpec>,
}

/// Load and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<PresetCatalog, PresetError> {
    let content = std::fs::read_to_string(path)?;
    let catalog: PresetCatalog = toml::from_str(&content)?;
    if catalog.presets.is_empty() {
        return Err(PresetError::Empty);
    }
    Ok(catalog)
}

impl PresetSpec {
    /// Decode this preset's overlay and pair it with `base` into a runnable
    /// model.
    pub fn build_model(
        &self,
        catalog_dir: &Path,
        base: &ImageRef,
        provider: &Arc<dyn EffectProvider>,
    ) -> Result<Arc<BlendModel>, PresetError> {
        let overlay = Arc::new(load_overlay(&catalog_dir.join(&self.overlay))?);
        let stack = LayerStack::overlay_over_base(overlay, Arc::clone(base));
        Ok(Arc::new(BlendModel::new(
            self.name.clone(),
            stack,
            self.chain.clone(),
            Arc::clone(provider),
        )))
    }
}

impl PresetCatalog {
    /// Look up a preset by display name.
    pub fn get(&self, name: &str) -> Option<&PresetSpec> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Decode every preset's overlay and build one [`BlendModel`] per preset,
    /// all sharing `base` as the photographic layer and `provider` for effect
    /// application. Overlays decode in parallel; catalog order is preserved.
    pub fn build_models(
        &self,
        catalog_dir: &Path,
        base: &ImageRef,
        provider: &Arc<dyn EffectProvider>,
    ) -> Result<Vec<Arc<BlendModel>>, PresetError> {
        self.presets
            .par_iter()
            .map(|spec| spec.build_model(catalog_dir, base, provider))
            .collect()
    }
}

fn load_overlay(path: &Path) -> Result<image::DynamicImage, PresetError> {
    ImageReader::open(path)
        .map_err(PresetError::Io)?
        .decode()
        .map_err(|e| PresetError::Overlay {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// A documented stock catalog, printable via the `gen-presets` subcommand.
/// The three classic presets; overlay paths are placeholders to adjust.
pub fn stock_catalog_toml() -> &'static str {
    r##"# photoblend preset catalog
#
# Each [[preset]] pairs an overlay image with an ordered transform chain.
# Overlay paths are resolved relative to this file. Chain entries are
# internally tagged: kind = "filter" | "contrast" | "brightness" |
# "saturation" | "noise".
#
# Parameter spaces: contrast/brightness are offsets (0.0 = unchanged),
# saturation is a multiplier (1.0 = unchanged), noise is the strength of a
# grain-style sharpening pass (0.0 = unchanged).

[[preset]]
name = "basic overlay"
overlay = "overlays/basic.png"
chain = [
    { kind = "filter", filter = "vignette" },
    { kind = "contrast", amount = 12.0 },
    { kind = "brightness", amount = 0.0 },
]

[[preset]]
name = "retro overlay"
overlay = "overlays/retro.png"
chain = [
    { kind = "filter", filter = "chrome" },
    { kind = "contrast", amount = 10.0 },
    { kind = "saturation", amount = 1.5 },
]

[[preset]]
name = "noise overlay"
overlay = "overlays/noise.png"
chain = [
    { kind = "saturation", amount = 1.3 },
    { kind = "brightness", amount = 14.0 },
    { kind = "noise", amount = 0.4 },
]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::provider::tests::RecordingProvider;
    use crate::test_helpers::{gradient, solid_ref};
    use crate::transform::FilterKind;
    use tempfile::TempDir;

    #[test]
    fn stock_catalog_parses() {
        let catalog: PresetCatalog = toml::from_str(stock_catalog_toml()).unwrap();
        assert_eq!(catalog.presets.len(), 3);

        let retro = &catalog.presets[1];
        assert_eq!(retro.name, "retro overlay");
        assert_eq!(retro.overlay, PathBuf::from("overlays/retro.png"));
        assert_eq!(
            retro.chain[0],
            Transform::Filter {
                filter: FilterKind::Chrome
            }
        );
        assert_eq!(retro.chain[2], Transform::Saturation { amount: 1.5 });
    }

    #[test]
    fn catalog_without_chain_defaults_to_empty() {
        let catalog: PresetCatalog = toml::from_str(
            "[[preset]]\nname = \"bare\"\noverlay = \"o.png\"\n",
        )
        .unwrap();
        assert!(catalog.presets[0].chain.is_empty());
    }

    #[test]
    fn load_catalog_rejects_empty_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(load_catalog(&path), Err(PresetError::Empty)));
    }

    #[test]
    fn load_catalog_surfaces_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        std::fs::write(&path, "[[preset]]\nname = 42\n").unwrap();
        assert!(matches!(load_catalog(&path), Err(PresetError::Toml(_))));
    }

    #[test]
    fn build_models_decodes_overlays_in_catalog_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("overlays")).unwrap();
        for name in ["a", "b"] {
            gradient(8, 8)
                .save(tmp.path().join(format!("overlays/{name}.png")))
                .unwrap();
        }

        let catalog: PresetCatalog = toml::from_str(
            r#"
            [[preset]]
            name = "first"
            overlay = "overlays/a.png"
            chain = [{ kind = "contrast", amount = 5.0 }]

            [[preset]]
            name = "second"
            overlay = "overlays/b.png"
            "#,
        )
        .unwrap();

        let provider: Arc<dyn EffectProvider> = Arc::new(RecordingProvider::new());
        let base = solid_ref(16, 16, [50, 50, 50, 255]);
        let models = catalog
            .build_models(tmp.path(), &base, &provider)
            .unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name(), "first");
        assert_eq!(models[1].name(), "second");
        assert_eq!(models[0].chain().len(), 1);
        assert!(Arc::ptr_eq(
            models[0].stack().working_image().unwrap(),
            &base
        ));
        assert_eq!(models[1].stack().overlay().unwrap().width(), 8);
    }

    #[test]
    fn build_models_reports_missing_overlays() {
        let tmp = TempDir::new().unwrap();
        let catalog: PresetCatalog = toml::from_str(
            "[[preset]]\nname = \"ghost\"\noverlay = \"nowhere.png\"\n",
        )
        .unwrap();

        let provider: Arc<dyn EffectProvider> = Arc::new(RecordingProvider::new());
        let base = solid_ref(4, 4, [0, 0, 0, 255]);
        let err = catalog.build_models(tmp.path(), &base, &provider).unwrap_err();
        assert!(matches!(err, PresetError::Io(_)));
    }
}
