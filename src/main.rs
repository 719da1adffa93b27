use clap::{Parser, Subcommand};
use image::ImageReader;
use photoblend::blending::ChainOutcome;
use photoblend::effects::{EffectProvider, RustProvider};
use photoblend::gallery::{self, ThumbOutcome};
use photoblend::lane::CancelToken;
use photoblend::normalize::{DEFAULT_THUMB_EDGE, NormalizeOptions};
use photoblend::{output, preset};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "photoblend")]
#[command(about = "Preset-driven photo compositing")]
#[command(long_about = "\
Preset-driven photo compositing

A preset pairs an overlay image with an ordered chain of adjustments
(filter, contrast, brightness, saturation, noise). photoblend runs a
photograph through one preset at full resolution, or through every preset
in a catalog at thumbnail size to build a preview gallery.

Catalog structure (TOML, see 'photoblend gen-presets'):

  [[preset]]
  name = \"retro overlay\"
  overlay = \"overlays/retro.png\"          # relative to the catalog file
  chain = [
      { kind = \"filter\", filter = \"chrome\" },
      { kind = \"contrast\", amount = 10.0 },
      { kind = \"saturation\", amount = 1.5 },
  ]

The gallery command writes one PNG per successful preset plus a
gallery.json manifest recording every preset's terminal status — a failed
preset never blocks the others.")]
#[command(version)]
struct Cli {
    /// Preset catalog file
    #[arg(long, default_value = "presets.toml", global = true)]
    presets: PathBuf,

    /// Output directory
    #[arg(long, default_value = "blends", global = true)]
    out: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every preset at thumbnail size and write a preview gallery
    Gallery {
        /// Source photograph
        image: PathBuf,

        /// Thumbnail edge length in pixels
        #[arg(long, default_value_t = DEFAULT_THUMB_EDGE)]
        edge: u32,
    },
    /// Run one preset against the full-resolution photograph
    Render {
        /// Source photograph
        image: PathBuf,

        /// Preset name from the catalog
        preset: String,
    },
    /// Print a documented stock preset catalog
    GenPresets,
}

/// gallery.json entry: one preset's terminal state and output file.
#[derive(Serialize)]
struct ManifestEntry {
    name: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct GalleryManifest {
    edge: u32,
    thumbs: Vec<ManifestEntry>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Gallery { image, edge } => run_gallery(&cli.presets, &cli.out, &image, edge),
        Command::Render { image, preset } => run_render(&cli.presets, &cli.out, &image, &preset),
        Command::GenPresets => {
            print!("{}", preset::stock_catalog_toml());
            Ok(())
        }
    }
}

fn run_gallery(
    presets: &Path,
    out: &Path,
    image: &Path,
    edge: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = load_image(image)?;
    let catalog = preset::load_catalog(presets)?;
    let catalog_dir = presets.parent().unwrap_or(Path::new("."));

    let provider: Arc<dyn EffectProvider> = Arc::new(RustProvider::new());
    let base = Arc::new(source.clone());
    let models = catalog.build_models(catalog_dir, &base, &provider)?;

    let (event_tx, event_rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in event_rx {
            for line in output::format_gallery_event(&event) {
                println!("{}", line);
            }
        }
    });

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    gallery::run_thumb_gallery(
        &source,
        &models,
        &NormalizeOptions { edge },
        &CancelToken::new(),
        Some(event_tx),
        move |report| {
            let _ = done_tx.send(report);
        },
    )?;
    let report = done_rx.recv()?;

    std::fs::create_dir_all(out)?;
    let mut written: Vec<(String, String)> = Vec::new();
    let mut entries: Vec<ManifestEntry> = Vec::new();
    for thumb in &report.thumbs {
        let mut entry = ManifestEntry {
            name: thumb.name.clone(),
            status: thumb.outcome.status(),
            path: None,
            error: None,
        };
        match &thumb.outcome {
            ThumbOutcome::Ready(done) => {
                if let Some(flat) = done.flatten() {
                    let file = format!("{}-thumb.png", slug(&thumb.name));
                    flat.save(out.join(&file))?;
                    written.push((thumb.name.clone(), file.clone()));
                    entry.path = Some(file);
                }
            }
            ThumbOutcome::Rejected(err) => entry.error = Some(err.to_string()),
            ThumbOutcome::Failed(err) => entry.error = Some(err.to_string()),
            ThumbOutcome::Canceled => {}
        }
        entries.push(entry);
    }

    let manifest = GalleryManifest {
        edge,
        thumbs: entries,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(out.join("gallery.json"), json)?;

    // Models (and their lanes) are done; let the printer drain and exit.
    drop(models);
    printer.join().unwrap();

    output::print_gallery_report(&report, &written);
    println!("Manifest: {}", out.join("gallery.json").display());
    Ok(())
}

fn run_render(
    presets: &Path,
    out: &Path,
    image: &Path,
    preset_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = load_image(image)?;
    let catalog = preset::load_catalog(presets)?;
    let catalog_dir = presets.parent().unwrap_or(Path::new("."));

    let spec = catalog
        .get(preset_name)
        .ok_or_else(|| format!("preset '{preset_name}' not found in {}", presets.display()))?;

    let provider: Arc<dyn EffectProvider> = Arc::new(RustProvider::new());
    let base = Arc::new(source);
    let model = spec.build_model(catalog_dir, &base, &provider)?;

    println!("==> Rendering '{}' ({} transforms)", spec.name, spec.chain.len());
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    model.run_full(&CancelToken::new(), move |result| {
        let _ = done_tx.send(result);
    })?;

    match done_rx.recv()? {
        Ok(ChainOutcome::Complete(done)) => {
            let flat = done
                .flatten()
                .ok_or("finished blend has no layers to flatten")?;
            std::fs::create_dir_all(out)?;
            let file = out.join(format!("{}.png", slug(&spec.name)));
            flat.save(&file)?;
            println!("==> Wrote {}", file.display());
            Ok(())
        }
        Ok(ChainOutcome::Canceled { .. }) => Err("render was canceled".into()),
        Err(err) => Err(Box::new(err)),
    }
}

fn load_image(path: &Path) -> Result<image::DynamicImage, Box<dyn std::error::Error>> {
    Ok(ImageReader::open(path)?.decode()?)
}

/// File-name slug for a preset display name.
fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}
