//! CLI output formatting for gallery and render runs.
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure — no I/O, no side effects.
//!
//! ```text
//! Normalized source to 240x240
//! ..2 presets running
//! basic overlay: ready
//! retro overlay: failed
//! Gallery: 1/2 thumbnails ready
//!
//! Thumbnails
//! 001 basic overlay: ready → basic-overlay-thumb.png
//! 002 retro overlay: failed (transform 1 (contrast) failed: ...)
//! ```

use crate::gallery::{GalleryEvent, GalleryReport, ThumbOutcome};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// One line per gallery progress event, suitable for a printer thread.
pub fn format_gallery_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::Normalized { width, height } => {
            vec![format!("Normalized source to {width}x{height}")]
        }
        GalleryEvent::ModelStarted { name } => vec![format!("..{name} running")],
        GalleryEvent::ModelFinished { name, status } => vec![format!("{name}: {status}")],
        GalleryEvent::GalleryDone { ready, total } => {
            vec![format!("Gallery: {ready}/{total} thumbnails ready")]
        }
    }
}

/// The final per-preset summary. `written` pairs each preset name with the
/// file its thumbnail was written to, when one was.
pub fn format_gallery_report(
    report: &GalleryReport,
    written: &[(String, String)],
) -> Vec<String> {
    let mut lines = vec!["Thumbnails".to_string()];
    for (pos, thumb) in report.thumbs.iter().enumerate() {
        let path = written
            .iter()
            .find(|(name, _)| *name == thumb.name)
            .map(|(_, path)| path.as_str());
        lines.push(thumb_line(pos + 1, &thumb.name, &thumb.outcome, path));
    }
    lines.push(format!(
        "{} of {} presets ready",
        report.ready_count(),
        report.thumbs.len()
    ));
    lines
}

fn thumb_line(index: usize, name: &str, outcome: &ThumbOutcome, path: Option<&str>) -> String {
    let prefix = format!("{} {}", format_index(index), name);
    match (outcome, path) {
        (ThumbOutcome::Ready(_), Some(path)) => format!("{prefix}: ready → {path}"),
        (ThumbOutcome::Ready(_), None) => format!("{prefix}: ready"),
        (ThumbOutcome::Canceled, _) => format!("{prefix}: canceled"),
        (ThumbOutcome::Rejected(err), _) => format!("{prefix}: rejected ({err})"),
        (ThumbOutcome::Failed(err), _) => format!("{prefix}: failed ({err})"),
    }
}

pub fn print_gallery_report(report: &GalleryReport, written: &[(String, String)]) {
    for line in format_gallery_report(report, written) {
        println!("{line}");
    }
}
