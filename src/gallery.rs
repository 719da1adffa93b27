//! Gallery fan-out: one normalized source image through N preset chains.
//!
//! [`run_thumb_gallery`] normalizes the picked photograph once, then starts
//! every model's thumbnail chain. Models run concurrently — each on its own
//! lane — and stay internally sequential. A single aggregate callback fires
//! exactly once, when the completed count reaches N; success, failure,
//! rejection, and cancellation all count as terminal, so one broken preset
//! never blocks the rest of the gallery.
//!
//! Progress can be observed through an optional channel of [`GalleryEvent`]s,
//! typically drained by a printer thread (see the `gallery` subcommand).

use crate::blending::{ChainError, ChainOutcome, ChainResult, FinishedBlend};
use crate::lane::CancelToken;
use crate::model::{BlendModel, ModelError};
use crate::normalize::{self, NormalizeError, NormalizeOptions};
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

/// Terminal state of one model's thumbnail run.
#[derive(Debug)]
pub enum ThumbOutcome {
    /// The chain completed; the finished stack is ready to flatten.
    Ready(FinishedBlend),
    /// Cancellation was observed before the chain did any work.
    Canceled,
    /// The chain never started (configuration problem).
    Rejected(ModelError),
    /// A transform failed mid-chain.
    Failed(ChainError),
}

impl ThumbOutcome {
    /// Short stable label for events, manifests, and logs.
    pub fn status(&self) -> &'static str {
        match self {
            ThumbOutcome::Ready(_) => "ready",
            ThumbOutcome::Canceled => "canceled",
            ThumbOutcome::Rejected(_) => "rejected",
            ThumbOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ThumbOutcome::Ready(_))
    }
}

/// One model's entry in the final report, in catalog order.
#[derive(Debug)]
pub struct ThumbReport {
    pub name: String,
    pub outcome: ThumbOutcome,
}

/// Everything the gallery produced, in catalog order.
#[derive(Debug)]
pub struct GalleryReport {
    pub thumbs: Vec<ThumbReport>,
}

impl GalleryReport {
    pub fn ready_count(&self) -> usize {
        self.thumbs.iter().filter(|t| t.outcome.is_ready()).count()
    }

    pub fn all_ready(&self) -> bool {
        self.ready_count() == self.thumbs.len()
    }
}

/// Progress notifications emitted while the gallery runs.
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// The source image was normalized to the common thumbnail input.
    Normalized { width: u32, height: u32 },
    /// A model's thumbnail chain was started (or rejected on the spot).
    ModelStarted { name: String },
    /// A model reached a terminal state.
    ModelFinished { name: String, status: &'static str },
    /// Every model is terminal; the aggregate callback is about to fire.
    GalleryDone { ready: usize, total: usize },
}

type GalleryCallback = Box<dyn FnOnce(GalleryReport) + Send + 'static>;

struct Aggregate {
    total: usize,
    done: AtomicUsize,
    names: Vec<String>,
    slots: Mutex<Vec<Option<ThumbOutcome>>>,
    callback: Mutex<Option<GalleryCallback>>,
    events: Option<mpsc::Sender<GalleryEvent>>,
}

impl Aggregate {
    fn emit(&self, event: GalleryEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Record one model's terminal outcome; the recorder of the N-th outcome
    /// fires the aggregate callback.
    fn record(&self, index: usize, outcome: ThumbOutcome) {
        {
            let mut slots = self.slots.lock().unwrap();
            if slots[index].is_some() {
                return;
            }
            self.emit(GalleryEvent::ModelFinished {
                name: self.names[index].clone(),
                status: outcome.status(),
            });
            slots[index] = Some(outcome);
        }

        if self.done.fetch_add(1, Ordering::AcqRel) + 1 < self.total {
            return;
        }

        let slots = std::mem::take(&mut *self.slots.lock().unwrap());
        let thumbs: Vec<ThumbReport> = self
            .names
            .iter()
            .cloned()
            .zip(slots)
            .map(|(name, outcome)| ThumbReport {
                name,
                outcome: outcome.expect("all outcomes recorded before aggregation"),
            })
            .collect();
        let report = GalleryReport { thumbs };

        self.emit(GalleryEvent::GalleryDone {
            ready: report.ready_count(),
            total: self.total,
        });
        if let Some(callback) = self.callback.lock().unwrap().take() {
            callback(report);
        }
    }
}

fn terminal(result: ChainResult) -> ThumbOutcome {
    match result {
        Ok(ChainOutcome::Complete(done)) => ThumbOutcome::Ready(done),
        Ok(ChainOutcome::Canceled { .. }) => ThumbOutcome::Canceled,
        Err(err) => ThumbOutcome::Failed(err),
    }
}

/// Normalize `source` once and run every model's thumbnail chain.
///
/// Returns synchronously once all chains are started; `on_done` fires exactly
/// once, after the last model reaches a terminal state. The only synchronous
/// failure is a source image that cannot be normalized at all.
pub fn run_thumb_gallery(
    source: &DynamicImage,
    models: &[Arc<BlendModel>],
    options: &NormalizeOptions,
    cancel: &CancelToken,
    events: Option<mpsc::Sender<GalleryEvent>>,
    on_done: impl FnOnce(GalleryReport) + Send + 'static,
) -> Result<(), NormalizeError> {
    let normalized = Arc::new(normalize::normalize(source, options)?);

    let aggregate = Arc::new(Aggregate {
        total: models.len(),
        done: AtomicUsize::new(0),
        names: models.iter().map(|m| m.name().to_string()).collect(),
        slots: Mutex::new(models.iter().map(|_| None).collect()),
        callback: Mutex::new(Some(Box::new(on_done))),
        events,
    });
    aggregate.emit(GalleryEvent::Normalized {
        width: normalized.width(),
        height: normalized.height(),
    });

    if models.is_empty() {
        aggregate.emit(GalleryEvent::GalleryDone { ready: 0, total: 0 });
        if let Some(callback) = aggregate.callback.lock().unwrap().take() {
            callback(GalleryReport { thumbs: Vec::new() });
        }
        return Ok(());
    }

    for (index, model) in models.iter().enumerate() {
        aggregate.emit(GalleryEvent::ModelStarted {
            name: model.name().to_string(),
        });

        let recorder = Arc::clone(&aggregate);
        let started = model.run_thumb(
            Arc::clone(&normalized),
            options,
            cancel,
            move |result| recorder.record(index, terminal(result)),
        );
        if let Err(err) = started {
            aggregate.record(index, ThumbOutcome::Rejected(err));
        }
    }
    Ok(())
}
