//! The chain driver: [`BlendingSet`] runs an ordered transform chain against
//! one layer stack on its own execution lane, and memoizes the finished
//! result.
//!
//! # Completion model
//!
//! One call to [`BlendingSet::run_chain`] enqueues one blend unit per
//! transform. Each run owns a context carrying the working image, a counter of
//! remaining units, and a take-once completion callback — the unit that brings
//! the counter to zero publishes the memo and fires the callback. Failure and
//! cancellation fire the same callback through the same take-once slot, so
//! completion is exactly-once for every terminal path, and queued units of a
//! terminated run degrade to no-ops.
//!
//! The set's mutable state is confined to the run context and the memo slot;
//! the layer stack itself is immutable and shared. Once the memo is populated
//! the set never runs another unit — later calls are pure reads.

use crate::effects::provider::{EffectError, EffectProvider};
use crate::lane::{CancelToken, ExecutionLane};
use crate::transform::Transform;
use crate::types::{ImageRef, LayerStack};
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Problems detected before a chain starts. Reported synchronously; the lane
/// is never touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("layer stack has {0} layer(s); blending needs at least 2")]
    TooFewLayers(usize),
    #[error("no working layer selected on the stack")]
    NoWorkingLayer,
}

/// A chain run that terminated without a finished composite.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("transform {step} ({transform}) failed: {source}")]
    Effect {
        step: usize,
        transform: &'static str,
        #[source]
        source: EffectError,
    },
}

/// Terminal outcome of one chain run.
#[derive(Debug)]
pub enum ChainOutcome {
    /// Every transform ran (or the result was already memoized).
    Complete(FinishedBlend),
    /// Cancellation was observed before a unit started; the stack is the
    /// original, unmodified one.
    Canceled { layers: Vec<ImageRef> },
}

pub type ChainResult = Result<ChainOutcome, ChainError>;

type Callback = Box<dyn FnOnce(ChainResult) + Send + 'static>;

/// The finished product of a chain: the processed working image and the layer
/// stack with it substituted in place.
#[derive(Debug, Clone)]
pub struct FinishedBlend {
    pub layers: Vec<ImageRef>,
    pub composite: ImageRef,
    /// True when this result was served from the memo instead of running the
    /// chain.
    pub memoized: bool,
}

impl FinishedBlend {
    /// Flatten the stack to a single image, bottom layer first, each upper
    /// layer alpha-composited on top. `None` for an empty stack.
    pub fn flatten(&self) -> Option<DynamicImage> {
        let (bottom, upper) = self.layers.split_last()?;
        let mut canvas = bottom.to_rgba8();
        for layer in upper.iter().rev() {
            image::imageops::overlay(&mut canvas, &layer.to_rgba8(), 0, 0);
        }
        Some(DynamicImage::ImageRgba8(canvas))
    }
}

/// State owned by one chain run, never by the set itself.
struct RunState {
    working: ImageRef,
    callback: Option<Callback>,
}

struct ChainRun {
    remaining: AtomicUsize,
    state: Mutex<RunState>,
    cancel: CancelToken,
}

/// One unit of work: apply one transform to the run's working image.
struct BlendUnit {
    run: Arc<ChainRun>,
    step: usize,
    transform: Transform,
    provider: Arc<dyn EffectProvider>,
    stack: LayerStack,
    memo: Arc<Mutex<Option<FinishedBlend>>>,
}

impl BlendUnit {
    fn execute(self) {
        let mut state = self.run.state.lock().unwrap();
        // A terminal outcome already fired for this run.
        if state.callback.is_none() {
            return;
        }

        // A concurrent run on the same set finished first; serve its result.
        if let Some(done) = memoized(&self.memo) {
            if let Some(callback) = state.callback.take() {
                drop(state);
                callback(Ok(ChainOutcome::Complete(done)));
            }
            return;
        }

        if self.run.cancel.is_canceled() {
            if let Some(callback) = state.callback.take() {
                drop(state);
                callback(Ok(ChainOutcome::Canceled {
                    layers: self.stack.layers().to_vec(),
                }));
            }
            return;
        }

        let input = Arc::clone(&state.working);
        drop(state);

        match self.provider.apply(&self.transform, &input) {
            Ok(output) => {
                let output = Arc::new(output);
                let mut state = self.run.state.lock().unwrap();
                state.working = Arc::clone(&output);
                let last = self.run.remaining.fetch_sub(1, Ordering::AcqRel) == 1;
                if last && let Some(callback) = state.callback.take() {
                    drop(state);
                    let done = publish(&self.memo, &self.stack, output);
                    callback(Ok(ChainOutcome::Complete(done)));
                }
            }
            Err(source) => {
                let mut state = self.run.state.lock().unwrap();
                if let Some(callback) = state.callback.take() {
                    drop(state);
                    callback(Err(ChainError::Effect {
                        step: self.step,
                        transform: self.transform.kind_name(),
                        source,
                    }));
                }
            }
        }
    }
}

/// Store the finished blend in the memo slot, keeping an earlier winner if a
/// concurrent run got there first.
fn publish(
    memo: &Mutex<Option<FinishedBlend>>,
    stack: &LayerStack,
    composite: ImageRef,
) -> FinishedBlend {
    let mut slot = memo.lock().unwrap();
    if let Some(existing) = slot.as_ref() {
        return existing.clone();
    }
    let done = FinishedBlend {
        layers: stack.substitute(Arc::clone(&composite)),
        composite,
        memoized: false,
    };
    *slot = Some(done.clone());
    done
}

fn memoized(memo: &Mutex<Option<FinishedBlend>>) -> Option<FinishedBlend> {
    memo.lock().unwrap().clone().map(|mut done| {
        done.memoized = true;
        done
    })
}

/// One layer stack, one lane, one memo slot.
pub struct BlendingSet {
    stack: LayerStack,
    lane: ExecutionLane,
    memo: Arc<Mutex<Option<FinishedBlend>>>,
}

impl BlendingSet {
    /// A fresh set for `stack`; `lane_name` labels the worker thread.
    pub fn new(stack: LayerStack, lane_name: &str) -> Self {
        Self {
            stack,
            lane: ExecutionLane::new(lane_name),
            memo: Arc::new(Mutex::new(None)),
        }
    }

    /// A set that is already finished: the memo holds `composite` substituted
    /// into `stack`. Used for chains that have nothing to run (for example a
    /// thumbnail preset with no transforms).
    pub fn preseeded(stack: LayerStack, composite: ImageRef, lane_name: &str) -> Self {
        let set = Self::new(stack, lane_name);
        publish(&set.memo, &set.stack, composite);
        set
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// The memoized result, if the chain has completed at least once.
    pub fn finished(&self) -> Option<FinishedBlend> {
        self.memo.lock().unwrap().clone()
    }

    /// Observability hook: true iff no unit is queued or running on this
    /// set's lane.
    pub fn is_idle(&self) -> bool {
        self.lane.is_idle()
    }

    /// Run `chain` against the working layer.
    ///
    /// Configuration problems are returned synchronously and nothing is
    /// enqueued. Otherwise `on_done` fires exactly once with the terminal
    /// outcome: the finished stack, an explicit error, or cancellation with
    /// the original layers. A memoized set completes immediately without
    /// touching the lane.
    pub fn run_chain(
        &self,
        chain: &[Transform],
        provider: &Arc<dyn EffectProvider>,
        cancel: &CancelToken,
        on_done: impl FnOnce(ChainResult) + Send + 'static,
    ) -> Result<(), ConfigError> {
        if let Some(done) = memoized(&self.memo) {
            on_done(Ok(ChainOutcome::Complete(done)));
            return Ok(());
        }

        let Some(working) = self.stack.working_image() else {
            return Err(ConfigError::NoWorkingLayer);
        };
        if self.stack.len() < 2 {
            return Err(ConfigError::TooFewLayers(self.stack.len()));
        }

        if chain.is_empty() {
            let done = publish(&self.memo, &self.stack, Arc::clone(working));
            on_done(Ok(ChainOutcome::Complete(done)));
            return Ok(());
        }

        let run = Arc::new(ChainRun {
            remaining: AtomicUsize::new(chain.len()),
            state: Mutex::new(RunState {
                working: Arc::clone(working),
                callback: Some(Box::new(on_done)),
            }),
            cancel: cancel.clone(),
        });

        for (step, transform) in chain.iter().copied().enumerate() {
            let unit = BlendUnit {
                run: Arc::clone(&run),
                step,
                transform,
                provider: Arc::clone(provider),
                stack: self.stack.clone(),
                memo: Arc::clone(&self.memo),
            };
            self.lane.submit(move || unit.execute());
        }
        Ok(())
    }
}
