//! Single-worker execution lanes.
//!
//! An [`ExecutionLane`] runs submitted jobs strictly one at a time, in
//! submission order, on its own named worker thread. Every [`BlendingSet`]
//! owns one lane, which is what makes a transform chain sequential while
//! letting independent chains (other models, or a model's thumbnail vs.
//! full-resolution set) run in parallel with each other.
//!
//! Lanes are deliberately dumb: no priorities, no work stealing, no shared
//! state between lanes. Completion of a chain is *not* inferred from lane
//! idleness — that is the job of the per-run counter in [`crate::blending`] —
//! but [`ExecutionLane::is_idle`] is kept as an observability hook.
//!
//! [`BlendingSet`]: crate::blending::BlendingSet

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A FIFO queue with exactly one worker thread.
///
/// Dropping the lane closes the queue; jobs already submitted still run, and
/// the worker is joined before `drop` returns.
pub struct ExecutionLane {
    sender: Option<mpsc::Sender<Job>>,
    pending: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
}

impl ExecutionLane {
    /// Spawn a lane whose worker thread carries `name` (visible in debuggers
    /// and thread dumps).
    pub fn new(name: &str) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let pending = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pending);

        let worker = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                    counter.fetch_sub(1, Ordering::AcqRel);
                }
            })
            .expect("failed to spawn lane worker thread");

        Self {
            sender: Some(sender),
            pending,
            worker: Some(worker),
        }
    }

    /// Enqueue one unit of work. Units run in submission order, never
    /// concurrently with each other on this lane.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if let Some(sender) = &self.sender
            && sender.send(Box::new(job)).is_err()
        {
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// True iff no unit is queued or currently running.
    pub fn is_idle(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0
    }
}

impl Drop for ExecutionLane {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Cooperative cancellation flag shared between a caller and in-flight runs.
///
/// Units check the token before they start; a unit that observes cancellation
/// never invokes the effect provider, and the chain completes with the
/// original, unmodified layer stack.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
