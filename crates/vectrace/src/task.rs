//! Background execution of a single trace job.
//!
//! The job is moved onto a worker thread and the result comes back over a
//! channel. Cancellation is not cooperative: the running stage finishes and
//! its result is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use vt_core::{Image, Rgba};

use crate::config::TraceSettings;
use crate::pipeline::{StrokeTrace, trace, vectorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// [`trace`]: strokes plus their SVG.
    Strokes,
    /// [`vectorize`]: polyline SVG scaled to the output resolution.
    Polyline,
}

#[derive(Debug, Clone)]
pub struct TraceJob {
    pub buffer: Image<Rgba>,
    pub settings: TraceSettings,
    pub kind: JobKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Strokes(StrokeTrace),
    Polyline(String),
}

#[derive(Debug)]
pub enum TaskStatus {
    Pending,
    /// `None` when the buffer was empty, the task was cancelled or the worker
    /// died.
    Finished(Option<TaskOutput>),
}

pub struct TraceTask {
    cancelled: Arc<AtomicBool>,
    rx: Receiver<Option<TaskOutput>>,
    worker: Option<JoinHandle<()>>,
}

impl TraceTask {
    pub fn spawn(job: TraceJob) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let flag = Arc::clone(&cancelled);

        let worker = thread::spawn(move || {
            let view = job.buffer.as_view();
            let out = match job.kind {
                JobKind::Strokes => trace(&view, &job.settings).map(TaskOutput::Strokes),
                JobKind::Polyline => vectorize(&view, &job.settings).map(TaskOutput::Polyline),
            };

            if flag.load(Ordering::Acquire) {
                tracing::debug!(kind = ?job.kind, "trace task cancelled, result dropped");
                return;
            }
            // receiver gone means nobody wants the result
            let _ = tx.send(out);
        });

        Self {
            cancelled,
            rx,
            worker: Some(worker),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Non-blocking poll.
    pub fn try_take(&mut self) -> TaskStatus {
        match self.rx.try_recv() {
            Ok(out) => {
                self.join();
                TaskStatus::Finished(self.unless_cancelled(out))
            }
            Err(TryRecvError::Empty) => TaskStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                self.join();
                TaskStatus::Finished(None)
            }
        }
    }

    /// Blocks until the worker is done.
    pub fn wait(mut self) -> Option<TaskOutput> {
        let out = self.rx.recv().ok().flatten();
        self.join();
        self.unless_cancelled(out)
    }

    fn unless_cancelled(&self, out: Option<TaskOutput>) -> Option<TaskOutput> {
        if self.is_cancelled() { None } else { out }
    }

    fn join(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.join().is_err() {
            tracing::warn!("trace worker panicked");
        }
    }
}
