use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::ErrorKind;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { uploads: usize },
    ThrottleWaited { duration: Duration },
    UploadStarted { index: usize, bytes: usize },
    /// `outcome` is the row count on success or the error kind on failure.
    UploadFinished { index: usize, outcome: Result<usize, ErrorKind> },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Forwards execution events to the [`log`] facade at debug level.
#[derive(Default)]
pub struct LogExecutionObserver;

impl ExecutionObserver for LogExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunFinished { metrics, .. } => {
                log::info!(target: "tabular_profile::execution", "run finished: {metrics}")
            }
            other => log::debug!(target: "tabular_profile::execution", "{other:?}"),
        }
    }
}

/// Real-time metrics for a batch run.
///
/// The engine updates these counters during execution; callers can snapshot them at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    uploads_started: AtomicU64,
    uploads_succeeded: AtomicU64,
    uploads_failed: AtomicU64,
    bytes_processed: AtomicU64,
    rows_processed: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_uploads: AtomicUsize,
    max_active_uploads: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            uploads_started: AtomicU64::new(0),
            uploads_succeeded: AtomicU64::new(0),
            uploads_failed: AtomicU64::new(0),
            bytes_processed: AtomicU64::new(0),
            rows_processed: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_uploads: AtomicUsize::new(0),
            max_active_uploads: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);

        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.uploads_started.store(0, Ordering::SeqCst);
        self.uploads_succeeded.store(0, Ordering::SeqCst);
        self.uploads_failed.store(0, Ordering::SeqCst);
        self.bytes_processed.store(0, Ordering::SeqCst);
        self.rows_processed.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_uploads.store(0, Ordering::SeqCst);
        self.max_active_uploads.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(duration_ns(elapsed), Ordering::SeqCst);
    }

    pub fn on_upload_start(&self, bytes: usize) {
        let _ = self.uploads_started.fetch_add(1, Ordering::SeqCst);
        let _ = self.bytes_processed.fetch_add(bytes as u64, Ordering::SeqCst);
        let now = self.active_uploads.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active_uploads, now);
    }

    pub fn on_upload_end(&self, outcome: Result<usize, ErrorKind>) {
        match outcome {
            Ok(rows) => {
                let _ = self.uploads_succeeded.fetch_add(1, Ordering::SeqCst);
                let _ = self.rows_processed.fetch_add(rows as u64, Ordering::SeqCst);
            }
            Err(_) => {
                let _ = self.uploads_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active_uploads.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        let _ = self.throttle_wait_ns.fetch_add(duration_ns(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            uploads_started: self.uploads_started.load(Ordering::SeqCst),
            uploads_succeeded: self.uploads_succeeded.load(Ordering::SeqCst),
            uploads_failed: self.uploads_failed.load(Ordering::SeqCst),
            bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            rows_processed: self.rows_processed.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_uploads: self.max_active_uploads.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ns(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    let _ = dst.fetch_max(now, Ordering::SeqCst);
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub uploads_started: u64,
    pub uploads_succeeded: u64,
    pub uploads_failed: u64,
    pub bytes_processed: u64,
    pub rows_processed: u64,
    pub throttle_wait: Duration,
    pub max_active_uploads: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, uploads={}/{} (failed={}), bytes={}, rows={}, \
             max_active_uploads={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.uploads_succeeded,
            self.uploads_started,
            self.uploads_failed,
            self.bytes_processed,
            self.rows_processed,
            self.max_active_uploads,
            self.throttle_wait,
            self.elapsed
        )
    }
}
