//! Batch execution of independent uploads.
//!
//! Each upload is summarized by its own [`crate::pipeline::parse_and_summarize`] call; the engine
//! only schedules those calls on a rayon pool. Nothing is shared between uploads, so one failure
//! cannot affect another.
//!
//! - Parallel execution, results in input order
//! - Resource limits / throttling (uploads in flight)
//! - Real-time metrics + observer hooks for monitoring

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::error::IngestionResult;
use crate::pipeline::{SummaryOptions, SummaryReport, Upload};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    LogExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on uploads summarized at the same time.
    ///
    /// This is an additional throttle on top of `num_threads`, useful to cap peak memory since
    /// every upload is fully materialized.
    pub max_in_flight: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            max_in_flight: n.max(1),
        }
    }
}

/// Runs many independent uploads in parallel.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `max_in_flight == 0` or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        assert!(opts.max_in_flight > 0, "max_in_flight must be > 0");
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Summarize every upload; `result[i]` belongs to `uploads[i]`.
    pub fn summarize_batch(
        &self,
        uploads: &[Upload],
        options: &SummaryOptions,
    ) -> Vec<IngestionResult<SummaryReport>> {
        self.pool.install(|| self.summarize_batch_impl(uploads, options))
    }

    fn summarize_batch_impl(
        &self,
        uploads: &[Upload],
        options: &SummaryOptions,
    ) -> Vec<IngestionResult<SummaryReport>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { uploads: uploads.len() });

        let sem = Semaphore::new(self.opts.max_in_flight);

        let results = uploads
            .par_iter()
            .enumerate()
            .map(|(index, upload)| {
                let (_permit, waited) = sem.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_upload_start(upload.bytes.len());
                self.emit(ExecutionEvent::UploadStarted {
                    index,
                    bytes: upload.bytes.len(),
                });

                let result = upload.run(options);
                let outcome = result.as_ref().map(|r| r.rows).map_err(|e| e.kind());

                self.emit(ExecutionEvent::UploadFinished { index, outcome });
                self.metrics.on_upload_end(outcome);
                result
            })
            .collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        results
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionEngine, ExecutionOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::error::IngestionError;
    use crate::execution::{ExecutionEvent, ExecutionObserver};
    use crate::pipeline::{SummaryOptions, Upload};

    fn csv_upload(i: usize) -> Upload {
        let mut body = String::from("id,label\n");
        for r in 0..=i {
            body.push_str(&format!("{r},row{r}\n"));
        }
        Upload::new(body.into_bytes(), format!("u{i}.csv"))
    }

    #[test]
    fn results_keep_input_order() {
        let uploads: Vec<Upload> = (0..16).map(csv_upload).collect();
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(4),
            max_in_flight: 4,
        })
        .unwrap();

        let results = engine.summarize_batch(&uploads, &SummaryOptions::default());
        assert_eq!(results.len(), 16);
        for (i, r) in results.iter().enumerate() {
            let report = r.as_ref().unwrap();
            assert_eq!(report.filename, format!("u{i}.csv"));
            assert_eq!(report.rows, i + 1);
        }
    }

    #[test]
    fn a_failing_upload_does_not_affect_others() {
        let uploads = vec![
            csv_upload(2),
            Upload::new(Vec::new(), "empty.csv"),
            Upload::new(&b"{\"a\":1}\n{oops\n"[..], "bad.jsonl"),
            csv_upload(3),
        ];
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(2),
            max_in_flight: 2,
        })
        .unwrap();
        let metrics = engine.metrics();

        let results = engine.summarize_batch(&uploads, &SummaryOptions::default());
        assert_eq!(results[0].as_ref().unwrap().rows, 3);
        assert!(matches!(results[1], Err(IngestionError::EmptyInput)));
        assert!(matches!(results[2], Err(IngestionError::MalformedRecord { line: 2, .. })));
        assert_eq!(results[3].as_ref().unwrap().rows, 4);

        let snap = metrics.snapshot();
        assert_eq!(snap.uploads_started, 4);
        assert_eq!(snap.uploads_succeeded, 2);
        assert_eq!(snap.uploads_failed, 2);
        assert_eq!(snap.rows_processed, 7);
        assert!(snap.elapsed.is_some());
    }

    struct ConcurrencyObserver {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl ExecutionObserver for ConcurrencyObserver {
        fn on_event(&self, event: &ExecutionEvent) {
            match event {
                ExecutionEvent::UploadStarted { .. } => {
                    let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                    self.max_active.fetch_max(now, Ordering::SeqCst);
                }
                ExecutionEvent::UploadFinished { .. } => {
                    let _ = self.active.fetch_sub(1, Ordering::SeqCst);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn max_in_flight_throttles_concurrency() {
        let uploads: Vec<Upload> = (0..40).map(|i| csv_upload(i * 20)).collect();
        let observer = Arc::new(ConcurrencyObserver {
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        });
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(4),
            max_in_flight: 1,
        })
        .unwrap()
        .with_observer(obs_trait);

        let results = engine.summarize_batch(&uploads, &SummaryOptions::default());
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(observer.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(engine.metrics().snapshot().max_active_uploads, 1);
    }
}
