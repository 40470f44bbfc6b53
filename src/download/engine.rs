//! Download engine for concurrent image downloads.
//!
//! This module provides the `DownloadEngine` which runs a [`Fetch`]
//! implementation over a batch of tasks using a semaphore-based concurrency
//! limit, and aggregates the per-task outcomes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use figma_images::download::{DownloadEngine, HttpClient, ImageFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(10)?;
//! let fetcher = Arc::new(ImageFetcher::new(HttpClient::new()));
//! let snapshot = engine.run(Vec::new(), fetcher, None).await;
//! println!("Downloaded: {}, Skipped: {}, Failed: {}", snapshot.successful, snapshot.skipped, snapshot.failed);
//! # Ok(())
//! # }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::error::DownloadError;
use super::fetcher::{Fetch, Fetched, status_of};
use super::progress::{DownloadStatus, ProgressReporter, ProgressSnapshot, ProgressTracker};
use super::task::DownloadTask;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// A task that ended in failure, with the reason.
#[derive(Debug)]
pub struct TaskFailure {
    /// The task that failed.
    pub task: DownloadTask,
    /// Why it failed.
    pub error: DownloadError,
}

/// Result of a complete batch run.
#[derive(Debug)]
pub struct RunReport {
    /// Final totals; `percentage` is always 100.
    pub snapshot: ProgressSnapshot,
    /// One entry per failed task, in completion order.
    pub failures: Vec<TaskFailure>,
}

/// Download engine for concurrent image downloads.
///
/// # Concurrency Model
///
/// - Each task runs in its own Tokio task
/// - A semaphore permit is held for the whole fetch (probe, request, write)
/// - Permits are released automatically when a fetch completes (RAII)
/// - A single coordinating loop drains completions, owns the counters and
///   calls the progress reporter, so counter updates never interleave
///
/// # Failure Containment
///
/// A failed or panicking fetch is counted as failed and recorded in the
/// [`RunReport`]; it never stops the remaining tasks.
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates a new download engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use figma_images::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(10).unwrap();
    /// assert_eq!(engine.concurrency(), 10);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every task and returns the final totals.
    ///
    /// See [`run_detailed`](Self::run_detailed) for the per-task failure list.
    pub async fn run(
        &self,
        tasks: Vec<DownloadTask>,
        fetcher: Arc<dyn Fetch>,
        reporter: Option<&ProgressReporter>,
    ) -> ProgressSnapshot {
        self.run_detailed(tasks, fetcher, reporter).await.snapshot
    }

    /// Runs every task with at most `concurrency` fetches in flight.
    ///
    /// The reporter, when given, is called once per finished task with the
    /// updated totals. Completion order is not submission order. The
    /// returned snapshot always reports `percentage == 100.0`, including for
    /// an empty batch.
    #[instrument(skip_all, fields(total = tasks.len(), concurrency = self.concurrency))]
    pub async fn run_detailed(
        &self,
        tasks: Vec<DownloadTask>,
        fetcher: Arc<dyn Fetch>,
        reporter: Option<&ProgressReporter>,
    ) -> RunReport {
        let mut tracker = ProgressTracker::new(tasks.len());
        let mut failures = Vec::new();
        let mut reported = vec![false; tasks.len()];
        let mut join_set = JoinSet::new();

        info!("starting download batch");

        for (index, task) in tasks.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&self.semaphore);
            let fetcher = Arc::clone(&fetcher);

            join_set.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    // Permit is dropped when this arm exits (RAII)
                    Ok(_permit) => AssertUnwindSafe(fetcher.fetch(&task))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| {
                            Err(DownloadError::task_aborted(&task.image_ref, "fetch panicked"))
                        }),
                    Err(_) => Err(DownloadError::task_aborted(
                        &task.image_ref,
                        "semaphore closed",
                    )),
                };
                (index, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let (index, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // Lost tasks are matched up after the loop.
                    warn!(error = %e, "download task did not complete");
                    continue;
                }
            };
            reported[index] = true;

            let snapshot = tracker.record(status_of(&result));
            let task = &tasks[index];
            match result {
                Ok(Fetched::Downloaded(path)) => {
                    debug!(image_ref = %task.image_ref, path = %path.display(), "downloaded");
                }
                Ok(Fetched::Skipped(path)) => {
                    debug!(image_ref = %task.image_ref, path = %path.display(), "skipped existing");
                }
                Err(error) => {
                    warn!(image_ref = %task.image_ref, url = %task.url, error = %error, "download failed");
                    failures.push(TaskFailure {
                        task: task.clone(),
                        error,
                    });
                }
            }

            if let Some(reporter) = reporter {
                reporter(&snapshot);
            }
        }

        for (index, task) in tasks.into_iter().enumerate() {
            if reported[index] {
                continue;
            }
            let snapshot = tracker.record(DownloadStatus::Failed);
            failures.push(TaskFailure {
                error: DownloadError::task_aborted(&task.image_ref, "task was cancelled"),
                task,
            });
            if let Some(reporter) = reporter {
                reporter(&snapshot);
            }
        }

        let snapshot = tracker.finish();
        info!(
            successful = snapshot.successful,
            skipped = snapshot.skipped,
            failed = snapshot.failed,
            total = snapshot.total_tasks,
            "download batch complete"
        );

        RunReport { snapshot, failures }
    }
}
