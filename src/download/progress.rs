//! Progress counters and the observer callback.

use std::sync::Arc;

use serde::Serialize;

/// Final state of one download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// The image was fetched and written to disk.
    Downloaded,
    /// A file for this task already existed; no request was made.
    Skipped,
    /// The fetch or the write failed.
    Failed,
}

/// Running totals for a batch, as seen by the progress observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Number of tasks scheduled; fixed for the whole run.
    pub total_tasks: usize,
    /// Tasks that have finished, whatever their status.
    pub completed: usize,
    /// Tasks that ended [`DownloadStatus::Downloaded`].
    pub successful: usize,
    /// Tasks that ended [`DownloadStatus::Skipped`].
    pub skipped: usize,
    /// Tasks that ended [`DownloadStatus::Failed`].
    pub failed: usize,
    /// `completed / total_tasks * 100`.
    pub percentage: f64,
}

/// Observer invoked once per finished task with the updated totals.
pub type ProgressReporter = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Counter set owned by the engine's coordinating loop.
///
/// Only one completion is recorded at a time, so every snapshot satisfies
/// `completed == successful + skipped + failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTracker {
    total_tasks: usize,
    successful: usize,
    skipped: usize,
    failed: usize,
}

impl ProgressTracker {
    /// Creates a tracker for `total_tasks` tasks with all counters at zero.
    #[must_use]
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            successful: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Records one finished task and returns the resulting snapshot.
    pub fn record(&mut self, status: DownloadStatus) -> ProgressSnapshot {
        match status {
            DownloadStatus::Downloaded => self.successful += 1,
            DownloadStatus::Skipped => self.skipped += 1,
            DownloadStatus::Failed => self.failed += 1,
        }
        self.snapshot()
    }

    /// Number of finished tasks.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.successful + self.skipped + self.failed
    }

    /// Current totals with the computed percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let completed = self.completed();
        let percentage = if self.total_tasks == 0 {
            0.0
        } else {
            completed as f64 / self.total_tasks as f64 * 100.0
        };
        ProgressSnapshot {
            total_tasks: self.total_tasks,
            completed,
            successful: self.successful,
            skipped: self.skipped,
            failed: self.failed,
            percentage,
        }
    }

    /// Totals at the end of a run; the percentage is always 100.
    #[must_use]
    pub fn finish(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            percentage: 100.0,
            ..self.snapshot()
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_at_zero() {
        let tracker = ProgressTracker::new(4);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.total_tasks, 4);
        assert_eq!(snapshot.completed, 0);
        assert_eq!(snapshot.percentage, 0.0);
    }

    #[test]
    fn test_tracker_record_increments_exactly_one_bucket() {
        let mut tracker = ProgressTracker::new(4);

        let s = tracker.record(DownloadStatus::Downloaded);
        assert_eq!((s.successful, s.skipped, s.failed), (1, 0, 0));

        let s = tracker.record(DownloadStatus::Skipped);
        assert_eq!((s.successful, s.skipped, s.failed), (1, 1, 0));

        let s = tracker.record(DownloadStatus::Failed);
        assert_eq!((s.successful, s.skipped, s.failed), (1, 1, 1));
        assert_eq!(s.completed, 3);
        assert_eq!(s.percentage, 75.0);
    }

    #[test]
    fn test_tracker_snapshots_keep_completed_invariant() {
        let mut tracker = ProgressTracker::new(9);
        let statuses = [
            DownloadStatus::Failed,
            DownloadStatus::Downloaded,
            DownloadStatus::Skipped,
        ];
        for status in statuses.iter().cycle().take(9) {
            let s = tracker.record(*status);
            assert_eq!(s.completed, s.successful + s.skipped + s.failed);
        }
        assert_eq!(tracker.snapshot().percentage, 100.0);
    }

    #[test]
    fn test_tracker_finish_forces_full_percentage_for_empty_run() {
        let tracker = ProgressTracker::new(0);
        assert_eq!(tracker.snapshot().percentage, 0.0);

        let last = tracker.finish();
        assert_eq!(last.total_tasks, 0);
        assert_eq!(last.completed, 0);
        assert_eq!(last.percentage, 100.0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut tracker = ProgressTracker::new(1);
        tracker.record(DownloadStatus::Downloaded);

        let json = serde_json::to_value(tracker.finish()).unwrap_or_default();
        assert_eq!(json["totalTasks"], 1);
        assert_eq!(json["successful"], 1);
        assert_eq!(json["percentage"], 100.0);
    }
}
