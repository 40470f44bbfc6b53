//! Terminal output: the progress bar and the end-of-run summary.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use figma_images::{ProgressReporter, ProgressSnapshot, RunReport};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}";

/// Creates the progress bar and a reporter that drives it.
///
/// Returns `None` when progress display is disabled. The bar starts with a
/// zero length; the first snapshot sets the real total.
pub(crate) fn progress_reporter(enabled: bool) -> Option<(ProgressBar, ProgressReporter)> {
    if !enabled {
        return None;
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let handle = bar.clone();
    let reporter: ProgressReporter = Arc::new(move |snapshot: &ProgressSnapshot| {
        handle.set_length(snapshot.total_tasks as u64);
        handle.set_position(snapshot.completed as u64);
        handle.set_message(status_line(snapshot));
    });

    Some((bar, reporter))
}

fn status_line(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{} downloaded, {} skipped, {} failed",
        snapshot.successful, snapshot.skipped, snapshot.failed
    )
}

/// Writes the human-readable summary, listing each failure.
pub(crate) fn write_summary(out: &mut impl Write, report: &RunReport) -> Result<()> {
    let snapshot = &report.snapshot;
    if snapshot.total_tasks == 0 {
        writeln!(out, "No images to download.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{} images: {}",
        snapshot.total_tasks,
        status_line(snapshot)
    )?;
    for failure in &report.failures {
        writeln!(
            out,
            "  failed {}: {}",
            failure.task.base_path().display(),
            failure.error
        )?;
    }
    Ok(())
}

/// Writes the final snapshot as a single JSON line.
pub(crate) fn write_json(out: &mut impl Write, snapshot: &ProgressSnapshot) -> Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    writeln!(out)?;
    Ok(())
}
