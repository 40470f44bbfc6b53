//! Concurrent image download engine.
//!
//! This module turns resolved image references into files on disk:
//! tasks are built from the tree walk and the URL map, then run through a
//! bounded worker pool that probes for existing files before streaming.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Extension chosen from the response `Content-Type`
//! - Skip-if-exists under any known image extension
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use figma_images::download::{DownloadEngine, DownloadTask, ImageFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks = vec![DownloadTask {
//!     image_ref: "abcdef1234567890".to_string(),
//!     url: "https://cdn.example.com/abc".to_string(),
//!     target_dir: "dist/images/Page_1".into(),
//!     base_filename: "Icon_abcdef12".to_string(),
//! }];
//! let engine = DownloadEngine::new(10)?;
//! let snapshot = engine.run(tasks, Arc::new(ImageFetcher::default()), None).await;
//! println!("{} of {} done", snapshot.completed, snapshot.total_tasks);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod fetcher;
mod filename;
mod progress;
mod task;

pub use client::{HttpClient, HttpTimeouts};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY,
    READ_TIMEOUT_SECS,
};
pub use engine::{DownloadEngine, EngineError, RunReport, TaskFailure};
pub use error::DownloadError;
pub use fetcher::{Fetch, Fetched, ImageFetcher, status_of};
pub use filename::{
    KNOWN_EXTENSIONS, base_filename, extension_from_content_type, probe_existing, sanitize_name,
};
pub use progress::{DownloadStatus, ProgressReporter, ProgressSnapshot, ProgressTracker};
pub use task::{DownloadTask, build_tasks};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
