//! Figma Images Core Library
//!
//! This library pulls the image fills referenced inside a Figma document tree
//! and writes them to a local directory tree that mirrors the document
//! hierarchy. Images already present on disk are skipped.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`api`] - Document source trait and the Figma REST client
//! - [`document`] - Document tree model and the image reference walker
//! - [`download`] - Task building, fetching and the bounded-concurrency engine
//! - [`pipeline`] - One-call entry point tying the pieces together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod document;
pub mod download;
pub mod pipeline;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiError, DEFAULT_API_BASE, DocumentSource, FigmaClient};
pub use document::{DocumentNode, Fill, ImageReference, walk};
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadStatus, DownloadTask,
    EngineError, Fetch, Fetched, HttpClient, ImageFetcher, ProgressReporter, ProgressSnapshot,
    RunReport, TaskFailure, build_tasks,
};
pub use pipeline::{DownloadRequest, PipelineError, download_images, download_images_with_source};
