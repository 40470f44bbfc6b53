//! Per-task fetch pipeline: existence probe, then download.
//!
//! The engine drives any [`Fetch`] implementation; [`ImageFetcher`] is the
//! production one. A fetch never panics on I/O or network problems, it
//! returns a [`DownloadError`] that the engine records against the task.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::client::HttpClient;
use super::error::DownloadError;
use super::filename::probe_existing;
use super::progress::DownloadStatus;
use super::task::DownloadTask;

/// Successful outcome of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// The image was written to this path.
    Downloaded(PathBuf),
    /// A file already existed at this path; no request was issued.
    Skipped(PathBuf),
}

impl Fetched {
    /// Path of the file on disk.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Downloaded(path) | Self::Skipped(path) => path,
        }
    }
}

/// Maps a fetch result to the status counted by the engine.
#[must_use]
pub fn status_of(result: &Result<Fetched, DownloadError>) -> DownloadStatus {
    match result {
        Ok(Fetched::Downloaded(_)) => DownloadStatus::Downloaded,
        Ok(Fetched::Skipped(_)) => DownloadStatus::Skipped,
        Err(_) => DownloadStatus::Failed,
    }
}

/// Runs the full pipeline for one task.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `task`, returning where the image ended up.
    async fn fetch(&self, task: &DownloadTask) -> Result<Fetched, DownloadError>;
}

/// Probes for an existing file, downloading only when none is found.
#[derive(Debug, Clone, Default)]
pub struct ImageFetcher {
    client: HttpClient,
}

impl ImageFetcher {
    /// Creates a fetcher that downloads through `client`.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for ImageFetcher {
    async fn fetch(&self, task: &DownloadTask) -> Result<Fetched, DownloadError> {
        if let Some(existing) = probe_existing(&task.base_path()).await {
            debug!(image_ref = %task.image_ref, path = %existing.display(), "already on disk; skipping");
            return Ok(Fetched::Skipped(existing));
        }

        self.client.download_image(task).await.map(Fetched::Downloaded)
    }
}
