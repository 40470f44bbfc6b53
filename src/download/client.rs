//! HTTP client wrapper for downloading images.
//!
//! This module provides the `HttpClient` struct which streams one image to
//! disk with explicit timeouts and structured errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::extension_from_content_type;
use super::task::DownloadTask;
use crate::user_agent;

/// Connect and total-request timeouts for an HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Time allowed to establish a connection.
    pub connect: Duration,
    /// Time allowed for the whole request, body included.
    pub read: Duration,
}

impl HttpTimeouts {
    /// Builds timeouts from whole seconds.
    #[must_use]
    pub fn from_secs(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect: Duration::from_secs(connect_secs),
            read: Duration::from_secs(read_secs),
        }
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self::from_secs(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }
}

/// HTTP client for downloading images.
///
/// Create once and clone freely; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Request timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(HttpTimeouts::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be initialized.
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.read)
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Downloads the task's image and writes it under its content-type extension.
    ///
    /// Creates `task.target_dir` if needed and overwrites any file already at
    /// the final path. Does not check for existing files under other
    /// extensions; see [`super::ImageFetcher`] for that.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Creating the directory or writing the file fails
    #[instrument(skip(self, task), fields(image_ref = %task.image_ref, url = %task.url))]
    pub async fn download_image(&self, task: &DownloadTask) -> Result<PathBuf, DownloadError> {
        debug!("starting download");

        Url::parse(&task.url).map_err(|_| DownloadError::invalid_url(task.url.clone()))?;

        let response = self
            .client
            .get(&task.url)
            .send()
            .await
            .map_err(|e| DownloadError::network(task.url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(task.url.clone(), status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let extension = extension_from_content_type(content_type);
        let file_path = task.output_path(extension);

        tokio::fs::create_dir_all(&task.target_dir)
            .await
            .map_err(|e| DownloadError::io(task.target_dir.clone(), e))?;

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, &task.url, &file_path).await;
        if stream_result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes = stream_result?;

        info!(path = %file_path.display(), bytes, "download complete");
        Ok(file_path)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
