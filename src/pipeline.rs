//! One-call entry point: fetch the document, resolve images, download them.
//!
//! ```no_run
//! use figma_images::{DownloadRequest, download_images};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = DownloadRequest::new("figd_token", "FILE_KEY")
//!     .with_output_dir("dist/images")
//!     .with_concurrency(16);
//! let report = download_images(request).await?;
//! println!("{} downloaded, {} failed", report.snapshot.successful, report.snapshot.failed);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiError, DEFAULT_API_BASE, DocumentSource, FigmaClient};
use crate::document::walk;
use crate::download::{
    DEFAULT_CONCURRENCY, DownloadEngine, EngineError, HttpClient, HttpTimeouts, ImageFetcher,
    ProgressReporter, RunReport, build_tasks,
};

/// Default directory images are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "dist/images";

/// Errors that stop a run before any image is scheduled.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document tree or the image URL map could not be fetched.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The engine rejected the configuration.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The image download client could not be built.
    #[error("failed to build download client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Everything one run needs.
#[derive(Clone)]
pub struct DownloadRequest {
    /// Figma personal access token.
    pub credential: String,
    /// Figma file key.
    pub document_id: String,
    /// Root of the mirrored directory tree.
    pub output_dir: PathBuf,
    /// Maximum downloads in flight (1-100).
    pub concurrency: usize,
    /// API base URL; `None` means [`DEFAULT_API_BASE`].
    pub api_base: Option<String>,
    /// Called once per finished task.
    pub on_progress: Option<ProgressReporter>,
    /// Timeouts for the image downloads.
    pub timeouts: HttpTimeouts,
}

impl DownloadRequest {
    /// Creates a request with default output directory, concurrency and timeouts.
    pub fn new(credential: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            document_id: document_id.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            api_base: None,
            on_progress: None,
            timeouts: HttpTimeouts::default(),
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Installs a progress observer.
    #[must_use]
    pub fn with_progress(mut self, reporter: ProgressReporter) -> Self {
        self.on_progress = Some(reporter);
        self
    }

    /// Sets the image download timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

impl std::fmt::Debug for DownloadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("document_id", &self.document_id)
            .field("output_dir", &self.output_dir)
            .field("concurrency", &self.concurrency)
            .field("api_base", &self.api_base)
            .field("on_progress", &self.on_progress.is_some())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

/// Downloads every image of a Figma file through the REST API.
///
/// # Errors
///
/// Returns [`PipelineError`] if the configuration is invalid or either API
/// call fails. Per-image failures are not errors; they are counted in the
/// returned [`RunReport`].
pub async fn download_images(request: DownloadRequest) -> Result<RunReport, PipelineError> {
    let api_base = request.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
    let source = FigmaClient::with_base_url(&request.credential, api_base)?;
    download_images_with_source(&source, request).await
}

/// Downloads every image of `request.document_id` as described by `source`.
///
/// `request.credential` and `request.api_base` are not used; `source` is
/// expected to be configured already.
///
/// # Errors
///
/// See [`download_images`].
#[instrument(skip_all, fields(document_id = %request.document_id, output_dir = %request.output_dir.display()))]
pub async fn download_images_with_source(
    source: &dyn DocumentSource,
    request: DownloadRequest,
) -> Result<RunReport, PipelineError> {
    let engine = DownloadEngine::new(request.concurrency)?;
    let client = HttpClient::with_timeouts(request.timeouts).map_err(PipelineError::HttpClient)?;

    let (root, urls) = tokio::try_join!(
        source.fetch_document_tree(&request.document_id),
        source.fetch_image_urls(&request.document_id),
    )?;

    let references = walk(&root, &[]);
    let tasks = build_tasks(&references, &urls, &request.output_dir);
    info!(
        references = references.len(),
        resolved_urls = urls.len(),
        tasks = tasks.len(),
        "download tasks prepared"
    );

    let fetcher = Arc::new(ImageFetcher::new(client));
    Ok(engine
        .run_detailed(tasks, fetcher, request.on_progress.as_ref())
        .await)
}
