//! Document sources: where the node tree and the image URL map come from.
//!
//! # Architecture
//!
//! - [`DocumentSource`] - Async trait the pipeline calls for both lookups
//! - [`FigmaClient`] - Implementation backed by the Figma REST API
//! - [`ApiError`] - Failures of either lookup; always fatal to a run
//!
//! # Example
//!
//! ```no_run
//! use figma_images::api::{DocumentSource, FigmaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FigmaClient::new("figd_token")?;
//! let root = client.fetch_document_tree("FILE_KEY").await?;
//! let urls = client.fetch_image_urls("FILE_KEY").await?;
//! println!("{} has {} image URLs", root.name, urls.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod figma;

pub use error::ApiError;
pub use figma::{API_CONNECT_TIMEOUT_SECS, API_READ_TIMEOUT_SECS, DEFAULT_API_BASE, FigmaClient};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::document::DocumentNode;

/// Supplies a document tree and the download URLs of its image fills.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the root node of the document `file_key`.
    async fn fetch_document_tree(&self, file_key: &str) -> Result<DocumentNode, ApiError>;

    /// Fetches the `image_ref -> url` map for the document `file_key`.
    ///
    /// References the service could not resolve are absent from the map.
    async fn fetch_image_urls(&self, file_key: &str)
    -> Result<HashMap<String, String>, ApiError>;
}
