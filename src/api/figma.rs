//! Figma REST API client.
//!
//! Two endpoints are used:
//! - `GET {base}/files/{key}` for the node tree
//! - `GET {base}/files/{key}/images` for the fill image URLs
//!
//! Both authenticate with the `X-Figma-Token` header.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, DocumentSource};
use crate::document::DocumentNode;
use crate::user_agent;

/// Default Figma REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";

/// Connect timeout for API calls (10 seconds).
pub const API_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout for API calls (60 seconds); file bodies can be large.
pub const API_READ_TIMEOUT_SECS: u64 = 60;

const TOKEN_HEADER: &str = "x-figma-token";

#[derive(Debug, Deserialize)]
struct FileResponse {
    document: DocumentNode,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    meta: ImagesMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ImagesMeta {
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

/// [`DocumentSource`] backed by the Figma REST API.
#[derive(Clone)]
pub struct FigmaClient {
    client: Client,
    base_url: String,
}

impl FigmaClient {
    /// Creates a client against [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the token is not a valid header value or the
    /// HTTP client cannot be built.
    #[instrument(skip_all)]
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_API_BASE)
    }

    /// Creates a client against a custom base URL (for testing with wiremock).
    ///
    /// A trailing slash on `base_url` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBase`] unless `base_url` is an absolute
    /// http(s) URL, plus the errors of [`new`](Self::new).
    #[instrument(skip(token))]
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|_| ApiError::InvalidBase {
            base: base_url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBase {
                base: base_url.to_string(),
            });
        }

        let mut token_value =
            HeaderValue::from_str(token).map_err(|_| ApiError::InvalidCredential)?;
        token_value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(API_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(API_READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_api_user_agent())
            .default_headers(headers)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn file_url(&self, file_key: &str) -> String {
        format!("{}/files/{}", self.base_url, urlencoding::encode(file_key))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(api_url = %url, "calling Figma API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Figma API error");
            return Err(ApiError::from_status(url, status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| ApiError::decode(url, e))
    }
}

impl std::fmt::Debug for FigmaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigmaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentSource for FigmaClient {
    #[instrument(skip(self))]
    async fn fetch_document_tree(&self, file_key: &str) -> Result<DocumentNode, ApiError> {
        let body: FileResponse = self.get_json(&self.file_url(file_key)).await?;
        Ok(body.document)
    }

    #[instrument(skip(self))]
    async fn fetch_image_urls(
        &self,
        file_key: &str,
    ) -> Result<HashMap<String, String>, ApiError> {
        let url = format!("{}/images", self.file_url(file_key));
        let body: ImagesResponse = self.get_json(&url).await?;

        let total = body.meta.images.len();
        let urls: HashMap<String, String> = body
            .meta
            .images
            .into_iter()
            .filter_map(|(image_ref, url)| url.map(|u| (image_ref, u)))
            .collect();
        debug!(resolved = urls.len(), total, "image URLs fetched");
        Ok(urls)
    }
}
