//! Error types for the document API.

use thiserror::Error;

/// Errors that can occur while fetching the document tree or the image URL map.
///
/// Any of these aborts a run before a single download is scheduled.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error reaching the API.
    #[error("network error calling {url}: {source}")]
    Network {
        /// The endpoint that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The API did not answer within the configured timeout.
    #[error("timeout calling {url}")]
    Timeout {
        /// The endpoint that timed out.
        url: String,
    },

    /// The credential was missing, invalid, or lacks access to the file.
    #[error("access denied (HTTP {status}) for {url}; check your Figma token")]
    Unauthorized {
        /// The endpoint that rejected the credential.
        url: String,
        /// 401 or 403.
        status: u16,
    },

    /// Any other non-success response.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The endpoint that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        /// The endpoint whose body failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured API base is not an absolute http(s) URL.
    #[error("invalid API base URL: {base}")]
    InvalidBase {
        /// The rejected base URL.
        base: String,
    },

    /// The credential cannot be sent as an HTTP header value.
    #[error("Figma token contains characters not allowed in an HTTP header")]
    InvalidCredential,

    /// The HTTP client could not be constructed.
    #[error("failed to build API client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Classifies a non-success status.
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized {
                url: url.into(),
                status,
            },
            _ => Self::HttpStatus {
                url: url.into(),
                status,
            },
        }
    }

    /// Creates a body decode error, promoting timeouts hit while reading the body.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Decode {
            url: url.into(),
            source,
        }
    }
}
