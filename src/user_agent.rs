//! Shared User-Agent strings for image downloads and Figma API requests.
//!
//! Single source for the project URL and UA format so both clients stay
//! consistent and easy to update.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/figma-images";

/// Default User-Agent for image download requests.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("figma-images/{version} (asset-downloader; +{PROJECT_UA_URL})")
}

/// Default User-Agent for Figma REST API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("figma-images/{version} (api-client; +{PROJECT_UA_URL})")
}
