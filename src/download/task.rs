//! Download task construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::filename::{base_filename, with_extension_appended};
use crate::document::ImageReference;

/// One image at one tree location, ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Opaque image identifier.
    pub image_ref: String,
    /// Resolved download URL.
    pub url: String,
    /// Directory the image is written into.
    pub target_dir: PathBuf,
    /// Filename without extension.
    pub base_filename: String,
}

impl DownloadTask {
    /// Returns `target_dir/base_filename` (no extension).
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        self.target_dir.join(&self.base_filename)
    }

    /// Returns the output path for the given extension (including the dot).
    #[must_use]
    pub fn output_path(&self, extension: &str) -> PathBuf {
        with_extension_appended(&self.base_path(), extension)
    }
}

/// Joins image references against the resolved URL map.
///
/// The last path segment names the node itself and is folded into the
/// filename; the preceding segments become directories under `output_dir`.
/// References with no URL (or an empty one) are dropped.
#[must_use]
pub fn build_tasks<S>(
    references: &[ImageReference],
    urls: &HashMap<String, String, S>,
    output_dir: &Path,
) -> Vec<DownloadTask>
where
    S: std::hash::BuildHasher,
{
    references
        .iter()
        .filter_map(|reference| {
            let Some(url) = urls.get(&reference.image_ref).filter(|u| !u.is_empty()) else {
                debug!(image_ref = %reference.image_ref, "no URL for image reference; dropping");
                return None;
            };

            let parents = reference
                .path
                .split_last()
                .map_or(&[][..], |(_, parents)| parents);
            let target_dir = parents
                .iter()
                .fold(output_dir.to_path_buf(), |dir, segment| dir.join(segment));

            Some(DownloadTask {
                image_ref: reference.image_ref.clone(),
                url: url.clone(),
                target_dir,
                base_filename: base_filename(&reference.declared_name, &reference.image_ref),
            })
        })
        .collect()
}
