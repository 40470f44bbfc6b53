//! Document tree model and image reference extraction.
//!
//! A Figma file is a tree of nodes. Each node has a display name, a list of
//! paints ("fills") and child nodes. Only fills of kind `IMAGE` carry an image
//! reference, which is resolved separately to a downloadable URL.
//!
//! [`walk`] flattens the tree into [`ImageReference`]s that the download
//! module turns into tasks.

mod walker;

pub use walker::walk;

use serde::Deserialize;

/// Fill kind that carries an image reference.
const IMAGE_FILL_KIND: &str = "image";

/// A node of the remote document tree.
///
/// Fields missing from the API payload default to empty values so that
/// partially populated nodes (e.g. pages without fills) still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentNode {
    /// Display name as shown in the editor.
    #[serde(default)]
    pub name: String,
    /// Paint descriptors attached to the node.
    #[serde(default)]
    pub fills: Vec<Fill>,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Creates a node with the given name and no fills or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a fill, builder style.
    #[must_use]
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fills.push(fill);
        self
    }

    /// Adds a child node, builder style.
    #[must_use]
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A paint descriptor on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Fill {
    /// Paint kind (`SOLID`, `GRADIENT_LINEAR`, `IMAGE`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Opaque image identifier, present on image fills.
    #[serde(rename = "imageRef", default)]
    pub image_ref: Option<String>,
}

impl Fill {
    /// Creates an image fill pointing at `image_ref`.
    #[must_use]
    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            kind: "IMAGE".to_string(),
            image_ref: Some(image_ref.into()),
        }
    }

    /// Creates a non-image fill of the given kind.
    #[must_use]
    pub fn other(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            image_ref: None,
        }
    }

    /// Returns the image reference when this is an image fill with a non-empty ref.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        if !self.kind.eq_ignore_ascii_case(IMAGE_FILL_KIND) {
            return None;
        }
        self.image_ref.as_deref().filter(|r| !r.is_empty())
    }
}

/// One image found in the tree, tagged with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Opaque image identifier.
    pub image_ref: String,
    /// Sanitized names from the root down to and including the owning node.
    pub path: Vec<String>,
    /// Raw display name of the owning node.
    pub declared_name: String,
}
