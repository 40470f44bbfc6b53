use crate::download::sanitize_name;

use super::{DocumentNode, ImageReference};

/// Flattens a document tree into the image references it contains.
///
/// The node's sanitized name is appended to `ancestor_path`; the node's own
/// image fills are emitted first, then each child is walked in order with the
/// extended path. The returned order is document order.
#[must_use]
pub fn walk(node: &DocumentNode, ancestor_path: &[String]) -> Vec<ImageReference> {
    let mut path = ancestor_path.to_vec();
    path.push(sanitize_name(&node.name));

    let own = node.fills.iter().filter_map(|fill| {
        fill.image_ref().map(|image_ref| ImageReference {
            image_ref: image_ref.to_string(),
            path: path.clone(),
            declared_name: node.name.clone(),
        })
    });

    let descendants = node.children.iter().flat_map(|child| walk(child, &path));

    own.chain(descendants).collect()
}
