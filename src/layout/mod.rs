//! Element geometry
//!
//! Related elements are tracked by their cumulative offset from the
//! document, summed along the offset-parent chain.

pub mod node;

pub use node::Node;

use crate::input::types::Sample;
use std::collections::BTreeMap;
use std::sync::Arc;

/// An element positioned relative to its offset parent
pub trait LayoutNode: Send + Sync {
    /// Horizontal offset relative to the offset parent
    fn offset_left(&self) -> f64;

    /// Vertical offset relative to the offset parent
    fn offset_top(&self) -> f64;

    /// The nearest positioned ancestor, `None` at the root
    fn offset_parent(&self) -> Option<NodeRef>;
}

impl std::fmt::Debug for dyn LayoutNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutNode")
            .field("offset_left", &self.offset_left())
            .field("offset_top", &self.offset_top())
            .finish()
    }
}

pub type NodeRef = Arc<dyn LayoutNode>;

/// Related elements to track, by name. Iterated in key order.
pub type RelatedNodes = BTreeMap<String, NodeRef>;

/// Sum offsets while walking up to the root.
///
/// A node without an offset parent contributes nothing, so the root (and a
/// detached node) sits at the origin.
pub fn cumulative_offset(node: &dyn LayoutNode) -> Sample {
    let mut offset = Sample::default();
    let mut parent = node.offset_parent();
    let (mut left, mut top) = (node.offset_left(), node.offset_top());

    while let Some(next) = parent {
        offset.x += left;
        offset.y += top;
        left = next.offset_left();
        top = next.offset_top();
        parent = next.offset_parent();
    }

    offset
}
