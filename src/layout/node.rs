use crate::input::types::Sample;
use crate::layout::{LayoutNode, NodeRef};
use parking_lot::RwLock;
use std::sync::Arc;

/// A plain positioned node for hosts without their own element tree
#[derive(Debug)]
pub struct Node {
    offset: RwLock<Sample>,
    parent: Option<NodeRef>,
}

impl Node {
    /// The document root
    pub fn root() -> Arc<Self> {
        Self::detached(0.0, 0.0)
    }

    /// A node with no offset parent
    pub fn detached(left: f64, top: f64) -> Arc<Self> {
        Arc::new(Self {
            offset: RwLock::new(Sample::new(left, top)),
            parent: None,
        })
    }

    pub fn new(parent: NodeRef, left: f64, top: f64) -> Arc<Self> {
        Arc::new(Self {
            offset: RwLock::new(Sample::new(left, top)),
            parent: Some(parent),
        })
    }

    /// Move the node within its offset parent
    pub fn set_offset(&self, left: f64, top: f64) {
        *self.offset.write() = Sample::new(left, top);
    }

    pub fn translate(&self, dx: f64, dy: f64) {
        let mut offset = self.offset.write();
        offset.x += dx;
        offset.y += dy;
    }
}

impl LayoutNode for Node {
    fn offset_left(&self) -> f64 {
        self.offset.read().x
    }

    fn offset_top(&self) -> f64 {
        self.offset.read().y
    }

    fn offset_parent(&self) -> Option<NodeRef> {
        self.parent.clone()
    }
}
