//! Document - high-level tree API

use tracing::debug;

use crate::{DomTree, NodeId};

/// A document: the tree plus its body scaffold
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    body: NodeId,
}

impl Document {
    /// Create a new document with an empty `<body>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let linked = tree.append_child(tree.root(), body);
        debug_assert!(linked.is_ok());
        debug!("document created");
        Self { tree, body }
    }

    /// Get the `<body>` element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.tree.create_text(content)
    }

    /// Find an element by its id attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_with_id(self.tree.root(), id)
    }

    fn find_with_id(&self, start: NodeId, target: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(el) = node.as_element() {
                if el.id.as_deref() == Some(target) {
                    return Some(node_id);
                }
            }
            if let Some(found) = self.find_with_id(node_id, target) {
                return Some(found);
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
