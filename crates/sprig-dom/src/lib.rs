//! sprig DOM - the document substrate for the sprig runtime.
//!
//! In-memory DOM tree with attributes, inline style, and event
//! listeners. The runtime's renderer discards and rebuilds whole
//! subtrees, so node handles are generational: a handle into a removed
//! subtree goes stale instead of aliasing a later node.

mod document;
mod events;
mod node;
mod serialize;
mod tree;

pub use document::Document;
pub use events::{EventListener, UiEvent, deliver};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use serialize::to_html;
pub use tree::{Children, DomTree};

use thiserror::Error;

/// Node identifier: slab index plus the generation it was allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Sentinel for absent links.
    pub const NONE: NodeId = NodeId {
        index: u32::MAX,
        generation: 0,
    };

    /// Check whether this id is the absent sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.index == u32::MAX
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// Node id is stale or was never allocated
    #[error("node not found")]
    NotFound,
    /// Operation expected an element node
    #[error("node is not an element")]
    NotAnElement,
    /// Inserting a node under itself or its own descendant
    #[error("hierarchy request error")]
    HierarchyRequest,
}
