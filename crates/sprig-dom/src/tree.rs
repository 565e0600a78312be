//! Arena DOM tree.
//!
//! Slab of nodes with a free list. Removing a subtree returns its slots
//! for reuse and bumps their generation, so ids held across a rebuild
//! go stale instead of pointing at fresh nodes.

use tracing::trace;

use crate::{DomError, DomResult, Node, NodeId};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::NONE,
        };
        tree.root = tree.insert(Node::document());
        tree
    }

    /// The document root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by id; stale ids return None
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Get a mutable node by id
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Check whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes (including the document root)
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Check if only the document root remains
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Allocate a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(Node::element(tag))
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.insert(Node::text(content))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from
    /// any previous parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::NotFound);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(child)?;

        let last = match self.get(parent) {
            Some(p) => p.last_child,
            None => return Err(DomError::NotFound),
        };
        if let Some(c) = self.get_mut(child) {
            c.parent = parent;
            c.prev_sibling = last;
            c.next_sibling = NodeId::NONE;
        }
        if last.is_none() {
            if let Some(p) = self.get_mut(parent) {
                p.first_child = child;
            }
        } else if let Some(l) = self.get_mut(last) {
            l.next_sibling = child;
        }
        if let Some(p) = self.get_mut(parent) {
            p.last_child = child;
        }
        Ok(())
    }

    /// Unlink `id` from its parent, leaving the node alive
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return Err(DomError::NotFound),
        };
        if parent.is_none() {
            return Ok(());
        }
        if prev.is_none() {
            if let Some(p) = self.get_mut(parent) {
                p.first_child = next;
            }
        } else if let Some(pv) = self.get_mut(prev) {
            pv.next_sibling = next;
        }
        if next.is_none() {
            if let Some(p) = self.get_mut(parent) {
                p.last_child = prev;
            }
        } else if let Some(nx) = self.get_mut(next) {
            nx.prev_sibling = prev;
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = NodeId::NONE;
            n.prev_sibling = NodeId::NONE;
            n.next_sibling = NodeId::NONE;
        }
        Ok(())
    }

    /// Remove `id` and every descendant, freeing their slots
    pub fn remove_subtree(&mut self, id: NodeId) -> DomResult<()> {
        if id == self.root {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(id)?;

        let mut freed = 0usize;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.get(cur) {
                let mut child = node.first_child;
                while !child.is_none() {
                    stack.push(child);
                    child = match self.get(child) {
                        Some(c) => c.next_sibling,
                        None => NodeId::NONE,
                    };
                }
            }
            if self.free_slot(cur) {
                freed += 1;
            }
        }
        trace!(freed, "subtree removed");
        Ok(())
    }

    /// Remove every child subtree of `parent`
    pub fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
        let mut child = match self.get(parent) {
            Some(n) => n.first_child,
            None => return Err(DomError::NotFound),
        };
        while !child.is_none() {
            let next = match self.get(child) {
                Some(c) => c.next_sibling,
                None => NodeId::NONE,
            };
            self.remove_subtree(child)?;
            child = next;
        }
        Ok(())
    }

    fn free_slot(&mut self, id: NodeId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                true
            }
            _ => false,
        }
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cur = match self.get(of) {
            Some(n) => n.parent,
            None => NodeId::NONE,
        };
        while !cur.is_none() {
            if cur == candidate {
                return true;
            }
            cur = match self.get(cur) {
                Some(n) => n.parent,
                None => NodeId::NONE,
            };
        }
        false
    }

    /// Iterate the direct children of `parent` in order
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = match self.get(parent) {
            Some(n) => n.first_child,
            None => NodeId::NONE,
        };
        Children {
            tree: self,
            next: first,
        }
    }

    /// Concatenated text of `id` and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.get(id) {
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
        }
        for (child, _) in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Set an attribute on an element node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        match self.get_mut(id) {
            Some(node) => match node.as_element_mut() {
                Some(el) => {
                    el.set_attr(name, value);
                    Ok(())
                }
                None => Err(DomError::NotAnElement),
            },
            None => Err(DomError::NotFound),
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_none() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
