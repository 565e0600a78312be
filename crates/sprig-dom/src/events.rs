//! UI events and listener dispatch.
//!
//! Dispatch is split in two so the tree is never borrowed while user
//! handlers run: `dispatch_path` snapshots the listener chain, `deliver`
//! runs it against an event.

use std::rc::Rc;

use crate::{DomError, DomResult, DomTree, NodeId};

/// Listener callback bound to an element
pub type EventListener = Rc<dyn Fn(&mut UiEvent)>;

/// An input event dispatched against the tree
#[derive(Debug)]
pub struct UiEvent {
    /// Lower-cased event name ("click", "keydown", ...)
    pub name: String,
    /// Node the event was dispatched at
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: NodeId,
    /// Whether the event bubbles to ancestors
    pub bubbles: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    pub fn new(name: &str, target: NodeId) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            target,
            current_target: target,
            bubbles: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent the default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from bubbling past the current node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl DomTree {
    /// Listener chain for `event` at `target`: the target first, then
    /// ancestors that have listeners for it. Listeners are cloned out so
    /// the caller can run them without holding the tree.
    pub fn dispatch_path(
        &self,
        target: NodeId,
        event: &str,
    ) -> DomResult<Vec<(NodeId, Vec<EventListener>)>> {
        if !self.contains(target) {
            return Err(DomError::NotFound);
        }
        let event = event.to_ascii_lowercase();
        let mut path = Vec::new();
        let mut cur = target;
        while !cur.is_none() {
            let Some(node) = self.get(cur) else { break };
            if let Some(el) = node.as_element() {
                let listeners = el.listeners_for(&event);
                if !listeners.is_empty() {
                    path.push((cur, listeners));
                }
            }
            cur = node.parent;
        }
        Ok(path)
    }
}

/// Run a dispatch path against an event. `stop_propagation` takes effect
/// between nodes; listeners already gathered on a node still run.
pub fn deliver(path: &[(NodeId, Vec<EventListener>)], event: &mut UiEvent) {
    for (node, listeners) in path {
        event.current_target = *node;
        for listener in listeners {
            listener(event);
        }
        if event.is_propagation_stopped() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_dispatch_path_target_then_ancestors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        for id in [outer, inner] {
            if let Some(el) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                el.add_listener("click", Rc::new(|_| {}));
            }
        }

        let path = tree.dispatch_path(inner, "click").unwrap();
        let nodes: Vec<NodeId> = path.iter().map(|(id, _)| *id).collect();
        assert_eq!(nodes, vec![inner, outer]);
    }

    #[test]
    fn test_dispatch_path_stale_target() {
        let mut tree = DomTree::new();
        let el = tree.create_element("div");
        tree.append_child(tree.root(), el).unwrap();
        tree.remove_subtree(el).unwrap();

        assert!(matches!(
            tree.dispatch_path(el, "click"),
            Err(DomError::NotFound)
        ));
    }

    #[test]
    fn test_deliver_honors_stop_propagation() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        let l = log.clone();
        if let Some(el) = tree.get_mut(inner).and_then(|n| n.as_element_mut()) {
            el.add_listener(
                "click",
                Rc::new(move |ev| {
                    l.borrow_mut().push("inner");
                    ev.stop_propagation();
                }),
            );
        }
        let l = log.clone();
        if let Some(el) = tree.get_mut(outer).and_then(|n| n.as_element_mut()) {
            el.add_listener("click", Rc::new(move |_| l.borrow_mut().push("outer")));
        }

        let path = tree.dispatch_path(inner, "click").unwrap();
        let mut ev = UiEvent::new("click", inner);
        deliver(&path, &mut ev);

        assert_eq!(*log.borrow(), vec!["inner"]);
    }
}
