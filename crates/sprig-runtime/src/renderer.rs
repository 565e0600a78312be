//! Non-incremental renderer.
//!
//! Every pass discards the container's entire content and rebuilds the
//! tree from the root component. No DOM node survives a pass; focus,
//! scroll, and input state do not either. That trade is the point:
//! there is no reconciliation anywhere.

use tracing::{debug, warn};

use sprig_dom::{ElementData, NodeId};

use crate::element::{AttrValue, Props, VNode};
use crate::hooks::Ctx;
use crate::runtime::Runtime;

/// Run one render pass if a frame is pending.
pub(crate) fn render_pass(rt: &Runtime) {
    let binding = {
        let mut inner = rt.inner_mut();
        if !inner.scheduler.begin_frame() {
            return;
        }
        inner.hooks.reset_cursor();
        match inner.binding.clone() {
            Some(binding) => binding,
            None => {
                inner.scheduler.abort_frame();
                return;
            }
        }
    };

    let container = binding.container;
    let container_alive = rt.inner().document.tree().contains(container);
    if !container_alive {
        warn!("render skipped: container is not in the document");
        rt.inner_mut().scheduler.abort_frame();
        return;
    }

    if rt.inner().config.trace_renders {
        debug!(frame = rt.inner().scheduler.frames(), "render pass");
    }

    // Build the tree first, then swap the container's content.
    let tree = (binding.component)(&mut Ctx::new(rt.clone()), &Props::default());
    {
        let mut inner = rt.inner_mut();
        if inner.document.tree_mut().clear_children(container).is_err() {
            warn!("render skipped: container vanished during the pass");
            inner.scheduler.abort_frame();
            return;
        }
    }
    render_vnode(rt, &tree, container);

    let mut inner = rt.inner_mut();
    let effects = std::mem::take(&mut inner.pending_effects);
    inner.scheduler.commit(effects);
}

/// Recursive core: one vnode into `parent`.
fn render_vnode(rt: &Runtime, node: &VNode, parent: NodeId) {
    match node {
        VNode::Nothing => {}
        VNode::Text(content) => {
            let mut inner = rt.inner_mut();
            let tree = inner.document.tree_mut();
            let id = tree.create_text(content.clone());
            if tree.append_child(parent, id).is_err() {
                warn!("text node dropped: parent is gone");
            }
        }
        VNode::Component { func, props } => {
            // Components inline into the same parent; no wrapper node.
            let child = func(&mut Ctx::new(rt.clone()), props);
            render_vnode(rt, &child, parent);
        }
        VNode::Element { tag, props } => {
            let id = {
                let mut inner = rt.inner_mut();
                let tree = inner.document.tree_mut();
                let id = tree.create_element(tag);
                if let Some(el) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                    apply_props(el, props);
                }
                id
            };
            for child in &props.children {
                render_vnode(rt, child, id);
            }
            let mut inner = rt.inner_mut();
            if inner.document.tree_mut().append_child(parent, id).is_err() {
                warn!(%tag, "element dropped: parent is gone");
            }
        }
    }
}

fn apply_props(el: &mut ElementData, props: &Props) {
    for (name, value) in &props.attrs {
        match value {
            AttrValue::Handler(h) if name.starts_with("on") => {
                el.add_listener(&name["on".len()..].to_ascii_lowercase(), h.clone());
            }
            AttrValue::Handler(_) => {
                // A handler under a name without the "on" prefix has no
                // attribute representation.
                debug!(%name, "handler on a non-event attribute ignored");
            }
            AttrValue::Style(style) if name == "style" => {
                for (prop, val) in style.iter() {
                    el.set_style_property(prop, val);
                }
            }
            AttrValue::Style(style) => {
                el.set_attr(name, style.css_text());
            }
            AttrValue::Text(text) => {
                if name == "class" || name == "className" {
                    el.set_attr("class", text.clone());
                } else {
                    el.set_attr(name, text.clone());
                }
            }
        }
    }
}
