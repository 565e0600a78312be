//! Debug serializer: tree to HTML-ish text.
//!
//! Inspection output for tests and logs, not a standards-grade HTML
//! serializer.

use std::fmt::Write;

use crate::{DomTree, NodeData, NodeId};

/// Serialize `id` and its subtree
pub fn to_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeData::Text(text) => out.push_str(&escape_text(&text.content)),
        NodeData::Element(el) => {
            let _ = write!(out, "<{}", el.tag);
            for attr in &el.attrs {
                let _ = write!(out, " {}=\"{}\"", attr.name, escape_attr(&attr.value));
            }
            if !el.style.is_empty() {
                let css: Vec<String> = el
                    .style
                    .iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect();
                let _ = write!(out, " style=\"{}\"", escape_attr(&css.join("; ")));
            }
            out.push('>');
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
