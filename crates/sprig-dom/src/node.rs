//! DOM node types.
//!
//! Arena layout: parent, first/last child, and sibling links are node
//! ids instead of pointers, with node-kind data in an enum.

use std::fmt;

use crate::{EventListener, NodeId};

/// A single node in the tree.
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(TextData {
            content: content.into(),
        }))
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
}

/// Element-specific data
pub struct ElementData {
    /// Tag name
    pub tag: String,
    /// Attributes, in set order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (common lookup)
    pub id: Option<String>,
    /// Inline style, merged per property in set order
    pub style: Vec<(String, String)>,
    /// Event listeners, keyed by lower-cased event name
    pub(crate) listeners: Vec<(String, EventListener)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            id: None,
            style: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name == "id" {
            self.id = Some(value.clone());
        }
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    /// Merge one property into the inline style
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        for prop in self.style.iter_mut() {
            if prop.0 == name {
                prop.1 = value.to_string();
                return;
            }
        }
        self.style.push((name.to_string(), value.to_string()));
    }

    /// Attach a listener for `event` (lower-cased name)
    pub fn add_listener(&mut self, event: &str, listener: EventListener) {
        self.listeners.push((event.to_ascii_lowercase(), listener));
    }

    /// Clone out the listeners registered for `event`
    pub fn listeners_for(&self, event: &str) -> Vec<EventListener> {
        self.listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// Check if any listener is attached
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl fmt::Debug for ElementData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementData")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("style", &self.style)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
