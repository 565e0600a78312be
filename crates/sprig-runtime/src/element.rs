//! Element model - immutable description of what to render.
//!
//! An element is either a primitive (tag plus props) or a component
//! reference plus props. Children live in the props under a reserved
//! slot; `bool` and `Option::None` children become [`VNode::Nothing`],
//! which renders as nothing, so view code can use plain conditional
//! expressions.

use std::fmt;
use std::rc::Rc;

use sprig_dom::UiEvent;

use crate::hooks::Ctx;

/// Component function: props in, element tree out
pub type ComponentFn = Rc<dyn Fn(&mut Ctx, &Props) -> VNode>;

/// Handler attached through an `on*` prop
pub type EventHandler = sprig_dom::EventListener;

/// Wrap a closure as an [`EventHandler`]
pub fn handler(f: impl Fn(&mut UiEvent) + 'static) -> EventHandler {
    Rc::new(f)
}

/// A node in the element tree
#[derive(Clone)]
pub enum VNode {
    /// Primitive element: tag plus props
    Element { tag: String, props: Props },
    /// Component reference plus props
    Component { func: ComponentFn, props: Props },
    /// Literal text
    Text(String),
    /// Renders as nothing
    Nothing,
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element { tag, props } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("props", props)
                .finish(),
            Self::Component { props, .. } => {
                f.debug_struct("Component").field("props", props).finish()
            }
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Nothing => f.write_str("Nothing"),
        }
    }
}

/// Build a primitive element
pub fn el<C>(tag: &str, props: Props, children: impl IntoIterator<Item = C>) -> VNode
where
    C: Into<VNode>,
{
    let mut props = props;
    props.children.extend(children.into_iter().map(Into::into));
    VNode::Element {
        tag: tag.to_string(),
        props,
    }
}

/// Build a component element
pub fn component(func: impl Fn(&mut Ctx, &Props) -> VNode + 'static, props: Props) -> VNode {
    VNode::Component {
        func: Rc::new(func),
        props,
    }
}

/// Text node from any displayable value
pub fn text(value: impl fmt::Display) -> VNode {
    VNode::Text(value.to_string())
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<String> for VNode {
    fn from(value: String) -> Self {
        VNode::Text(value)
    }
}

impl From<i64> for VNode {
    fn from(value: i64) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<i32> for VNode {
    fn from(value: i32) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<u32> for VNode {
    fn from(value: u32) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<usize> for VNode {
    fn from(value: usize) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<f64> for VNode {
    fn from(value: f64) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<bool> for VNode {
    fn from(_: bool) -> Self {
        VNode::Nothing
    }
}

impl<T: Into<VNode>> From<Option<T>> for VNode {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => VNode::Nothing,
        }
    }
}

/// Attribute value
#[derive(Clone)]
pub enum AttrValue {
    /// Plain text, set verbatim as a DOM attribute
    Text(String),
    /// Inline style, merged onto the node's style
    Style(Style),
    /// Event handler, bound as a listener, never a DOM attribute
    Handler(EventHandler),
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Style(style) => f.debug_tuple("Style").field(style).finish(),
            Self::Handler(_) => f.write_str("Handler"),
        }
    }
}

/// Inline style: ordered property/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    props: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one property
    pub fn prop(mut self, name: &str, value: &str) -> Self {
        for existing in self.props.iter_mut() {
            if existing.0 == name {
                existing.1 = value.to_string();
                return self;
            }
        }
        self.props.push((name.to_string(), value.to_string()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render as CSS text (for a Style under a non-style attribute name)
    pub fn css_text(&self) -> String {
        let parts: Vec<String> = self
            .props
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        parts.join("; ")
    }
}

/// Props: the attribute mapping of an element.
///
/// Attributes keep their set order. Children are the reserved child
/// sequence. `key` is accepted for source compatibility with view code
/// that supplies one; the renderer never consults it.
#[derive(Debug, Clone, Default)]
pub struct Props {
    pub attrs: Vec<(String, AttrValue)>,
    pub children: Vec<VNode>,
    pub key: Option<String>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSS class
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value.into())
    }

    /// Set a plain attribute
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs
            .push((name.to_string(), AttrValue::Text(value.to_string())));
        self
    }

    /// Set the inline style
    pub fn style(mut self, style: Style) -> Self {
        self.attrs.push(("style".to_string(), AttrValue::Style(style)));
        self
    }

    /// Bind an event handler ("click" becomes the `onclick` entry)
    pub fn on(self, event: &str, f: impl Fn(&mut UiEvent) + 'static) -> Self {
        self.on_handler(event, handler(f))
    }

    /// Bind a prebuilt handler (e.g. from `use_callback`)
    pub fn on_handler(mut self, event: &str, handler: EventHandler) -> Self {
        self.attrs
            .push((format!("on{event}"), AttrValue::Handler(handler)));
        self
    }

    /// Append one child
    pub fn child(mut self, node: impl Into<VNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Set the per-child identity key (accepted, never consulted)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Look up an attribute value by name
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_flatten_into_props() {
        let node = el(
            "div",
            Props::new(),
            [VNode::from("a"), text(3), VNode::from(false)],
        );
        let VNode::Element { tag, props } = node else {
            panic!("expected element");
        };
        assert_eq!(tag, "div");
        assert_eq!(props.children.len(), 3);
        assert!(matches!(&props.children[0], VNode::Text(t) if t == "a"));
        assert!(matches!(&props.children[1], VNode::Text(t) if t == "3"));
        assert!(matches!(&props.children[2], VNode::Nothing));
    }

    #[test]
    fn test_bool_and_none_become_nothing() {
        assert!(matches!(VNode::from(true), VNode::Nothing));
        assert!(matches!(VNode::from(false), VNode::Nothing));
        assert!(matches!(VNode::from(Option::<VNode>::None), VNode::Nothing));
        assert!(matches!(VNode::from(Some("x")), VNode::Text(t) if t == "x"));
    }

    #[test]
    fn test_props_keep_attribute_order() {
        let props = Props::new()
            .class("box")
            .attr("id", "main")
            .on("click", |_| {});
        let names: Vec<&str> = props.attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["class", "id", "onclick"]);
    }

    #[test]
    fn test_style_prop_replaces() {
        let style = Style::new()
            .prop("width", "10px")
            .prop("color", "red")
            .prop("width", "20px");
        assert_eq!(style.css_text(), "width: 20px; color: red");
    }

    #[test]
    fn test_key_is_stored_separately() {
        let props = Props::new().key("row-3");
        assert_eq!(props.key.as_deref(), Some("row-3"));
        assert!(props.attrs.is_empty());
    }
}
