use log::{debug, warn};

use crate::error::WxrError;

use super::event::{Attributes, EventKind, ParseEvent};

/// Tag, text and attributes shared by both kinds of [`Element`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub tag: String,
    pub value: Option<String>,
    pub attributes: Attributes,
}

impl Node {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl From<ParseEvent> for Node {
    fn from(event: ParseEvent) -> Self {
        Self {
            tag: event.tag.unwrap_or_default(),
            value: event.value,
            attributes: event.attributes,
        }
    }
}

/// A node of the reconstructed document tree.
///
/// A `Leaf` comes from a `complete` event and cannot hold children. A `Branch`
/// comes from an `open` event and owns its (possibly empty) list of children.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Leaf(Node),
    Branch(Node, Vec<Element>),
}

impl Element {
    pub fn node(&self) -> &Node {
        match self {
            Element::Leaf(node) | Element::Branch(node, _) => node,
        }
    }

    pub fn tag(&self) -> &str {
        &self.node().tag
    }

    pub fn value(&self) -> Option<&str> {
        self.node().value.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.node().attributes
    }

    /// Children of a `Branch`, `None` for a `Leaf`.
    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Element::Leaf(_) => None,
            Element::Branch(_, children) => Some(children),
        }
    }
}

/// Rebuilds the element tree from a flat event stream.
///
/// Every `open` event pushes a frame owning the element under construction;
/// the matching `close` pops it and appends the finished branch to the frame
/// below. Elements appended to the document root itself end up in `root`.
///
/// Returns the first top-level element.
pub fn build_tree<I>(events: I) -> Result<Element, WxrError>
where
    I: IntoIterator<Item = ParseEvent>,
{
    let mut root: Vec<Element> = Vec::new();
    let mut stack: Vec<(Node, Vec<Element>)> = Vec::new();

    for event in events {
        match event.kind {
            EventKind::Open => stack.push((Node::from(event), Vec::new())),
            EventKind::Complete => {
                append(&mut stack, &mut root, Element::Leaf(Node::from(event)));
            }
            EventKind::Close => {
                let Some((node, children)) = stack.pop() else {
                    return Err(WxrError::Structure(format!(
                        "close event for <{}> without a matching open event",
                        event.tag.unwrap_or_default()
                    )));
                };
                if let Some(tag) = event.tag.as_deref()
                    && tag != node.tag
                {
                    warn!("Close event <{}> ends element <{}>", tag, node.tag);
                }
                append(&mut stack, &mut root, Element::Branch(node, children));
            }
            EventKind::Text | EventKind::Other => {}
        }
    }

    while let Some((node, children)) = stack.pop() {
        warn!("Element <{}> was never closed", node.tag);
        append(&mut stack, &mut root, Element::Branch(node, children));
    }

    if root.len() > 1 {
        debug!("Ignoring {} extra top-level elements", root.len() - 1);
    }

    root.into_iter().next().ok_or(WxrError::EmptyDocument)
}

fn append(stack: &mut [(Node, Vec<Element>)], root: &mut Vec<Element>, element: Element) {
    match stack.last_mut() {
        Some((_, children)) => children.push(element),
        None => root.push(element),
    }
}
