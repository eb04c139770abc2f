use indexmap::IndexMap;

/// Attributes of an element, in document order.
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Start of an element holding child elements.
    Open,
    /// End of an element previously reported as [`EventKind::Open`].
    Close,
    /// An element with no child elements, reported in one piece.
    Complete,
    /// Text found between child elements.
    Text,
    Other,
}

/// One token of the flat event stream the tree is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseEvent {
    pub kind: EventKind,
    pub tag: Option<String>,
    pub value: Option<String>,
    pub attributes: Attributes,
}

impl ParseEvent {
    pub fn open<S: Into<String>>(tag: S) -> Self {
        Self::element(EventKind::Open, tag)
    }

    pub fn close<S: Into<String>>(tag: S) -> Self {
        Self::element(EventKind::Close, tag)
    }

    pub fn complete<S: Into<String>>(tag: S) -> Self {
        Self::element(EventKind::Complete, tag)
    }

    pub fn text<S: Into<String>>(value: S) -> Self {
        Self {
            kind: EventKind::Text,
            tag: None,
            value: Some(value.into()),
            attributes: Attributes::new(),
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

    fn element<S: Into<String>>(kind: EventKind, tag: S) -> Self {
        Self {
            kind,
            tag: Some(tag.into()),
            value: None,
            attributes: Attributes::new(),
        }
    }
}
