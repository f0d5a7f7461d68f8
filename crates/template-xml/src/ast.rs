//! Document model.

use crate::uri;
use smol_str::SmolStr;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// The document element.
    pub root: Element,
}

impl Document {
    /// Create a document around its root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// An element.
    Element(Element),
    /// Character data with entities already decoded.
    Text(String),
}

impl Node {
    /// Get the element, if this is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    /// Get the text, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Element(_) => None,
            Self::Text(t) => Some(t),
        }
    }
}

/// An element with its resolved name and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// Namespace URI and local name, see [`uri::make_uri`].
    pub uri: SmolStr,
    /// The name as written in the source (`prefix:local` or `local`).
    pub qname: SmolStr,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes in source order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element whose URI is its qualified name.
    pub fn new(qname: impl Into<SmolStr>) -> Self {
        let qname = qname.into();
        Self {
            uri: qname.clone(),
            qname,
            ..Default::default()
        }
    }

    /// Create an element with an explicit URI.
    pub fn with_uri(uri: impl Into<SmolStr>, qname: impl Into<SmolStr>) -> Self {
        Self {
            uri: uri.into(),
            qname: qname.into(),
            ..Default::default()
        }
    }

    /// Get the namespace part of the element URI.
    pub fn namespace(&self) -> Option<&str> {
        uri::namespace_of(&self.uri)
    }

    /// Get the local part of the element URI.
    pub fn local_name(&self) -> Option<&str> {
        uri::local_name_of(&self.uri)
    }

    /// Get an attribute value by attribute URI.
    pub fn attribute(&self, uri: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.uri == uri)
            .map(|a| a.value.as_str())
    }

    /// Append an attribute.
    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Append a child node, merging adjacent text.
    pub fn push_child(&mut self, node: Node) {
        match (self.children.last_mut(), node) {
            (Some(Node::Text(last)), Node::Text(text)) => last.push_str(&text),
            (_, node) => self.children.push(node),
        }
    }

    /// Iterate over the child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of the whole subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) => out.push_str(t),
        }
    }
}

/// An attribute with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Namespace URI and local name; the local name alone when unprefixed.
    pub uri: SmolStr,
    /// The name as written in the source.
    pub qname: SmolStr,
    /// The decoded value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute whose URI is its qualified name.
    pub fn new(qname: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        let qname = qname.into();
        Self {
            uri: qname.clone(),
            qname,
            value: value.into(),
        }
    }
}
