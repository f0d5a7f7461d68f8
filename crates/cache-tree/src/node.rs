//! Cache node types.

use std::fmt;
use std::slice;

/// A node of a compiled cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheNode<P> {
    /// A run of static markup.
    Text(TextNode),
    /// A dynamic element with its compiled content.
    Composite(CompositeNode<P>),
}

impl<P> CacheNode<P> {
    /// Get the text node, if this is one.
    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(text) => Some(text),
            Self::Composite(_) => None,
        }
    }

    /// Get the composite node, if this is one.
    pub fn as_composite(&self) -> Option<&CompositeNode<P>> {
        match self {
            Self::Text(_) => None,
            Self::Composite(composite) => Some(composite),
        }
    }
}

/// Static markup cached verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    /// The cached text.
    pub text: String,
}

impl TextNode {
    /// Create a new text node.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Get the cached text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A dynamic element of the cache.
///
/// The payload carries whatever the consumer needs to instantiate the
/// element later (a factory, the source element...). The root of a cache
/// is a composite node whose payload describes a pure container.
///
/// Children never contain two adjacent [`TextNode`]s nor an empty one:
/// [`CompositeNode::push`] merges and drops text as needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeNode<P> {
    /// The payload attached by the cache source.
    pub payload: P,
    children: Vec<CacheNode<P>>,
}

impl<P> CompositeNode<P> {
    /// Create an empty composite node.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            children: Vec::new(),
        }
    }

    /// Append a child, merging it into a preceding text run if both are text.
    pub fn push(&mut self, node: CacheNode<P>) {
        match node {
            CacheNode::Text(text) => self.push_text(&text.text),
            composite => self.children.push(composite),
        }
    }

    /// Append static text.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(CacheNode::Text(last)) = self.children.last_mut() {
            last.text.push_str(text);
        } else {
            self.children.push(CacheNode::Text(TextNode::new(text)));
        }
    }

    /// Get the children in document order.
    pub fn children(&self) -> &[CacheNode<P>] {
        &self.children
    }

    /// Iterate over the children.
    pub fn iter(&self) -> slice::Iter<'_, CacheNode<P>> {
        self.children.iter()
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Nesting depth of composite nodes below this one (0 for a leaf).
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .filter_map(CacheNode::as_composite)
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Concatenate every cached text run of the subtree in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    /// Append every cached text run of the subtree to `out`.
    pub fn write_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                CacheNode::Text(text) => out.push_str(&text.text),
                CacheNode::Composite(composite) => composite.write_text(out),
            }
        }
    }
}

impl<'a, P> IntoIterator for &'a CompositeNode<P> {
    type Item = &'a CacheNode<P>;
    type IntoIter = slice::Iter<'a, CacheNode<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
