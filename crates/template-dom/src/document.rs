//! The document trait.

use crate::error::{DomError, DomResult};
use log::warn;
use std::fmt;

/// Handle to a node of a [`Document`].
///
/// Handles stay valid for the lifetime of the document that issued them;
/// detached nodes can be inserted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a handle from an arena index.
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mutable HTML document.
pub trait Document {
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Tag name of an element, `None` for text.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Get an attribute of an element.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Set an attribute of an element; ignored on text nodes.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute of an element.
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Parent of a node.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// First child of a node.
    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// Next sibling of a node.
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Append `child` to `parent`, detaching it first.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()>;

    /// Insert `child` before `reference`, detaching it first.
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId)
        -> DomResult<()>;

    /// Remove `child` from `parent`.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()>;

    /// Replace the content of `node` with parsed markup.
    fn set_inner_html(&mut self, node: NodeId, html: &str) -> DomResult<()>;

    /// Serialized content of `node`.
    fn inner_html(&self, node: NodeId) -> String;

    /// Serialized `node` including its own tag.
    fn outer_html(&self, node: NodeId) -> String;

    /// Concatenated text of the subtree.
    fn text_content(&self, node: NodeId) -> String;

    /// Replace the content of `node` with a single text node.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Children of `node` in order.
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut child = self.first_child(node);
        while let Some(current) = child {
            out.push(current);
            child = self.next_sibling(current);
        }
        out
    }

    /// Find the element with the given `id` attribute below `root`.
    fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let mut child = self.first_child(root);
        while let Some(current) = child {
            if self.attribute(current, "id") == Some(id) {
                return Some(current);
            }
            if let Some(found) = self.element_by_id(current, id) {
                return Some(found);
            }
            child = self.next_sibling(current);
        }
        None
    }

    /// Detach `node` from its parent, if any.
    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Err(err) = self.remove_child(parent, node) {
                warn!("cannot detach {}: {}", node, err);
            }
        }
    }

    /// Remove every child of `node`.
    fn remove_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            if let Err(err) = self.remove_child(node, child) {
                warn!("cannot remove {} from {}: {}", child, node, err);
            }
        }
    }

    /// Check whether `ancestor` contains `node` (or is `node`).
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// Fail when inserting `child` under `parent` would create a cycle.
pub(crate) fn check_hierarchy<D: Document + ?Sized>(
    doc: &D,
    parent: NodeId,
    child: NodeId,
) -> DomResult<()> {
    if doc.tag_name(parent).is_none() {
        return Err(DomError::hierarchy("Text nodes cannot have children"));
    }
    if doc.contains(child, parent) {
        return Err(DomError::hierarchy("A node cannot be inserted into itself"));
    }
    Ok(())
}
