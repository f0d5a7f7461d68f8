//! Arena-backed document.

use crate::document::{check_hierarchy, Document, NodeId};
use crate::error::{DomError, DomResult};
use indexmap::IndexMap;
use smol_str::SmolStr;
use template_xml::{parse_fragment, Node};

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: SmolStr,
        attributes: IndexMap<SmolStr, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory HTML document.
///
/// Nodes are never freed: removing a node only detaches it.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.index()]
    }

    fn unlink(&mut self, node: NodeId) {
        if let Some(parent) = self.data_mut(node).parent.take() {
            self.data_mut(parent).children.retain(|c| *c != node);
        }
    }

    /// Build nodes from parsed markup below `parent`.
    fn import(&mut self, parent: NodeId, nodes: Vec<Node>) {
        for node in nodes {
            let id = match node {
                Node::Text(text) => self.push(NodeKind::Text(text)),
                Node::Element(element) => {
                    let attributes = element
                        .attributes
                        .into_iter()
                        .map(|a| (a.qname, a.value))
                        .collect();
                    let id = self.push(NodeKind::Element {
                        tag: element.qname,
                        attributes,
                    });
                    self.import(id, element.children);
                    id
                }
            };
            self.data_mut(id).parent = Some(parent);
            self.data_mut(parent).children.push(id);
        }
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match &self.data(node).kind {
            NodeKind::Text(text) => escape_text(text, out),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                self.write_children(node, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn write_children(&self, node: NodeId, out: &mut String) {
        for child in &self.data(node).children {
            self.write_node(*child, out);
        }
    }

    fn write_text(&self, node: NodeId, out: &mut String) {
        match &self.data(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &self.data(node).children {
                    self.write_text(*child, out);
                }
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            _ => escape_text(ch.encode_utf8(&mut [0; 4]), out),
        }
    }
}

impl Document for MemoryDocument {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: SmolStr::new(tag),
            attributes: IndexMap::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.data_mut(node).kind {
            attributes.insert(SmolStr::new(name), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.data_mut(node).kind {
            attributes.shift_remove(name);
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).children.first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.data(node).parent?;
        let siblings = &self.data(parent).children;
        let pos = siblings.iter().position(|c| *c == node)?;
        siblings.get(pos + 1).copied()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.data(node).children.clone()
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        check_hierarchy(self, parent, child)?;
        self.unlink(child);
        self.data_mut(child).parent = Some(parent);
        self.data_mut(parent).children.push(child);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> DomResult<()> {
        if self.data(reference).parent != Some(parent) {
            return Err(DomError::not_a_child());
        }
        if child == reference {
            return Ok(());
        }
        check_hierarchy(self, parent, child)?;
        self.unlink(child);
        let siblings = &mut self.data_mut(parent).children;
        let pos = siblings
            .iter()
            .position(|c| *c == reference)
            .ok_or_else(DomError::not_a_child)?;
        siblings.insert(pos, child);
        self.data_mut(child).parent = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.data(child).parent != Some(parent) {
            return Err(DomError::not_a_child());
        }
        self.unlink(child);
        Ok(())
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> DomResult<()> {
        if self.tag_name(node).is_none() {
            return Err(DomError::hierarchy("Text nodes cannot have children"));
        }
        let nodes = parse_fragment(html).map_err(DomError::invalid_markup)?;
        self.remove_children(node);
        self.import(node, nodes);
        Ok(())
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        match &self.data(node).kind {
            NodeKind::Text(text) => escape_text(text, &mut out),
            NodeKind::Element { .. } => self.write_children(node, &mut out),
        }
        out
    }

    fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(current) = &mut self.data_mut(node).kind {
            *current = text.to_string();
            return;
        }
        self.remove_children(node);
        if !text.is_empty() {
            let id = self.create_text(text);
            self.data_mut(id).parent = Some(node);
            self.data_mut(node).children.push(id);
        }
    }
}
