//! Document tree for the Plume style engine.
//!
//! The tree is the boundary between an external HTML parser and the engine:
//! the engine only reads tag names, attributes, children and text from it.
//!
//! # Design
//!
//! Nodes live in a single arena and refer to each other through [`NodeId`]
//! indices. The [`NodeType::Document`] node is always at [`NodeId::ROOT`].

use std::collections::{HashMap, HashSet};

/// Map of attribute names to values for an element. Order is irrelevant.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A single arena slot: the node payload plus its tree links.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,
    /// The parent node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// The node kinds the engine distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The document itself; the root of every tree.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
    /// A comment. Never styled or laid out.
    Comment(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's local name, e.g. `div`.
    pub tag_name: String,
    /// The element's attributes.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create an element with no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// The `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// The class names from the `class` attribute, split on spaces.
    ///
    /// Empty segments produced by repeated spaces are dropped.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split(' ').filter(|c| !c.is_empty()).collect())
            .unwrap_or_default()
    }

    /// The inline `style` attribute, if present.
    #[must_use]
    pub fn style_attribute(&self) -> Option<&str> {
        self.attrs.get("style").map(String::as_str)
    }
}

/// Arena-based document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    /// All nodes, indexed by `NodeId`. Index 0 is the document.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node's id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is allocated up front.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Ids that are not in the arena are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate an element and append it under `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(element));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The children of a node, empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Character data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated character data of the node's direct text children.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&child| self.as_text(child))
            .collect()
    }

    /// The first element child of the document (normally `<html>`).
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// The first `<body>` child of the document element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).iter().copied().find(|&id| {
            self.as_element(id)
                .is_some_and(|e| e.tag_name.eq_ignore_ascii_case("body"))
        })
    }

    /// Pre-order traversal of `id` and all of its descendants.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.get(id).is_some() { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Pre-order traversal of the whole document.
    #[must_use]
    pub fn iter_all(&self) -> Descendants<'_> {
        self.descendants(NodeId::ROOT)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator returned by [`DomTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_ignore_repeated_spaces() {
        let el = ElementData::new("p").with_attr("class", "a  b a");
        let classes = el.classes();
        assert_eq!(classes.len(), 2);
        assert!(classes.contains("a"));
        assert!(classes.contains("b"));
    }

    #[test]
    fn test_text_content_only_direct_text() {
        let mut tree = DomTree::new();
        let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
        let _ = tree.append_text(p, "Hello, ");
        let span = tree.append_element(p, ElementData::new("span"));
        let _ = tree.append_text(span, "nested");
        let _ = tree.append_text(p, "world");
        assert_eq!(tree.text_content(p), "Hello, world");
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut tree = DomTree::new();
        let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
        let head = tree.append_element(html, ElementData::new("head"));
        let body = tree.append_element(html, ElementData::new("body"));
        let div = tree.append_element(body, ElementData::new("div"));
        let order: Vec<NodeId> = tree.iter_all().collect();
        assert_eq!(order, vec![NodeId::ROOT, html, head, body, div]);
        assert_eq!(tree.document_element(), Some(html));
        assert_eq!(tree.body(), Some(body));
    }

    #[test]
    fn test_append_child_ignores_unknown_ids() {
        let mut tree = DomTree::new();
        tree.append_child(NodeId::ROOT, NodeId(42));
        assert!(tree.children(NodeId::ROOT).is_empty());
    }
}
