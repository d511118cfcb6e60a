//! Arena-backed document tree.

use tracing::warn;

use crate::error::{ParseError, TreeError};
use crate::node::{Element, Node, NodeData, NodeId};

/// A parsed HTML document.
///
/// All nodes live in a single arena owned by the document and are addressed
/// by [`NodeId`]. Ids handed out by a document stay valid for its whole
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    implied_wrapper: bool,
    parse_errors: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            implied_wrapper: false,
            parse_errors: Vec::new(),
        }
    }

    /// Parses markup into a document with html5ever.
    ///
    /// Malformed markup is repaired the way a browser repairs it; the problems
    /// found on the way are available from [`Document::parse_errors`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for empty input.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        crate::parser::parse(html)
    }

    /// Returns the document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns true if the markup had no doctype and no `<html>`, `<head>` or
    /// `<body>` tag, so the whole skeleton was implied by the parser.
    #[must_use]
    pub const fn has_implied_wrapper(&self) -> bool {
        self.implied_wrapper
    }

    pub(crate) fn set_implied_wrapper(&mut self, implied: bool) {
        self.implied_wrapper = implied;
    }

    /// Returns the problems the parser recovered from, in input order.
    #[must_use]
    pub fn parse_errors(&self) -> &[String] {
        &self.parse_errors
    }

    pub(crate) fn set_parse_errors(&mut self, errors: Vec<String>) {
        self.parse_errors = errors;
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Returns the payload of a node.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|node| &node.data)
    }

    /// Returns the element payload of a node, if it is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id)? {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the lower-cased tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    /// Returns true if the node is an element with the given tag name.
    #[must_use]
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Returns the children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over the descendants of a node in document (pre-)order,
    /// excluding the node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Returns the descendant elements with the given tag name, in document
    /// order.
    #[must_use]
    pub fn elements_by_tag_name(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| self.is_element(node, tag))
            .collect()
    }

    /// Returns the first element whose `id` attribute equals `value`.
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&node| self.attribute(node, "id") == Some(value))
    }

    /// Returns the value of an attribute on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// Returns true if an element node carries the attribute.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Sets an attribute on an element node. Non-element nodes are left
    /// untouched.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.set_attribute(name, value);
        }
    }

    /// Removes an attribute from an element node, returning the old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    /// Sets `name="name"` when `on` is true, removes the attribute otherwise.
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, on: bool) {
        if on {
            self.set_attribute(id, name, name);
        } else {
            self.remove_attribute(id, name);
        }
    }

    /// Returns the concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(NodeData::Text(text)) = self.data(id) {
            return text.clone();
        }
        self.descendants(id)
            .filter_map(|node| match self.data(node) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replaces all children of a node with a single text node.
    ///
    /// An empty string leaves the node without children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        if !text.is_empty() {
            self.append_new(id, NodeData::Text(text.to_string()));
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(name.to_ascii_lowercase())))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Creates a detached node from an arbitrary payload.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.push(data)
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.node(parent).is_none() {
            return Err(TreeError::UnknownNode(parent));
        }
        if self.node(child).is_none() {
            return Err(TreeError::UnknownNode(child));
        }
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(TreeError::Cycle { node: child });
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    /// Unlinks a node from its parent. The node and its subtree stay in the
    /// arena and can be re-inserted.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// current position first.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown or `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Inserts `new` as the previous sibling of `reference`.
    ///
    /// # Errors
    ///
    /// Fails if `reference` has no parent, if either id is unknown, or if the
    /// insertion would create a cycle.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self
            .parent(reference)
            .ok_or(TreeError::Detached(reference))?;
        self.check_insert(parent, new)?;
        if new == reference {
            return Ok(());
        }
        self.detach(new);
        if let Some(node) = self.node_mut(parent) {
            let index = node
                .children
                .iter()
                .position(|&child| child == reference)
                .unwrap_or(node.children.len());
            node.children.insert(index, new);
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Creates a node and appends it to `parent` without the checks of
    /// [`Document::append_child`].
    fn append_new(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.push(data);
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    fn text_mut(&mut self, id: Option<NodeId>) -> Option<&mut String> {
        match &mut self.node_mut(id?)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Appends text to `parent`, merging with a trailing text child.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.children(parent).last().copied();
        if let Some(existing) = self.text_mut(last) {
            existing.push_str(text);
            return;
        }
        self.append_new(parent, NodeData::Text(text.to_string()));
    }

    /// Inserts text before `reference`, merging with a preceding text
    /// sibling. Does nothing when `reference` is detached.
    pub(crate) fn insert_text_before(&mut self, reference: NodeId, text: &str) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let siblings = self.children(parent);
        let previous = siblings
            .iter()
            .position(|&child| child == reference)
            .and_then(|index| index.checked_sub(1))
            .map(|index| siblings[index]);
        if let Some(existing) = self.text_mut(previous) {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text);
        if let Err(err) = self.insert_before(reference, node) {
            warn!(%err, "could not insert text node");
        }
    }

    /// Serializes the whole document.
    #[must_use]
    pub fn to_html(&self) -> String {
        crate::serialize::serialize_children(self, self.root)
    }

    /// Serializes a node including its own tags.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        crate::serialize::serialize_node(self, id)
    }

    /// Serializes the children of a node.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        crate::serialize::serialize_children(self, id)
    }
}

/// Pre-order iterator over the descendants of a node.
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
