//! Markup serialization through html5ever's HTML serializer.
//!
//! Parsing the output again yields an equivalent tree, so
//! `serialize(parse(serialize(parse(x))))` is a fixed point.

use std::io;

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{namespace_url, ns, LocalName, QualName};
use tracing::warn;

use crate::document::Document;
use crate::node::{Element, NodeData, NodeId};

/// Elements whose first newline is dropped by the parser, so a leading
/// newline in their text has to be written twice.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// A node and its subtree, borrowed from the arena.
struct Subtree<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Serialize for Subtree<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.doc, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => write_children(self.doc, self.id, serializer),
        }
    }
}

fn html_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

fn write_children<S: Serializer>(doc: &Document, id: NodeId, serializer: &mut S) -> io::Result<()> {
    for &child in doc.children(id) {
        write_node(doc, child, serializer)?;
    }
    Ok(())
}

fn write_node<S: Serializer>(doc: &Document, id: NodeId, serializer: &mut S) -> io::Result<()> {
    let Some(data) = doc.data(id) else {
        return Ok(());
    };
    match data {
        NodeData::Document => write_children(doc, id, serializer),
        NodeData::Doctype(name) => serializer.write_doctype(name),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Element(element) => write_element(doc, id, element, serializer),
    }
}

fn write_element<S: Serializer>(
    doc: &Document,
    id: NodeId,
    element: &Element,
    serializer: &mut S,
) -> io::Result<()> {
    let name = html_name(&element.name);
    let attributes: Vec<(QualName, &str)> = element
        .attributes
        .iter()
        .map(|attr| {
            let name = QualName::new(None, ns!(), LocalName::from(attr.name.as_str()));
            (name, attr.value.as_str())
        })
        .collect();
    serializer.start_elem(
        name.clone(),
        attributes.iter().map(|(name, value)| (name, *value)),
    )?;

    let leading_newline = LEADING_NEWLINE_ELEMENTS.contains(&element.name.as_str())
        && doc.children(id).first().is_some_and(|&first| {
            matches!(doc.data(first), Some(NodeData::Text(text)) if text.starts_with('\n'))
        });
    if leading_newline {
        serializer.write_text("\n")?;
    }

    write_children(doc, id, serializer)?;
    serializer.end_elem(name)
}

fn render(doc: &Document, id: NodeId, traversal_scope: TraversalScope) -> String {
    let opts = SerializeOpts {
        traversal_scope,
        ..SerializeOpts::default()
    };
    let mut out = Vec::new();
    if let Err(err) = serialize(&mut out, &Subtree { doc, id }, opts) {
        warn!(%err, node = %id, "serialization stopped early");
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Serializes a node including its own tags.
pub(crate) fn serialize_node(doc: &Document, id: NodeId) -> String {
    render(doc, id, TraversalScope::IncludeNode)
}

/// Serializes the children of a node, in the escaping context of the node.
pub(crate) fn serialize_children(doc: &Document, id: NodeId) -> String {
    let context = doc.tag_name(id).map(html_name);
    render(doc, id, TraversalScope::ChildrenOnly(context))
}
