#![allow(dead_code)]

use oxide_dom::{Document, NodeId, ParseError};

pub fn parse(html: &str) -> Document {
    Document::parse(html).unwrap_or_else(|e| panic!("Failed to parse: {html}\nError: {e:?}"))
}

pub fn parse_err(html: &str) -> ParseError {
    Document::parse(html).expect_err(&format!("Expected parse error for: {html}"))
}

pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.element_by_id(id)
        .unwrap_or_else(|| panic!("No element with id {id}"))
}

pub fn body(doc: &Document) -> NodeId {
    doc.elements_by_tag_name(doc.root(), "body")[0]
}
