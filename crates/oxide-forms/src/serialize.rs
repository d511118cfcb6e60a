//! Serializing the form document back to markup.

use oxide_dom::{Document, NodeId};

/// Serializes the document, leaving out the `<html>`, `<head>` and `<body>`
/// skeleton when the parser implied it.
///
/// Without a skeleton in the source, html5ever still files leading comments
/// under the document and metadata elements such as `<style>` under
/// `<head>`; those are emitted in place, only the skeleton tags are dropped.
pub fn to_html(doc: &Document) -> String {
    if !doc.has_implied_wrapper() {
        return doc.to_html();
    }
    let mut out = String::new();
    for &node in doc.children(doc.root()) {
        if doc.is_element(node, "html") {
            for &section in doc.children(node) {
                out.push_str(&unwrap_skeleton(doc, section));
            }
        } else {
            out.push_str(&doc.outer_html(node));
        }
    }
    out
}

fn unwrap_skeleton(doc: &Document, node: NodeId) -> String {
    if doc.is_element(node, "head") || doc.is_element(node, "body") {
        doc.inner_html(node)
    } else {
        doc.outer_html(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_wrapper_is_stripped() {
        let doc = Document::parse(r#"<form id="f"><input name="a"></form>"#).unwrap();
        assert_eq!(to_html(&doc), r#"<form id="f"><input name="a"></form>"#);
    }

    #[test]
    fn test_authored_document_is_kept() {
        let html = "<!DOCTYPE html><html><head></head><body><form></form></body></html>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(to_html(&doc), html);
    }

    #[test]
    fn test_leading_comment_and_head_content_survive() {
        let html = "<!-- signup --><style>p { margin: 0 }</style><form><input name=a></form>";
        let first = to_html(&Document::parse(html).unwrap());
        assert_eq!(
            first,
            r#"<!-- signup --><style>p { margin: 0 }</style><form><input name="a"></form>"#
        );
        assert_eq!(to_html(&Document::parse(&first).unwrap()), first);
    }

    #[test]
    fn test_fragment_round_trip() {
        let first = to_html(&Document::parse("<p>Intro<form><input name=a value='x y'></form>").unwrap());
        let second = to_html(&Document::parse(&first).unwrap());
        assert_eq!(first, second);
        assert_eq!(first, r#"<p>Intro</p><form><input name="a" value="x y"></form>"#);
    }
}
