//! Tests for mutating a parsed tree and serializing it again.

mod common;
use common::*;

use oxide_dom::{NodeData, TreeError};

#[test]
fn insert_before_places_new_sibling() {
    let mut doc = parse(r#"<form><label><input id="a"></label></form>"#);
    let input = by_id(&doc, "a");
    let label = doc.parent(input).unwrap();
    let note = doc.create_element("div");
    doc.set_attribute(note, "class", "note");
    let text = doc.create_text("heads up");
    doc.append_child(note, text).unwrap();
    doc.insert_before(label, note).unwrap();

    let form = doc.parent(label).unwrap();
    assert_eq!(
        doc.inner_html(form),
        r#"<div class="note">heads up</div><label><input id="a"></label>"#
    );
}

#[test]
fn detach_removes_subtree_from_output() {
    let mut doc = parse(r#"<div id="outer"><p id="inner">x</p>y</div>"#);
    let inner = by_id(&doc, "inner");
    doc.detach(inner);
    assert_eq!(doc.inner_html(by_id(&doc, "outer")), "y");
    assert_eq!(doc.parent(inner), None);
    assert_eq!(doc.element_by_id("inner"), None);
}

#[test]
fn append_child_rejects_cycles() {
    let mut doc = parse(r#"<div id="a"><div id="b"></div></div>"#);
    let a = by_id(&doc, "a");
    let b = by_id(&doc, "b");
    assert_eq!(doc.append_child(b, a), Err(TreeError::Cycle { node: a }));
}

#[test]
fn insert_before_detached_reference_fails() {
    let mut doc = parse("<p>x</p>");
    let loose = doc.create_element("span");
    let other = doc.create_element("b");
    assert_eq!(
        doc.insert_before(loose, other),
        Err(TreeError::Detached(loose))
    );
}

#[test]
fn set_text_content_replaces_children() {
    let mut doc = parse(r#"<textarea id="t">old &amp; stale</textarea>"#);
    let t = by_id(&doc, "t");
    assert_eq!(doc.text_content(t), "old & stale");
    doc.set_text_content(t, "new <text>");
    assert_eq!(doc.outer_html(t), r#"<textarea id="t">new &lt;text&gt;</textarea>"#);
    doc.set_text_content(t, "");
    assert!(doc.children(t).is_empty());
}

#[test]
fn toggle_attribute_round_trips() {
    let mut doc = parse(r#"<input id="c" type="checkbox">"#);
    let c = by_id(&doc, "c");
    doc.toggle_attribute(c, "checked", true);
    assert_eq!(doc.attribute(c, "checked"), Some("checked"));
    doc.toggle_attribute(c, "checked", false);
    assert!(!doc.has_attribute(c, "checked"));
}

#[test]
fn attribute_names_are_case_insensitive() {
    let doc = parse(r#"<INPUT ID="x" Name="first">"#);
    let x = by_id(&doc, "x");
    assert_eq!(doc.tag_name(x), Some("input"));
    assert_eq!(doc.attribute(x, "NAME"), Some("first"));
}

#[test]
fn descendants_are_in_document_order() {
    let doc = parse("<div><p>a</p><span><b>b</b></span></div>");
    let names: Vec<&str> = doc
        .descendants(body(&doc))
        .filter_map(|node| doc.tag_name(node))
        .collect();
    assert_eq!(names, ["div", "p", "span", "b"]);
}

#[test]
fn comments_are_kept_as_nodes() {
    let doc = parse("<div><!-- note --></div>");
    let div = doc.elements_by_tag_name(doc.root(), "div")[0];
    let child = doc.children(div)[0];
    assert_eq!(doc.data(child), Some(&NodeData::Comment(" note ".to_string())));
}

#[test]
fn only_empty_input_is_rejected() {
    assert_eq!(parse_err("").message, "Empty markup supplied");
    for html in ["<div", "<a href=\"x>", "<!-- x", "<script>x", "<textarea>x", "</p>"] {
        let doc = parse(html);
        assert!(!doc.children(doc.root()).is_empty(), "empty tree for {html}");
    }
}

#[test]
fn unclosed_textarea_swallows_the_rest_as_text() {
    let doc = parse("<form><textarea id=t>hi</form><p>after</p>");
    assert_eq!(doc.text_content(by_id(&doc, "t")), "hi</form><p>after</p>");
    assert!(doc.elements_by_tag_name(doc.root(), "p").is_empty());
}

#[test]
fn character_references_are_decoded() {
    let doc = parse("<select><option id=o>Caf&eacute;&nbsp;cr&egrave;me</option></select>");
    assert_eq!(doc.text_content(by_id(&doc, "o")), "Caf\u{e9}\u{a0}cr\u{e8}me");
}

#[test]
fn textarea_drops_its_first_newline() {
    let doc = parse("<textarea id=t>\nhello</textarea>");
    assert_eq!(doc.text_content(by_id(&doc, "t")), "hello");
}
