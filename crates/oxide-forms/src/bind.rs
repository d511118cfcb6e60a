//! Writing bound values into field records and their controls.

use oxide_dom::{Document, NodeId};
use tracing::debug;

use crate::field::{FieldAttributes, FieldRecord, FieldType, Tag};
use crate::value::FieldValue;

/// Stores `value` on the record and, when `write` is set, mirrors it into the
/// backing controls.
///
/// Checkable groups are always unchecked first, so binding in memory only
/// leaves them unchecked in the markup.
pub(crate) fn bind_record(doc: &mut Document, record: &mut FieldRecord, value: FieldValue, write: bool) {
    if record.field_type.is_checkable() {
        set_checked(doc, record, |_| false);
    }

    if write {
        match (&record.attributes, record.tag) {
            (FieldAttributes::Checkable { .. }, _) => {
                // A choice without a value attribute submits "on", alone or in a group.
                set_checked(doc, record, |submitted| value.contains(submitted));
            }
            (FieldAttributes::Select { options }, _) => {
                let first = record.first_node();
                for option in options.iter().filter(|option| Some(option.select) == first) {
                    doc.toggle_attribute(option.node, "selected", value.contains(&option.value));
                }
            }
            (FieldAttributes::TextLike(_), Tag::Textarea) => {
                write_positional(&record.nodes, &value, |node, text| {
                    doc.set_text_content(node, text.unwrap_or_default());
                });
            }
            (FieldAttributes::TextLike(_), _) if record.field_type == FieldType::Password => {}
            (FieldAttributes::TextLike(_), _) => {
                write_positional(&record.nodes, &value, |node, text| match text {
                    Some(text) => doc.set_attribute(node, "value", text),
                    None => {
                        doc.remove_attribute(node, "value");
                    }
                });
            }
        }
    }

    debug!(field = %record.name, write, "bound field value");
    record.value = Some(value);
}

/// Unchecks a radio or checkbox group and clears its value. Other fields are
/// left as they are.
pub(crate) fn clear_checkable(doc: &mut Document, record: &mut FieldRecord) {
    if !record.field_type.is_checkable() {
        return;
    }
    set_checked(doc, record, |_| false);
    record.value = None;
}

fn set_checked(doc: &mut Document, record: &FieldRecord, checked: impl Fn(&str) -> bool) {
    let FieldAttributes::Checkable { choices } = &record.attributes else {
        return;
    };
    for choice in choices {
        doc.toggle_attribute(choice.node, "checked", checked(choice.submitted_value()));
    }
}

/// A sequence is spread over the nodes in order, surplus nodes receiving
/// `None`. A scalar goes to the first node only.
fn write_positional(nodes: &[NodeId], value: &FieldValue, mut write: impl FnMut(NodeId, Option<&str>)) {
    match value {
        FieldValue::Single(text) => {
            if let Some(&node) = nodes.first() {
                write(node, Some(text));
            }
        }
        FieldValue::Multiple(values) => {
            for (index, &node) in nodes.iter().enumerate() {
                write(node, values.get(index).map(String::as_str));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_fields;
    use crate::registry::FieldRegistry;

    fn setup(html: &str) -> (Document, FieldRegistry) {
        let doc = Document::parse(html).unwrap();
        let form = doc.elements_by_tag_name(doc.root(), "form")[0];
        let registry = extract_fields(&doc, form);
        (doc, registry)
    }

    fn bind(doc: &mut Document, registry: &mut FieldRegistry, name: &str, value: impl Into<FieldValue>) {
        let record = registry.get_mut(name).unwrap();
        bind_record(doc, record, value.into(), true);
    }

    #[test]
    fn test_checkbox_group_toggling() {
        let (mut doc, mut registry) = setup(
            r#"<form><input type=checkbox name="x[]" value=a id=a checked><input type=checkbox name="x[]" value=b id=b checked><input type=checkbox name="x[]" value=c id=c checked></form>"#,
        );
        bind(&mut doc, &mut registry, "x", ["b"]);
        let checked: Vec<bool> = ["a", "b", "c"]
            .iter()
            .map(|id| doc.has_attribute(doc.element_by_id(id).unwrap(), "checked"))
            .collect();
        assert_eq!(checked, [false, true, false]);
    }

    #[test]
    fn test_checkbox_without_value_checks_on() {
        let (mut doc, mut registry) = setup(r#"<form><input type=checkbox name=agree id=agree></form>"#);
        bind(&mut doc, &mut registry, "agree", "on");
        assert_eq!(doc.attribute(doc.element_by_id("agree").unwrap(), "checked"), Some("checked"));
        bind(&mut doc, &mut registry, "agree", "yes");
        assert!(!doc.has_attribute(doc.element_by_id("agree").unwrap(), "checked"));
    }

    #[test]
    fn test_valueless_checkbox_in_group_matches_on() {
        let (mut doc, mut registry) = setup(
            r#"<form><input type=checkbox name="x[]" id=plain><input type=checkbox name="x[]" value=b id=b></form>"#,
        );
        let checked = |doc: &Document, id: &str| doc.has_attribute(doc.element_by_id(id).unwrap(), "checked");

        bind(&mut doc, &mut registry, "x", ["on", "b"]);
        assert!(checked(&doc, "plain"));
        assert!(checked(&doc, "b"));

        bind(&mut doc, &mut registry, "x", ["", "b"]);
        assert!(!checked(&doc, "plain"));
        assert!(checked(&doc, "b"));
    }

    #[test]
    fn test_memory_only_bind_still_unchecks() {
        let (mut doc, mut registry) = setup(r#"<form><input type=radio name=r value=a id=a checked></form>"#);
        let record = registry.get_mut("r").unwrap();
        bind_record(&mut doc, record, "a".into(), false);
        assert!(!doc.has_attribute(doc.element_by_id("a").unwrap(), "checked"));
        assert_eq!(registry.value("r"), Some(&FieldValue::from("a")));
    }

    #[test]
    fn test_select_toggles_options() {
        let (mut doc, mut registry) = setup(
            "<form><select name=s multiple><option id=o1 selected>a</option><option id=o2 value=b>B</option></select></form>",
        );
        bind(&mut doc, &mut registry, "s", ["b"]);
        assert!(!doc.has_attribute(doc.element_by_id("o1").unwrap(), "selected"));
        assert_eq!(doc.attribute(doc.element_by_id("o2").unwrap(), "selected"), Some("selected"));
    }

    #[test]
    fn test_select_writes_first_select_only() {
        let (mut doc, mut registry) = setup(
            "<form><select name=s><option id=a>x</option></select><select name=s><option id=b>x</option></select></form>",
        );
        bind(&mut doc, &mut registry, "s", "x");
        assert!(doc.has_attribute(doc.element_by_id("a").unwrap(), "selected"));
        assert!(!doc.has_attribute(doc.element_by_id("b").unwrap(), "selected"));
    }

    #[test]
    fn test_textarea_text_is_replaced() {
        let (mut doc, mut registry) = setup("<form><textarea name=t id=t>old</textarea></form>");
        bind(&mut doc, &mut registry, "t", "new & <shiny>");
        let t = doc.element_by_id("t").unwrap();
        assert_eq!(doc.text_content(t), "new & <shiny>");
        assert_eq!(doc.inner_html(t), "new &amp; &lt;shiny&gt;");
    }

    #[test]
    fn test_array_named_inputs_are_written_positionally() {
        let (mut doc, mut registry) = setup(
            r#"<form><input name="n[]" id=a><input name="n[]" id=b value=old><input name="n[]" id=c value=old></form>"#,
        );
        bind(&mut doc, &mut registry, "n", ["1", "2"]);
        let value = |id: &str| doc.attribute(doc.element_by_id(id).unwrap(), "value").map(str::to_string);
        assert_eq!(value("a").as_deref(), Some("1"));
        assert_eq!(value("b").as_deref(), Some("2"));
        assert_eq!(value("c"), None);
    }

    #[test]
    fn test_password_is_never_written() {
        let (mut doc, mut registry) = setup(r#"<form><input type=password name=p id=p></form>"#);
        bind(&mut doc, &mut registry, "p", "secret");
        assert!(!doc.has_attribute(doc.element_by_id("p").unwrap(), "value"));
        assert_eq!(registry.value("p"), Some(&FieldValue::from("secret")));
    }

    #[test]
    fn test_clear_checkable_only_touches_groups() {
        let (mut doc, mut registry) = setup(
            r#"<form><input type=checkbox name=c id=c checked><input name=t value=keep></form>"#,
        );
        clear_checkable(&mut doc, registry.get_mut("c").unwrap());
        clear_checkable(&mut doc, registry.get_mut("t").unwrap());
        assert!(!doc.has_attribute(doc.element_by_id("c").unwrap(), "checked"));
        assert_eq!(registry.value("c"), None);
        assert_eq!(registry.value("t"), Some(&FieldValue::from("keep")));
    }
}
