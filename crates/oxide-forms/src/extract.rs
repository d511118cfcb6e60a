//! Builds the field registry from the controls of a form.

use oxide_dom::{Document, NodeId};
use tracing::debug;

use crate::field::{
    strip_array_suffix, Choice, FieldAttributes, FieldRecord, FieldType, SelectOption, Tag,
    TextConstraints,
};
use crate::registry::FieldRegistry;
use crate::value::FieldValue;

/// Walks the `<input>`, `<select>` and `<textarea>` descendants of `form` in
/// document order and merges them into one record per logical name.
///
/// Controls with neither a `name` nor an `id` are skipped since browsers
/// never submit them.
pub fn extract_fields(doc: &Document, form: NodeId) -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    for node in doc.descendants(form) {
        let Some(tag) = doc.tag_name(node).and_then(Tag::from_name) else {
            continue;
        };
        let Some(record) = read_control(doc, node, tag) else {
            continue;
        };
        debug!(
            name = %record.name,
            field_type = %record.field_type,
            node = %node,
            "extracted form control"
        );
        registry.insert_or_merge(record);
    }
    registry
}

fn read_control(doc: &Document, node: NodeId, tag: Tag) -> Option<FieldRecord> {
    let raw_name = doc
        .attribute(node, "name")
        .filter(|name| !name.is_empty())
        .or_else(|| doc.attribute(node, "id").filter(|id| !id.is_empty()))?;

    let (name, array_named) = match strip_array_suffix(raw_name) {
        Some(stripped) => (stripped.to_string(), true),
        None => (raw_name.to_string(), false),
    };

    let field_type = match tag {
        Tag::Input => FieldType::from_input_type(doc.attribute(node, "type")),
        Tag::Select => FieldType::Select,
        Tag::Textarea => FieldType::Textarea,
    };
    let multiple = array_named || doc.has_attribute(node, "multiple");

    let (value, attributes) = match (&tag, &field_type) {
        (Tag::Select, _) => read_select(doc, node, multiple),
        (_, FieldType::Checkbox | FieldType::Radio) => {
            let choice = Choice {
                node,
                value: doc.attribute(node, "value").map(str::to_string),
            };
            let value = doc
                .has_attribute(node, "checked")
                .then(|| FieldValue::from(choice.submitted_value()));
            (
                value,
                FieldAttributes::Checkable {
                    choices: vec![choice],
                },
            )
        }
        (Tag::Textarea, _) => {
            let text = doc.text_content(node);
            let value = (!text.is_empty()).then(|| FieldValue::Single(text));
            (value, FieldAttributes::TextLike(read_constraints(doc, node)))
        }
        _ => (
            doc.attribute(node, "value").map(FieldValue::from),
            FieldAttributes::TextLike(read_constraints(doc, node)),
        ),
    };

    let mut record = FieldRecord {
        name,
        tag,
        field_type,
        nodes: vec![node],
        value,
        required: doc.has_attribute(node, "required"),
        multiple,
        attributes,
    };
    record.normalize_value();
    Some(record)
}

fn read_select(doc: &Document, select: NodeId, multiple: bool) -> (Option<FieldValue>, FieldAttributes) {
    let mut options = Vec::new();
    let mut selected = Vec::new();
    for node in doc.elements_by_tag_name(select, "option") {
        let value = option_value(doc, node);
        if doc.has_attribute(node, "selected") {
            selected.push(value.clone());
        }
        options.push(SelectOption {
            select,
            node,
            value,
        });
    }

    let value = if multiple {
        Some(FieldValue::Multiple(selected))
    } else {
        selected.into_iter().next().map(FieldValue::Single)
    };
    (value, FieldAttributes::Select { options })
}

/// The `value` attribute of an option, or its text with whitespace
/// collapsed.
pub(crate) fn option_value(doc: &Document, option: NodeId) -> String {
    match doc.attribute(option, "value") {
        Some(value) => value.to_string(),
        None => doc
            .text_content(option)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn read_constraints(doc: &Document, node: NodeId) -> TextConstraints {
    let parse_number = |name: &str| {
        doc.attribute(node, name)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|number| number.is_finite())
    };
    TextConstraints {
        maxlength: doc
            .attribute(node, "maxlength")
            .and_then(|raw| raw.trim().parse().ok()),
        min: parse_number("min"),
        max: parse_number("max"),
    }
}
