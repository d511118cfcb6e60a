//! Rendering validation errors into the document.

use oxide_dom::{Document, NodeId, TreeError};
use tracing::{debug, warn};

use crate::error::{ValidationErrors, NON_FIELD_ERRORS};
use crate::field::{FieldRecord, FieldType};
use crate::form::FormOptions;
use crate::registry::FieldRegistry;

/// Nodes inserted by the last annotation pass, so the next pass can remove
/// them again.
#[derive(Debug, Clone, Default)]
pub(crate) struct Annotations {
    lists: Vec<NodeId>,
    autofocus: Option<NodeId>,
}

impl Annotations {
    /// Detaches previously inserted error lists and drops the `autofocus`
    /// this crate added.
    pub(crate) fn clear(&mut self, doc: &mut Document) {
        for list in self.lists.drain(..) {
            doc.detach(list);
        }
        if let Some(node) = self.autofocus.take() {
            doc.remove_attribute(node, "autofocus");
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.autofocus.is_none()
    }
}

/// Inserts an error list before each erroring field and returns what was
/// inserted.
///
/// Field errors go before the field's display anchor, errors under
/// [`NON_FIELD_ERRORS`] become the first child of the form. The first
/// erroring text field receives `autofocus`.
pub(crate) fn annotate(
    doc: &mut Document,
    form: NodeId,
    fields: &FieldRegistry,
    errors: &ValidationErrors,
    options: &FormOptions,
) -> Annotations {
    let mut annotations = Annotations::default();
    let mut focus_pending = options.autofocus;

    for (name, messages) in errors.iter() {
        let list = error_list(doc, messages, options);

        let inserted = if name == NON_FIELD_ERRORS {
            insert_first(doc, form, list)
        } else if let Some(record) = fields.get(name) {
            if focus_pending && record.field_type == FieldType::Text {
                focus_pending = false;
                annotations.autofocus = set_autofocus(doc, record);
            }
            match display_anchor(doc, record) {
                Some(anchor) => doc.insert_before(anchor, list),
                None => Err(TreeError::UnknownNode(list)),
            }
        } else {
            warn!(field = name, "errors reported for a field that is not part of the form");
            continue;
        };

        match inserted {
            Ok(()) => annotations.lists.push(list),
            Err(e) => warn!(field = name, error = %e, "could not insert error list"),
        }
    }

    debug!(lists = annotations.lists.len(), "annotated document with errors");
    annotations
}

/// The node error markup is inserted before: the field's first control, or
/// the `<label>` wrapping it.
pub(crate) fn display_anchor(doc: &Document, record: &FieldRecord) -> Option<NodeId> {
    let node = record.first_node()?;
    match doc.parent(node) {
        Some(parent) if doc.is_element(parent, "label") => Some(parent),
        _ => Some(node),
    }
}

fn error_list(doc: &mut Document, messages: &[String], options: &FormOptions) -> NodeId {
    let list = doc.create_element("div");
    doc.set_attribute(list, "class", options.error_list_class.as_str());
    for message in messages {
        let item = doc.create_element("div");
        doc.set_attribute(item, "class", options.error_class.as_str());
        let text = doc.create_text(message);
        // Freshly created nodes cannot form a cycle.
        if doc.append_child(item, text).is_ok() {
            let _ = doc.append_child(list, item);
        }
    }
    list
}

fn insert_first(doc: &mut Document, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
    match doc.children(parent).first().copied() {
        Some(first) => doc.insert_before(first, node),
        None => doc.append_child(parent, node),
    }
}

/// Sets `autofocus` on the field's first control and returns the node if
/// this call added it.
fn set_autofocus(doc: &mut Document, record: &FieldRecord) -> Option<NodeId> {
    let node = record.first_node()?;
    if doc.has_attribute(node, "autofocus") {
        return None;
    }
    doc.set_attribute(node, "autofocus", "autofocus");
    Some(node)
}
