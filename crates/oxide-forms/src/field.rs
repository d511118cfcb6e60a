//! The normalized field model extracted from form controls.

use std::fmt;

use oxide_dom::NodeId;
use serde::{Serialize, Serializer};

use crate::value::FieldValue;

/// The markup element a field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// `<input>`
    Input,
    /// `<select>`
    Select,
    /// `<textarea>`
    Textarea,
}

impl Tag {
    /// Maps a lower-cased tag name to a control tag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "input" => Some(Self::Input),
            "select" => Some(Self::Select),
            "textarea" => Some(Self::Textarea),
            _ => None,
        }
    }
}

/// The kind of a field: the input `type`, or the tag for selects and
/// textareas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Email,
    Url,
    Tel,
    Password,
    Search,
    Number,
    Range,
    Hidden,
    Checkbox,
    Radio,
    Select,
    Textarea,
    /// Any other input type, lower-cased.
    Other(String),
}

impl FieldType {
    /// Resolves the field type of an `<input>` from its `type` attribute.
    pub fn from_input_type(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Text;
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "email" => Self::Email,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "password" => Self::Password,
            "search" => Self::Search,
            "number" => Self::Number,
            "range" => Self::Range,
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Search => "search",
            Self::Number => "number",
            Self::Range => "range",
            Self::Hidden => "hidden",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Other(other) => other,
        }
    }

    /// Radio buttons and checkboxes.
    pub const fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }

    /// Inputs whose `min`/`max` are numeric bounds.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One radio button or checkbox of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    #[serde(skip)]
    pub node: NodeId,
    /// The `value` attribute, if present.
    pub value: Option<String>,
}

impl Choice {
    /// The value a browser submits when the control is checked.
    pub fn submitted_value(&self) -> &str {
        self.value.as_deref().unwrap_or("on")
    }
}

/// One `<option>` of a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// The `<select>` the option belongs to.
    #[serde(skip)]
    pub select: NodeId,
    #[serde(skip)]
    pub node: NodeId,
    /// The `value` attribute, or the option text with whitespace collapsed.
    pub value: String,
}

/// Constraints of text-like inputs and textareas. Attributes that do not
/// parse are left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl TextConstraints {
    /// Fills unset constraints from `other`.
    pub fn merge(&mut self, other: &Self) {
        self.maxlength = self.maxlength.or(other.maxlength);
        self.min = self.min.or(other.min);
        self.max = self.max.or(other.max);
    }
}

/// Attributes meaningful to the kind of field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldAttributes {
    /// Radio buttons and checkboxes.
    Checkable { choices: Vec<Choice> },
    /// Selects, with the options of every select sharing the name.
    Select { options: Vec<SelectOption> },
    /// Every other control.
    TextLike(TextConstraints),
}

impl FieldAttributes {
    /// Merges attributes of a later control with the same name. Attributes of
    /// a different kind are ignored.
    pub fn merge(&mut self, other: Self) {
        match (self, other) {
            (Self::Checkable { choices }, Self::Checkable { choices: more }) => {
                choices.extend(more);
            }
            (Self::Select { options }, Self::Select { options: more }) => options.extend(more),
            (Self::TextLike(constraints), Self::TextLike(more)) => constraints.merge(&more),
            _ => {}
        }
    }
}

/// One logical field, possibly backed by several controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRecord {
    pub name: String,
    pub tag: Tag,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Backing controls in document order.
    #[serde(skip)]
    pub nodes: Vec<NodeId>,
    pub value: Option<FieldValue>,
    pub required: bool,
    /// Set by the `multiple` attribute or a `[]` name suffix; the value is
    /// then always a sequence.
    pub multiple: bool,
    pub attributes: FieldAttributes,
}

impl FieldRecord {
    /// Returns true if the field has no value or an empty one.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, FieldValue::is_empty)
    }

    /// Returns the first backing control.
    pub fn first_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Absorbs a later control declared with the same name.
    ///
    /// The node is appended, presence flags are or-ed, unset attributes are
    /// copied and a second value promotes the field to a sequence.
    pub fn merge(&mut self, other: Self) {
        self.nodes.extend(other.nodes);
        self.required |= other.required;
        self.multiple |= other.multiple;
        self.attributes.merge(other.attributes);

        self.value = match (self.value.take(), other.value) {
            (Some(current), Some(more)) => {
                let mut values = current.into_multiple();
                values.extend(more.into_multiple());
                Some(FieldValue::Multiple(values))
            }
            (current, more) => current.or(more),
        };
        self.normalize_value();
    }

    /// Wraps a scalar value when the field is multiple.
    pub(crate) fn normalize_value(&mut self) {
        if self.multiple {
            if let Some(FieldValue::Single(value)) = self.value.take() {
                self.value = Some(FieldValue::Multiple(vec![value]));
            }
        }
    }
}

/// Strips a trailing `[]` (whitespace allowed between the brackets) from a
/// field name.
pub fn strip_array_suffix(name: &str) -> Option<&str> {
    let inner = name.strip_suffix(']')?.trim_end();
    inner.strip_suffix('[')
}
