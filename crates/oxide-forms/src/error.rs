//! Error types for forms.

use indexmap::IndexMap;
use oxide_dom::ParseError;
use serde::Serialize;
use thiserror::Error;

/// Key under which errors not tied to a single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// The markup could not be parsed.
    #[error("failed to parse markup: {0}")]
    Parse(#[from] ParseError),

    /// The document contains no `<form>` element.
    #[error("no <form> element found in markup")]
    NoForm,

    /// The document has no `<form>` with the requested id.
    #[error("no <form> element with id {0:?}")]
    FormNotFound(String),

    /// The field name is not part of the form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Submitted data could not be turned into field values.
    #[error("invalid form data: {0}")]
    InvalidData(String),

    /// Reading markup from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Collection of validation errors by field, in the order fields were
/// reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    /// Errors keyed by field name.
    pub errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates a new empty `ValidationErrors`.
    pub fn new() -> Self {
        Self {
            errors: IndexMap::new(),
        }
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Adds an error that is not tied to a single field.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Returns true if the field has at least one error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Returns the errors stored under [`NON_FIELD_ERRORS`].
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over fields and their messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, messages) in &self.errors {
            for message in messages {
                writeln!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
