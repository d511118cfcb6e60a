//! The form: a parsed document, its selected `<form>` and the field model.

use std::fmt;
use std::path::Path;

use oxide_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotate::{annotate, Annotations};
use crate::bind::{bind_record, clear_checkable};
use crate::error::{FormError, Result, ValidationErrors};
use crate::extract::extract_fields;
use crate::field::FieldRecord;
use crate::registry::FieldRegistry;
use crate::validation::{collect_errors, CustomValidators, FieldValidator, FormValidator};
use crate::value::{DataSource, FieldValue, FormData};

/// Options applied when constructing a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// The `id` of the form to select; the first form when unset.
    pub form_id: Option<String>,
    /// Class of each generated error element.
    pub error_class: String,
    /// Class of the element wrapping a field's errors.
    pub error_list_class: String,
    /// Whether validation focuses the first erroring text field.
    pub autofocus: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            form_id: None,
            error_class: "error".to_string(),
            error_list_class: "error-list".to_string(),
            autofocus: true,
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the form with this `id`.
    #[must_use]
    pub fn form_id(mut self, id: impl Into<String>) -> Self {
        self.form_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn error_class(mut self, class: impl Into<String>) -> Self {
        self.error_class = class.into();
        self
    }

    #[must_use]
    pub fn error_list_class(mut self, class: impl Into<String>) -> Self {
        self.error_list_class = class.into();
        self
    }

    #[must_use]
    pub const fn autofocus(mut self, autofocus: bool) -> Self {
        self.autofocus = autofocus;
        self
    }
}

/// Flags for a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Check values against the field type and constraints, e.g. that an
    /// `email` field holds an email address.
    pub enforce_field_types: bool,
    /// Render the errors into the document.
    pub write_to_document: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            enforce_field_types: true,
            write_to_document: true,
        }
    }
}

impl ValidateOptions {
    pub const fn new(enforce_field_types: bool, write_to_document: bool) -> Self {
        Self {
            enforce_field_types,
            write_to_document,
        }
    }
}

/// A form defined by HTML markup.
///
/// Owns the parsed document; field records refer to their controls by
/// [`NodeId`].
#[derive(Debug)]
pub struct HtmlForm {
    doc: Document,
    form: NodeId,
    fields: FieldRegistry,
    errors: ValidationErrors,
    options: FormOptions,
    validators: CustomValidators,
    annotations: Annotations,
}

impl HtmlForm {
    /// Parses markup and selects its first form.
    ///
    /// # Errors
    ///
    /// Fails if the markup cannot be parsed or contains no form.
    pub fn parse(html: &str) -> Result<Self> {
        Self::with_options(html, FormOptions::default())
    }

    /// Parses markup and selects the form with the given `id`.
    ///
    /// # Errors
    ///
    /// Fails if the markup cannot be parsed or has no such form.
    pub fn parse_with_id(html: &str, form_id: &str) -> Result<Self> {
        Self::with_options(html, FormOptions::default().form_id(form_id))
    }

    /// Parses markup with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Parse`] for empty markup,
    /// [`FormError::NoForm`] when there is no form at all and
    /// [`FormError::FormNotFound`] when `form_id` matches no form.
    pub fn with_options(html: &str, options: FormOptions) -> Result<Self> {
        let doc = Document::parse(html)?;
        let form = select_form(&doc, options.form_id.as_deref())?;
        let fields = extract_fields(&doc, form);
        debug!(
            form = %form,
            fields = fields.len(),
            implied_wrapper = doc.has_implied_wrapper(),
            recovered = doc.parse_errors().len(),
            "parsed form"
        );

        Ok(Self {
            doc,
            form,
            fields,
            errors: ValidationErrors::new(),
            options,
            validators: CustomValidators::new(),
            annotations: Annotations::default(),
        })
    }

    /// Reads markup from a file and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Io`] if the file cannot be read, otherwise the
    /// errors of [`HtmlForm::with_options`].
    pub fn from_file(path: impl AsRef<Path>, options: FormOptions) -> Result<Self> {
        let html = std::fs::read_to_string(path.as_ref())?;
        Self::with_options(&html, options)
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.get(name)
    }

    /// Errors of the last validation pass.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The selected `<form>` element.
    pub fn form_node(&self) -> NodeId {
        self.form
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Current values of all fields that have one.
    pub fn values(&self) -> FormData {
        self.fields.values()
    }

    /// Binds a value to one field and writes it into the document.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the form has no such field;
    /// nothing is changed in that case.
    pub fn bind_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.bind_field_with(name, value, true)
    }

    /// Binds a value to one field, writing it into the document only when
    /// `write` is set.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the form has no such field.
    pub fn bind_field_with(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        write: bool,
    ) -> Result<()> {
        let record = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        bind_record(&mut self.doc, record, value.into(), write);
        Ok(())
    }

    /// Binds submitted data to every field and writes it into the document.
    ///
    /// Radio and checkbox groups missing from `data` are unchecked, as a
    /// browser would not submit them. Other missing fields keep their value
    /// and keys that match no field are ignored.
    pub fn bind<D: DataSource + ?Sized>(&mut self, data: &D) {
        self.bind_with(data, true);
    }

    /// Like [`HtmlForm::bind`], writing into the document only when `write`
    /// is set.
    pub fn bind_with<D: DataSource + ?Sized>(&mut self, data: &D, write: bool) {
        for record in self.fields.iter_mut() {
            match data.get_value(&record.name) {
                Some(value) => bind_record(&mut self.doc, record, value.clone(), write),
                None => clear_checkable(&mut self.doc, record),
            }
        }
    }

    /// Registers a custom rule for one field, run after its built-in rules.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the form has no such field.
    pub fn add_field_validator(
        &mut self,
        name: &str,
        rule: impl FieldValidator + 'static,
    ) -> Result<()> {
        if !self.fields.contains(name) {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.validators.add_field(name, rule);
        Ok(())
    }

    /// Registers a rule over the whole form, run after all field rules.
    pub fn add_form_validator(&mut self, rule: impl FormValidator + 'static) {
        self.validators.add_form(rule);
    }

    /// Validates with type checks on and errors rendered into the document.
    pub fn validate(&mut self) -> bool {
        self.validate_with(ValidateOptions::default())
    }

    /// Runs a fresh validation pass and returns true if there are no errors.
    ///
    /// When writing to the document, annotations of the previous pass are
    /// removed before the new ones are inserted.
    pub fn validate_with(&mut self, options: ValidateOptions) -> bool {
        self.errors = collect_errors(&self.fields, options.enforce_field_types, &self.validators);

        if options.write_to_document {
            self.annotations.clear(&mut self.doc);
            if !self.errors.is_empty() {
                self.annotations = annotate(
                    &mut self.doc,
                    self.form,
                    &self.fields,
                    &self.errors,
                    &self.options,
                );
            }
        }

        self.errors.is_empty()
    }

    /// Serializes the document, without the wrapper the parser implied.
    pub fn to_html(&self) -> String {
        crate::serialize::to_html(&self.doc)
    }
}

impl fmt::Display for HtmlForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn select_form(doc: &Document, form_id: Option<&str>) -> Result<NodeId> {
    let forms = doc.elements_by_tag_name(doc.root(), "form");
    if forms.is_empty() {
        return Err(FormError::NoForm);
    }
    match form_id {
        None => Ok(forms[0]),
        Some(id) => forms
            .into_iter()
            .find(|&form| doc.attribute(form, "id") == Some(id))
            .ok_or_else(|| FormError::FormNotFound(id.to_string())),
    }
}
