//! Built-in and custom validation rules.
//!
//! Computing errors is a pure function of the field registry; rendering them
//! into the document is a separate pass (see the annotation pass in `HtmlForm::validate_with`).

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::error::ValidationErrors;
use crate::field::{FieldAttributes, FieldRecord, FieldType};
use crate::messages;
use crate::registry::FieldRegistry;
use crate::value::FieldValue;

/// The whole value must be one address; display-name forms such as
/// `John <john@example.com>` are rejected.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Trait for single-value validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator for email addresses. Any non-whitespace characters are accepted
/// on either side of the `@`, so international addresses pass.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new `EmailValidator` with the default message.
    pub fn new() -> Self {
        Self::with_message(messages::EMAIL)
    }

    /// Creates a new `EmailValidator` with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for absolute URLs with a host, such as `https://example.com`.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    message: String,
}

impl UrlValidator {
    /// Creates a new `UrlValidator` with the default message.
    pub fn new() -> Self {
        Self::with_message(messages::URL)
    }

    /// Creates a new `UrlValidator` with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for UrlValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match url::Url::parse(value.trim()) {
            Ok(url) if url.has_host() => Ok(()),
            _ => Err(self.message.clone()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum length in characters.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: messages::max_length(max_length),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.chars().count() > self.max_length {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for a numeric lower or upper bound. Values that are not numbers
/// are left to other rules.
#[derive(Debug, Clone)]
pub struct BoundValidator {
    bound: f64,
    lower: bool,
    message: String,
}

impl BoundValidator {
    /// Rejects numbers below `min`.
    pub fn min(min: f64) -> Self {
        Self {
            bound: min,
            lower: true,
            message: messages::min_value(min),
        }
    }

    /// Rejects numbers above `max`.
    pub fn max(max: f64) -> Self {
        Self {
            bound: max,
            lower: false,
            message: messages::max_value(max),
        }
    }
}

impl Validator for BoundValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let Ok(num) = value.trim().parse::<f64>() else {
            return Ok(());
        };
        let out_of_range = if self.lower {
            num < self.bound
        } else {
            num > self.bound
        };
        if out_of_range {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// A custom rule attached to one field.
///
/// Receives the field's current value and the whole registry; an `Err`
/// message is added to the field's errors.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: Option<&FieldValue>, fields: &FieldRegistry) -> Result<(), String>;
}

impl<F> FieldValidator for F
where
    F: Fn(Option<&FieldValue>, &FieldRegistry) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: Option<&FieldValue>, fields: &FieldRegistry) -> Result<(), String> {
        self(value, fields)
    }
}

/// A custom rule over the whole form.
///
/// May add errors for any field directly; an `Err` message is stored under
/// [`NON_FIELD_ERRORS`](crate::NON_FIELD_ERRORS).
pub trait FormValidator: Send + Sync {
    fn validate(&self, fields: &FieldRegistry, errors: &mut ValidationErrors) -> Result<(), String>;
}

impl<F> FormValidator for F
where
    F: Fn(&FieldRegistry, &mut ValidationErrors) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, fields: &FieldRegistry, errors: &mut ValidationErrors) -> Result<(), String> {
        self(fields, errors)
    }
}

/// Registered custom rules, run after the built-in ones in registration
/// order.
#[derive(Default)]
pub struct CustomValidators {
    field: IndexMap<String, Vec<Box<dyn FieldValidator>>>,
    form: Vec<Box<dyn FormValidator>>,
}

impl CustomValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, name: impl Into<String>, rule: impl FieldValidator + 'static) {
        self.field.entry(name.into()).or_default().push(Box::new(rule));
    }

    pub fn add_form(&mut self, rule: impl FormValidator + 'static) {
        self.form.push(Box::new(rule));
    }

    fn for_field(&self, name: &str) -> &[Box<dyn FieldValidator>] {
        self.field
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for CustomValidators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidators")
            .field("field", &self.field.keys().collect::<Vec<_>>())
            .field("form", &self.form.len())
            .finish()
    }
}

/// Runs every rule over the registry and returns the errors, keyed by field
/// in registry order, with form-level errors last.
pub fn collect_errors(
    fields: &FieldRegistry,
    enforce_field_types: bool,
    custom: &CustomValidators,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for record in fields {
        let mut messages = builtin_errors(record, enforce_field_types);
        for rule in custom.for_field(&record.name) {
            if let Err(message) = rule.validate(record.value.as_ref(), fields) {
                messages.push(message);
            }
        }
        for message in messages {
            errors.add(&record.name, message);
        }
    }

    for rule in &custom.form {
        if let Err(message) = rule.validate(fields, &mut errors) {
            errors.add_non_field(message);
        }
    }

    debug!(fields = fields.len(), invalid = errors.len(), "collected validation errors");
    errors
}

fn builtin_errors(record: &FieldRecord, enforce_field_types: bool) -> Vec<String> {
    let mut errors = Vec::new();

    if record.required && record.is_empty() {
        errors.push(required_message(record).to_string());
    }

    let Some(value) = record.value.as_ref().filter(|value| !value.is_empty()) else {
        return errors;
    };
    if !enforce_field_types {
        return errors;
    }

    for rule in type_rules(record) {
        if let Some(message) = value
            .as_slice()
            .iter()
            .find_map(|item| rule.validate(item).err())
        {
            errors.push(message);
        }
    }
    errors
}

fn required_message(record: &FieldRecord) -> &'static str {
    match record.field_type {
        FieldType::Radio => messages::REQUIRED_RADIO,
        FieldType::Checkbox => messages::REQUIRED_CHECKBOX,
        FieldType::Select if record.multiple => messages::REQUIRED_SELECT_MULTIPLE,
        FieldType::Select => messages::REQUIRED_SELECT,
        _ => messages::REQUIRED,
    }
}

fn type_rules(record: &FieldRecord) -> Vec<Box<dyn Validator>> {
    let mut rules: Vec<Box<dyn Validator>> = Vec::new();
    match record.field_type {
        FieldType::Email => rules.push(Box::new(EmailValidator::new())),
        FieldType::Url => rules.push(Box::new(UrlValidator::new())),
        _ => {}
    }
    if let FieldAttributes::TextLike(constraints) = &record.attributes {
        if let Some(max) = constraints.maxlength {
            rules.push(Box::new(MaxLengthValidator::new(max)));
        }
        if record.field_type.is_numeric() {
            if let Some(min) = constraints.min {
                rules.push(Box::new(BoundValidator::min(min)));
            }
            if let Some(max) = constraints.max {
                rules.push(Box::new(BoundValidator::max(max)));
            }
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_fields;
    use oxide_dom::Document;

    fn registry(html: &str) -> FieldRegistry {
        let doc = Document::parse(html).unwrap();
        let form = doc.elements_by_tag_name(doc.root(), "form")[0];
        extract_fields(&doc, form)
    }

    #[test]
    fn test_email_validator() {
        let v = EmailValidator::new();
        assert!(v.validate("valid@example.com").is_ok());
        assert!(v.validate("имя@домен.рф").is_ok());
        assert!(v.validate("not-a-proper-email").is_err());
        assert!(v.validate("two words@example.com").is_err());
        assert!(v.validate("a@b@c.d").is_err());
        assert!(v.validate("John <john@example.com>").is_err());
        assert!(v.validate("see john@example.com").is_err());
        assert_eq!(v.message(), messages::EMAIL);
    }

    #[test]
    fn test_url_validator() {
        let v = UrlValidator::new();
        assert!(v.validate("https://example.com").is_ok());
        assert!(v.validate("ftp://files.example.com/a").is_ok());
        assert!(v.validate("example.com").is_err());
        assert!(v.validate("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let v = MaxLengthValidator::new(3);
        assert!(v.validate("abc").is_ok());
        assert!(v.validate("äöü").is_ok());
        assert_eq!(
            v.validate("abcd"),
            Err("Please shorten this text to 3 characters or less".to_string())
        );
    }

    #[test]
    fn test_bound_validator() {
        let min = BoundValidator::min(1.0);
        let max = BoundValidator::max(10.5);
        assert!(min.validate("1").is_ok());
        assert_eq!(
            min.validate("0"),
            Err("Please enter a value greater than or equal to 1".to_string())
        );
        assert_eq!(
            max.validate("11"),
            Err("Please enter a value less than or equal to 10.5".to_string())
        );
        assert!(max.validate("not a number").is_ok());
    }

    #[test]
    fn test_required_messages() {
        let fields = registry(
            r#"<form>
                <input name=text required>
                <input type=radio name=radio value=a required>
                <input type=checkbox name=check required>
                <select name=single required><option>a</option></select>
                <select name=many multiple required><option>a</option></select>
                <textarea name=area required></textarea>
            </form>"#,
        );
        let errors = collect_errors(&fields, true, &CustomValidators::new());
        let first = |name: &str| errors.get(name).unwrap()[0].as_str();
        assert_eq!(first("text"), messages::REQUIRED);
        assert_eq!(first("radio"), messages::REQUIRED_RADIO);
        assert_eq!(first("check"), messages::REQUIRED_CHECKBOX);
        assert_eq!(first("single"), messages::REQUIRED_SELECT);
        assert_eq!(first("many"), messages::REQUIRED_SELECT_MULTIPLE);
        assert_eq!(first("area"), messages::REQUIRED);
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_type_rules_are_gated() {
        let fields = registry(
            r#"<form><input type=email name=e value=nope><input type=number name=n min=5 value=3></form>"#,
        );
        let enforced = collect_errors(&fields, true, &CustomValidators::new());
        assert_eq!(enforced.get("e").unwrap(), &[messages::EMAIL]);
        assert_eq!(
            enforced.get("n").unwrap(),
            &["Please enter a value greater than or equal to 5"]
        );
        assert!(collect_errors(&fields, false, &CustomValidators::new()).is_empty());
    }

    #[test]
    fn test_min_max_only_apply_to_numeric_inputs() {
        let fields = registry(r#"<form><input name=t min=5 value=3></form>"#);
        assert!(collect_errors(&fields, true, &CustomValidators::new()).is_empty());
    }

    #[test]
    fn test_email_checked_on_every_element() {
        let fields = registry(
            r#"<form><input type=email name="e[]" value="a@b.c"><input type=email name="e[]" value="bad"></form>"#,
        );
        let errors = collect_errors(&fields, true, &CustomValidators::new());
        assert_eq!(errors.get("e").unwrap().len(), 1);
    }

    #[test]
    fn test_custom_rules_run_after_builtins() {
        let fields = registry(r#"<form><input name=a required><input name=b value=x></form>"#);
        let mut custom = CustomValidators::new();
        custom.add_field("a", |_: Option<&FieldValue>, _: &FieldRegistry| -> Result<(), String> {
            Err("custom a".to_string())
        });
        custom.add_field("b", |value: Option<&FieldValue>, _: &FieldRegistry| {
            match value {
                Some(v) if v.contains("x") => Err("no x allowed".to_string()),
                _ => Ok(()),
            }
        });
        custom.add_form(|_: &FieldRegistry, errors: &mut ValidationErrors| -> Result<(), String> {
            errors.add("b", "from form");
            Err("form level".to_string())
        });

        let errors = collect_errors(&fields, true, &custom);
        assert_eq!(errors.get("a").unwrap(), &[messages::REQUIRED, "custom a"]);
        assert_eq!(errors.get("b").unwrap(), &["no x allowed", "from form"]);
        assert_eq!(errors.non_field_errors(), ["form level"]);
        let order: Vec<&str> = errors.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["a", "b", crate::NON_FIELD_ERRORS]);
    }
}
