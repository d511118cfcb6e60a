//! # oxide-forms
//!
//! Forms defined by plain HTML markup.
//!
//! The markup is the single source of truth for field names, types,
//! required-ness and options. This crate provides:
//! - Field extraction into an ordered, name-keyed registry, handling radio
//!   groups, checkbox groups, multi-selects and `name="x[]"` fields
//! - Binding of submitted data, optionally mirrored back into the markup
//! - Validation with default messages, custom rules and error annotations
//!   rendered into the document
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_forms::{FieldValue, FormData, HtmlForm};
//!
//! let mut form = HtmlForm::parse(
//!     r#"<form>
//!         <input name="email" type="email" required>
//!         <input type="checkbox" name="topics[]" value="rust">
//!         <input type="checkbox" name="topics[]" value="html">
//!     </form>"#,
//! )
//! .unwrap();
//!
//! assert!(!form.validate());
//! assert_eq!(form.errors().get("email").unwrap(), &["Please fill in this field"]);
//!
//! let mut data = FormData::new();
//! data.insert("email".into(), FieldValue::from("ferris@example.com"));
//! data.insert("topics".into(), FieldValue::from(["html"]));
//! form.bind(&data);
//!
//! assert!(form.validate());
//! assert!(form.to_html().contains(r#"value="html" checked="checked""#));
//! ```
//!
//! ## Custom Validation
//!
//! ```rust
//! use oxide_forms::{FieldRegistry, FieldValue, HtmlForm, ValidationErrors};
//!
//! let mut form = HtmlForm::parse(
//!     r#"<form><input name="password" type="password"><input name="confirm" type="password"></form>"#,
//! )
//! .unwrap();
//!
//! form.add_form_validator(|fields: &FieldRegistry, _: &mut ValidationErrors| {
//!     if fields.value("password") == fields.value("confirm") {
//!         Ok(())
//!     } else {
//!         Err("Passwords do not match".to_string())
//!     }
//! });
//!
//! form.bind_field("password", "hunter2").unwrap();
//! assert!(!form.validate_with(oxide_forms::ValidateOptions::new(true, false)));
//! assert_eq!(form.errors().non_field_errors(), ["Passwords do not match"]);
//! ```

mod annotate;
mod bind;
mod error;
pub mod extract;
pub mod field;
mod form;
pub mod messages;
mod registry;
mod serialize;
pub mod validation;
mod value;

pub use error::{FormError, Result, ValidationErrors, NON_FIELD_ERRORS};
pub use field::{
    Choice, FieldAttributes, FieldRecord, FieldType, SelectOption, Tag, TextConstraints,
};
pub use form::{FormOptions, HtmlForm, ValidateOptions};
pub use registry::FieldRegistry;
pub use validation::{FieldValidator, FormValidator};
pub use value::{form_data_from_json, parse_urlencoded, DataSource, FieldValue, FormData};
