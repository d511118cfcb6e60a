#![allow(dead_code)]

use std::path::PathBuf;

use oxide_dom::NodeId;
use oxide_forms::{FieldValue, FormData, FormOptions, HtmlForm};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test.html")
}

pub fn fixture_html() -> String {
    std::fs::read_to_string(fixture_path()).expect("fixture is readable")
}

pub fn load_fixture() -> HtmlForm {
    HtmlForm::from_file(fixture_path(), FormOptions::default())
        .unwrap_or_else(|e| panic!("Failed to load fixture: {e:?}"))
}

pub fn parse(html: &str) -> HtmlForm {
    HtmlForm::parse(html).unwrap_or_else(|e| panic!("Failed to parse: {html}\nError: {e:?}"))
}

/// Data a browser would submit for the fixture form.
pub fn sample_data() -> FormData {
    let mut data = FormData::new();
    data.insert("fullName".into(), FieldValue::from("John Smith"));
    data.insert("password".into(), FieldValue::from("qwerty"));
    data.insert("choice".into(), FieldValue::from("yes"));
    data.insert("possibilities".into(), FieldValue::from(["one"]));
    data.insert("agree".into(), FieldValue::from("on"));
    data.insert("singleCountry".into(), FieldValue::from("United States"));
    data.insert("country".into(), FieldValue::from(["ru", "uk"]));
    data.insert("message".into(), FieldValue::from("Blah-Blah"));
    data
}

pub fn by_id(form: &HtmlForm, id: &str) -> NodeId {
    form.document()
        .element_by_id(id)
        .unwrap_or_else(|| panic!("No element with id {id}"))
}

pub fn has_attr(form: &HtmlForm, id: &str, attr: &str) -> bool {
    form.document().has_attribute(by_id(form, id), attr)
}

pub fn attr(form: &HtmlForm, id: &str, attr: &str) -> Option<String> {
    form.document()
        .attribute(by_id(form, id), attr)
        .map(str::to_string)
}
