//! Field values and the data sources they are bound from.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FormError, Result};

/// The value of a form field: a scalar, or a sequence for groups and
/// array-named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single value.
    Single(String),
    /// An ordered sequence of values.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Returns true for `""` and `[]`.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Multiple(values) => values.is_empty(),
        }
    }

    /// Returns the values as a slice; a scalar is a one-element slice.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// Returns true if `candidate` equals the scalar or is an element of the
    /// sequence.
    pub fn contains(&self, candidate: &str) -> bool {
        self.as_slice().iter().any(|value| value == candidate)
    }

    /// Returns the scalar, if this is one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Converts into a sequence, wrapping a scalar.
    pub fn into_multiple(self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![value],
            Self::Multiple(values) => values,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(values: [&str; N]) -> Self {
        Self::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered submitted data, keyed by logical field name.
pub type FormData = IndexMap<String, FieldValue>;

/// Anything that can be bound onto a form.
pub trait DataSource {
    /// Returns the submitted value for a logical field name.
    fn get_value(&self, name: &str) -> Option<&FieldValue>;
}

impl DataSource for HashMap<String, FieldValue> {
    fn get_value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

impl DataSource for BTreeMap<String, FieldValue> {
    fn get_value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

impl DataSource for IndexMap<String, FieldValue> {
    fn get_value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn get_value(&self, name: &str) -> Option<&FieldValue> {
        (**self).get_value(name)
    }
}

/// Decodes an `application/x-www-form-urlencoded` string.
///
/// Keys ending in `[]` collect every occurrence into a sequence under the
/// stripped name; for plain keys the last occurrence wins.
///
/// # Errors
///
/// Returns [`FormError::InvalidData`] if the string cannot be decoded.
pub fn parse_urlencoded(input: &str) -> Result<FormData> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input.trim_start_matches('?'))
        .map_err(|e| FormError::InvalidData(e.to_string()))?;

    let mut data = FormData::new();
    for (key, value) in pairs {
        match crate::field::strip_array_suffix(&key) {
            Some(name) => {
                let entry = data
                    .entry(name.to_string())
                    .or_insert_with(|| FieldValue::Multiple(Vec::new()));
                let mut values =
                    std::mem::replace(entry, FieldValue::Multiple(Vec::new())).into_multiple();
                values.push(value);
                *entry = FieldValue::Multiple(values);
            }
            None => {
                data.insert(key, FieldValue::Single(value));
            }
        }
    }
    Ok(data)
}

/// Converts a JSON object into form data.
///
/// Strings, numbers and booleans become scalars; arrays of those become
/// sequences. `null` members are skipped.
///
/// # Errors
///
/// Returns [`FormError::InvalidData`] if the value is not an object or a
/// member has an unsupported shape.
pub fn form_data_from_json(value: &Value) -> Result<FormData> {
    let Value::Object(members) = value else {
        return Err(FormError::InvalidData(
            "expected a JSON object of field values".into(),
        ));
    };

    let mut data = FormData::new();
    for (key, member) in members {
        let value = match member {
            Value::Null => continue,
            Value::Array(items) => FieldValue::Multiple(
                items
                    .iter()
                    .map(|item| json_scalar(key, item))
                    .collect::<Result<_>>()?,
            ),
            other => FieldValue::Single(json_scalar(key, other)?),
        };
        let name = crate::field::strip_array_suffix(key).unwrap_or(key);
        data.insert(name.to_string(), value);
    }
    Ok(data)
}

fn json_scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(FormError::InvalidData(format!(
            "unsupported value for field {key}: {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_helpers() {
        let single = FieldValue::from("a");
        assert!(single.contains("a"));
        assert_eq!(single.as_slice(), ["a"]);
        assert_eq!(single.as_single(), Some("a"));

        let multiple = FieldValue::from(["a", "b"]);
        assert!(multiple.contains("b"));
        assert!(!multiple.contains("c"));
        assert_eq!(multiple.as_single(), None);

        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::Multiple(Vec::new()).is_empty());
        assert!(!FieldValue::from([""]).is_empty());
    }

    #[test]
    fn test_field_value_json_shape() {
        assert_eq!(serde_json::to_value(FieldValue::from("x")).unwrap(), json!("x"));
        assert_eq!(
            serde_json::to_value(FieldValue::from(["x", "y"])).unwrap(),
            json!(["x", "y"])
        );
        let parsed: FieldValue = serde_json::from_value(json!(["a"])).unwrap();
        assert_eq!(parsed, FieldValue::from(["a"]));
    }

    #[test]
    fn test_parse_urlencoded() {
        let data =
            parse_urlencoded("fullName=John+Smith&country[]=ru&country%5B%5D=uk&x=1&x=2&note=caf%C3%A9")
                .unwrap();
        assert_eq!(data["fullName"], FieldValue::from("John Smith"));
        assert_eq!(data["country"], FieldValue::from(["ru", "uk"]));
        assert_eq!(data["x"], FieldValue::from("2"));
        assert_eq!(data["note"], FieldValue::from("café"));
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["fullName", "country", "x", "note"]);
    }

    #[test]
    fn test_parse_urlencoded_empty() {
        assert!(parse_urlencoded("").unwrap().is_empty());
        assert_eq!(parse_urlencoded("?a=").unwrap()["a"], FieldValue::from(""));
    }

    #[test]
    fn test_form_data_from_json() {
        let data = form_data_from_json(&json!({
            "name": "John",
            "age": 42,
            "agree": true,
            "tags[]": ["a", 1],
            "skip": null,
        }))
        .unwrap();
        assert_eq!(data["name"], FieldValue::from("John"));
        assert_eq!(data["age"], FieldValue::from("42"));
        assert_eq!(data["agree"], FieldValue::from("true"));
        assert_eq!(data["tags"], FieldValue::from(["a", "1"]));
        assert!(!data.contains_key("skip"));
    }

    #[test]
    fn test_form_data_from_json_rejects_bad_shapes() {
        assert!(matches!(
            form_data_from_json(&json!(["a"])),
            Err(FormError::InvalidData(_))
        ));
        assert!(matches!(
            form_data_from_json(&json!({"a": {"b": 1}})),
            Err(FormError::InvalidData(_))
        ));
    }

    #[test]
    fn test_data_sources() {
        let mut hash = HashMap::new();
        hash.insert("a".to_string(), FieldValue::from("1"));
        let mut tree = BTreeMap::new();
        tree.insert("a".to_string(), FieldValue::from("1"));
        assert_eq!(hash.get_value("a"), tree.get_value("a"));
        assert_eq!((&hash).get_value("b"), None);
    }
}
