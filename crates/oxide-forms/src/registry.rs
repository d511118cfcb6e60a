//! Ordered, name-keyed collection of field records.

use indexmap::IndexMap;
use serde::Serialize;

use crate::field::FieldRecord;
use crate::value::{FieldValue, FormData};

/// Field records keyed by logical name, in the order their first control
/// appears in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: IndexMap<String, FieldRecord>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, merging it into an existing one with the same name.
    pub fn insert_or_merge(&mut self, record: FieldRecord) {
        if let Some(existing) = self.fields.get_mut(&record.name) {
            existing.merge(record);
        } else {
            self.fields.insert(record.name.clone(), record);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldRecord> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Records in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldRecord> {
        self.fields.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut FieldRecord> {
        self.fields.values_mut()
    }

    /// Returns the value of a field, if it has one.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)?.value.as_ref()
    }

    /// Returns the values of all fields that have one, in registry order.
    pub fn values(&self) -> FormData {
        self.fields
            .iter()
            .filter_map(|(name, record)| Some((name.clone(), record.value.clone()?)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a FieldRecord;
    type IntoIter = indexmap::map::Values<'a, String, FieldRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}
