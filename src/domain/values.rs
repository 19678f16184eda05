use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldDefinition;

/// The in-progress answers for one ticket submission, keyed by field `name`.
///
/// The empty string means unset. One form instance owns its `FormValues`
/// exclusively; the consistency engine takes it by value and hands back the
/// cleaned result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh value set with every field of `fields` present and unset,
    /// in schema order.
    pub fn for_fields(fields: &[FieldDefinition]) -> Self {
        let mut values = IndexMap::with_capacity(fields.len());
        for field in fields {
            values.insert(field.name.clone(), String::new());
        }
        Self(values)
    }

    /// The current value for `name`; missing entries read as unset.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_set(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn clear(&mut self, name: &str) {
        if let Some(slot) = self.0.get_mut(name) {
            slot.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl FromIterator<(String, String)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
