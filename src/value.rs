//! Field values and the data bag they live in

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// A single form or prop value.
///
/// Forms mostly carry text, but a data bag loaded from JSON can hold any
/// scalar or list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null (distinct from an absent field)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Any number
    Number(f64),
    /// Text input
    Text(String),
    /// A list of values (multi-selects, tag inputs)
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// The text, if this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Length used by `min_length` checks.
    ///
    /// Text is measured in Unicode scalar values, lists in elements. Other
    /// values have no length.
    ///
    /// ```
    /// use tidewater::FieldValue;
    ///
    /// assert_eq!(FieldValue::from("héllo").len(), Some(5));
    /// assert_eq!(FieldValue::from(true).len(), None);
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Option<usize> {
        match self {
            FieldValue::Text(text) => Some(text.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// True only for the empty string.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping from field name to value.
///
/// A name that is not in the bag is "absent", which is different from being
/// present with [`FieldValue::Null`] or an empty string.
///
/// ```
/// use tidewater::{DataBag, FieldValue};
///
/// let data = DataBag::new()
///     .with("email", "user@example.com")
///     .with("age", 31);
///
/// assert_eq!(data.get("age"), Some(&FieldValue::Number(31.0)));
/// assert!(data.get("nickname").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBag {
    entries: Vec<(String, FieldValue)>,
}

impl DataBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    ///
    /// Replacing keeps the field's original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a value, making the field absent.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Look up a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Load a bag from a JSON object.
    ///
    /// Nested objects are rejected; scalars, null and arrays are accepted.
    pub fn from_json(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(SchemaError::whole("data must be a JSON object"));
        };

        let mut bag = DataBag::new();
        for (name, raw) in map {
            let value: FieldValue = serde_json::from_value(raw)
                .map_err(|_| SchemaError::for_field(&name, "nested objects are not supported"))?;
            bag.insert(name, value);
        }
        Ok(bag)
    }
}

impl<K, V> FromIterator<(K, V)> for DataBag
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = DataBag::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}
