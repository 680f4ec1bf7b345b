//! Input and output record types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DsconvError, Result};

/// One input data item: an ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// View an untyped item as a record.
    ///
    /// `index` is the item's position in its sequence and is reported back
    /// when the item is not a JSON object.
    pub fn try_from_value(index: usize, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DsconvError::MalformedRecord {
                index,
                reason: format!("expected an object, found {}", kind_name(&other)),
            }),
        }
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the record carries `field` at all (null included)
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in record order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in record order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unwrap into the underlying JSON map
    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Convert an untyped sequence into records, failing on the first non-object.
pub fn records_from_values<I>(values: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| Record::try_from_value(index, value))
        .collect()
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A record in a canonical target schema. Every value is text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRecord {
    fields: Map<String, Value>,
}

impl OutputRecord {
    /// Create an empty output record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a target field
    pub fn set(&mut self, field: &str, text: String) {
        self.fields.insert(field.to_string(), Value::String(text));
    }

    /// Text stored for a target field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Target field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of target fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no target field has been set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<OutputRecord> for Record {
    fn from(out: OutputRecord) -> Self {
        Record { fields: out.fields }
    }
}
