//! Schema and sample reporting

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::record::Record;
use crate::value::value_len;

/// One field of the sampled record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSample {
    /// Field name
    pub name: String,
    /// Field value as read
    pub value: Value,
    /// Natural length of the value
    pub len: usize,
}

/// Result of [`inspect`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Field names of the first record
    pub schema: Vec<String>,
    /// Every field of the first record that has any non-empty field
    pub sample: Vec<FieldSample>,
    /// Total number of records
    pub count: usize,
}

/// Describe a record sequence: its schema, a representative record and its size.
pub fn inspect(records: &[Record]) -> Report {
    let schema = records
        .first()
        .map(|first| first.keys().map(str::to_string).collect())
        .unwrap_or_default();

    let sample = records
        .iter()
        .find(|record| record.iter().any(|(_, value)| value_len(value) > 0))
        .map(|record| {
            record
                .iter()
                .map(|(name, value)| FieldSample {
                    name: name.to_string(),
                    value: value.clone(),
                    len: value_len(value),
                })
                .collect()
        })
        .unwrap_or_default();

    Report {
        schema,
        sample,
        count: records.len(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Info] keys: {:?}", self.schema)?;
        for field in &self.sample {
            let shown = match &field.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            writeln!(f, "[Info] '{}': {} len:{}", field.name, shown, field.len)?;
        }
        write!(f, "Num examples: {}", self.count)
    }
}
