//! Key mappings and target schemas

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DsconvError, Result};

/// Separator between the source and target name of a mapping entry.
pub const MAPPING_SEPARATOR: char = ':';

/// Canonical target schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputType {
    /// Supervised fine-tuning: instruction / input / output
    #[default]
    Sft,
    /// Pre-training: text
    Pt,
}

impl OutputType {
    /// Name used on the command line and in job files
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Sft => "sft",
            OutputType::Pt => "pt",
        }
    }

    /// Mapping used when the caller does not supply one
    pub fn default_mapping(&self) -> KeyMapping {
        let names: &[&str] = match self {
            OutputType::Sft => &["instruction", "input", "output"],
            OutputType::Pt => &["text"],
        };
        KeyMapping {
            pairs: names
                .iter()
                .map(|name| FieldPair {
                    source: (*name).to_string(),
                    target: (*name).to_string(),
                })
                .collect(),
        }
    }
}

impl FromStr for OutputType {
    type Err = DsconvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sft" => Ok(OutputType::Sft),
            "pt" => Ok(OutputType::Pt),
            other => Err(DsconvError::config(format!(
                "unsupported output type: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for OutputType {
    type Error = DsconvError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputType> for String {
    fn from(value: OutputType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `source:target` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    /// Field read from the input record
    pub source: String,
    /// Field written to the output record
    pub target: String,
}

impl FromStr for FieldPair {
    type Err = DsconvError;

    fn from_str(entry: &str) -> Result<Self> {
        let (source, target) = entry.split_once(MAPPING_SEPARATOR).ok_or_else(|| {
            DsconvError::config(format!(
                "key map entry '{entry}' is missing the '{MAPPING_SEPARATOR}' separator"
            ))
        })?;
        if target.contains(MAPPING_SEPARATOR) {
            return Err(DsconvError::config(format!(
                "key map entry '{entry}' has more than one '{MAPPING_SEPARATOR}' separator"
            )));
        }
        if source.is_empty() || target.is_empty() {
            return Err(DsconvError::config(format!(
                "key map entry '{entry}' has an empty field name"
            )));
        }
        Ok(FieldPair {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

impl fmt::Display for FieldPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, MAPPING_SEPARATOR, self.target)
    }
}

/// Ordered, non-empty list of field pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeyMapping {
    pairs: Vec<FieldPair>,
}

impl KeyMapping {
    /// Parse `source:target` entries. Every entry is validated before the
    /// mapping exists, so a bad entry never reaches a record.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.is_empty() {
            return Err(DsconvError::config("key map must not be empty"));
        }
        let pairs = entries
            .iter()
            .map(|entry| entry.as_ref().parse())
            .collect::<Result<Vec<FieldPair>>>()?;
        Ok(Self { pairs })
    }

    /// Map every listed field onto itself
    pub fn identity<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let entries: Vec<String> = fields
            .iter()
            .map(|f| format!("{}{}{}", f.as_ref(), MAPPING_SEPARATOR, f.as_ref()))
            .collect();
        Self::parse(&entries)
    }

    /// Pairs in mapping order
    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false for a constructed mapping
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Entries in `source:target` form
    pub fn entries(&self) -> Vec<String> {
        self.pairs.iter().map(ToString::to_string).collect()
    }
}

impl TryFrom<Vec<String>> for KeyMapping {
    type Error = DsconvError;

    fn try_from(entries: Vec<String>) -> Result<Self> {
        Self::parse(&entries)
    }
}

impl From<KeyMapping> for Vec<String> {
    fn from(mapping: KeyMapping) -> Self {
        mapping.entries()
    }
}

impl fmt::Display for KeyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries().join(" "))
    }
}
