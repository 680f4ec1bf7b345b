//! Job configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DsconvError, Result};
use crate::mapping::{KeyMapping, OutputType};

/// Ordering applied before truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SplitMode {
    /// Keep input order
    #[default]
    None,
    /// Longest `instruction` + `input` + `output` first
    SortByLen,
}

impl SplitMode {
    /// Resolve an optional mode name; no name means [`SplitMode::None`].
    pub fn parse(name: Option<&str>) -> Result<Self> {
        name.map_or(Ok(SplitMode::None), str::parse::<SplitMode>)
    }

    /// Name used on the command line and in job files
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::None => "NONE",
            SplitMode::SortByLen => "SORT_BY_LEN",
        }
    }
}

impl FromStr for SplitMode {
    type Err = DsconvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(SplitMode::None),
            "SORT_BY_LEN" => Ok(SplitMode::SortByLen),
            other => Err(DsconvError::config(format!(
                "unsupported split mode: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for SplitMode {
    type Error = DsconvError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SplitMode> for String {
    fn from(value: SplitMode) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one invocation needs to know, passed by value to each entry point.
///
/// Job files use the same field names:
///
/// ```toml
/// output_type = "sft"
/// key_map = ["Query:instruction", "Answer:output"]
/// split_mode = "SORT_BY_LEN"
/// split = 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Target schema
    pub output_type: OutputType,
    /// Explicit mapping; `None` selects the target schema's default
    pub key_map: Option<KeyMapping>,
    /// Ordering used by split
    pub split_mode: SplitMode,
    /// Number of records kept by split
    pub split: Option<i64>,
}

impl JobConfig {
    /// Explicit mapping if one was given, else the output type's default
    pub fn mapping(&self) -> KeyMapping {
        self.key_map
            .clone()
            .unwrap_or_else(|| self.output_type.default_mapping())
    }

    /// Whether [`JobConfig::mapping`] falls back to the default
    pub fn uses_default_mapping(&self) -> bool {
        self.key_map.is_none()
    }

    /// Split count, required for split jobs
    pub fn split_count(&self) -> Result<i64> {
        self.split
            .ok_or_else(|| DsconvError::config("split count is not set"))
    }
}
