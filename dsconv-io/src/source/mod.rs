//! Source adapters
//!
//! Every storage kind is turned into the same thing: an ordered `Vec<Record>`.
//! The kind is resolved once, from the path's extension or shape, and the
//! core never sees format-specific details.

pub mod arrow;
pub mod csv;
pub mod json;
pub mod parquet;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use dsconv_core::{DsconvError, Record, Result};
use tracing::debug;

/// Storage kind of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single JSON array of objects
    Json,
    /// One JSON object per line
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet file
    Parquet,
    /// Directory of Arrow IPC files written by a dataset library
    ArrowDataset,
}

impl SourceKind {
    /// Resolve the kind of `path`. Directories are Arrow datasets; files are
    /// resolved by extension, case-insensitively.
    pub fn resolve(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(SourceKind::ArrowDataset);
        }

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(SourceKind::Json),
            Some("jsonl") | Some("ndjson") => Ok(SourceKind::Jsonl),
            Some("csv") => Ok(SourceKind::Csv),
            Some("parquet") => Ok(SourceKind::Parquet),
            Some("arrow") => Ok(SourceKind::ArrowDataset),
            Some(other) => Err(DsconvError::UnsupportedFormat(format!(
                "unsupported suffix '.{other}' for {}",
                path.display()
            ))),
            None => Err(DsconvError::UnsupportedFormat(format!(
                "cannot determine the format of {}",
                path.display()
            ))),
        }
    }

    /// Name accepted by `--format`
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Json => "json",
            SourceKind::Jsonl => "jsonl",
            SourceKind::Csv => "csv",
            SourceKind::Parquet => "parquet",
            SourceKind::ArrowDataset => "arrow",
        }
    }
}

impl FromStr for SourceKind {
    type Err = DsconvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(SourceKind::Json),
            "jsonl" | "ndjson" => Ok(SourceKind::Jsonl),
            "csv" => Ok(SourceKind::Csv),
            "parquet" => Ok(SourceKind::Parquet),
            "arrow" => Ok(SourceKind::ArrowDataset),
            other => Err(DsconvError::UnsupportedFormat(format!(
                "unknown input format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for reading inputs
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Fail on an unparsable JSON Lines line instead of skipping it
    pub strict_lines: bool,
}

/// Pick the explicit kind if given, otherwise resolve from the path
pub fn resolve_source_kind(path: &Path, explicit: Option<SourceKind>) -> Result<SourceKind> {
    match explicit {
        Some(kind) => Ok(kind),
        None => SourceKind::resolve(path),
    }
}

/// Read every record of `path`
pub fn read(path: &Path, kind: SourceKind, opts: &ReadOptions) -> Result<Vec<Record>> {
    debug!(path = %path.display(), kind = %kind, "reading source");
    match kind {
        SourceKind::Json => json::read_json_array(path),
        SourceKind::Jsonl => json::read_json_lines(path, opts.strict_lines),
        SourceKind::Csv => csv::read_csv(path),
        SourceKind::Parquet => parquet::read_parquet(path),
        SourceKind::ArrowDataset => arrow::read_arrow_dataset(path),
    }
}

pub(crate) fn decode_error(path: &Path, err: impl fmt::Display) -> DsconvError {
    DsconvError::Decode {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
