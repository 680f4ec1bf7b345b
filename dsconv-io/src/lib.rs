//! dsconv I/O - Source/sink adapters and high-level APIs
//!
//! This crate connects the core to storage:
//!
//! - Source adapters for JSON, JSON Lines, CSV, Parquet and Arrow datasets
//! - A sink writing JSON arrays or JSON Lines
//! - Request/summary APIs for convert, split and inspect

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod sink;
pub mod source;

// Re-export commonly used types
pub use dsconv_core::{
    DsconvError, JobConfig, KeyMapping, OutputRecord, OutputType, Record, Report, Result,
    SplitMode,
};
pub use sink::SinkFormat;
pub use source::{read, resolve_source_kind, ReadOptions, SourceKind};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Input location plus an optional explicit kind
#[derive(Debug, Clone)]
pub struct InputSource {
    /// Path of a file or dataset directory
    pub path: PathBuf,
    /// Kind override; `None` resolves from the path
    pub kind: Option<SourceKind>,
}

impl InputSource {
    /// Input resolved from its path
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    /// Read all records
    pub fn read(&self, opts: &ReadOptions) -> Result<Vec<Record>> {
        let kind = resolve_source_kind(&self.path, self.kind)?;
        source::read(&self.path, kind, opts)
    }
}

/// Request for [`execute_convert`]
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Where records come from
    pub input: InputSource,
    /// Destination; required
    pub output: Option<PathBuf>,
    /// Output type and mapping
    pub job: JobConfig,
    /// Reader options
    pub read: ReadOptions,
}

/// Outcome of [`execute_convert`]
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    /// Records read from the input
    pub records_read: usize,
    /// Records written after dropping invalid ones
    pub records_written: usize,
    /// Mapping that was applied
    pub mapping: KeyMapping,
    /// Whether the mapping is the output type's default
    pub default_mapping: bool,
}

/// Request for [`execute_split`]
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// Where records come from
    pub input: InputSource,
    /// Destination; required
    pub output: Option<PathBuf>,
    /// Split mode and count
    pub job: JobConfig,
    /// Reader options
    pub read: ReadOptions,
}

/// Outcome of [`execute_split`]
#[derive(Debug, Clone)]
pub struct SplitSummary {
    /// Records read from the input
    pub records_read: usize,
    /// Records written
    pub records_written: usize,
    /// Ordering applied
    pub mode: SplitMode,
}

/// Request for [`execute_inspect`]
#[derive(Debug, Clone)]
pub struct InspectRequest {
    /// Where records come from
    pub input: InputSource,
    /// Reader options
    pub read: ReadOptions,
}

fn require_output(output: Option<PathBuf>) -> Result<PathBuf> {
    output.ok_or_else(|| DsconvError::config("please set the output path first"))
}

/// Read, project onto the job's target schema, and write.
pub fn execute_convert(request: ConvertRequest) -> Result<ConvertSummary> {
    let output = require_output(request.output)?;
    let job = request.job;
    let mapping = job.mapping();
    let default_mapping = job.uses_default_mapping();

    info!(output_type = %job.output_type, "converting");
    if default_mapping {
        info!(key_map = %mapping, "using default {} key map", job.output_type);
    } else {
        info!(key_map = %mapping, "{} key map", job.output_type);
    }

    let records = request.input.read(&request.read)?;
    info!(records = records.len(), "read input");

    let projected = dsconv_core::project(&records, &mapping);
    if projected.is_empty() {
        warn!("result is empty, please check the key map");
    }
    sink::write(&output, &projected)?;
    info!(len = projected.len(), output = %output.display(), "convert ok");

    Ok(ConvertSummary {
        records_read: records.len(),
        records_written: projected.len(),
        mapping,
        default_mapping,
    })
}

/// Read, keep the first `split` records under the job's ordering, and write.
pub fn execute_split(request: SplitRequest) -> Result<SplitSummary> {
    let output = require_output(request.output)?;
    let job = request.job;
    let count = job.split_count()?;

    info!(count, mode = %job.split_mode, output = %output.display(), "splitting");
    let records = request.input.read(&request.read)?;
    let records_read = records.len();

    let kept = dsconv_core::sample(records, count, job.split_mode)?;
    sink::write(&output, &kept)?;
    info!(len = kept.len(), "split ok");

    Ok(SplitSummary {
        records_read,
        records_written: kept.len(),
        mode: job.split_mode,
    })
}

/// Read and describe an input.
pub fn execute_inspect(request: InspectRequest) -> Result<Report> {
    let records = request.input.read(&request.read)?;
    Ok(dsconv_core::inspect(&records))
}

/// Read an input into records, resolving its kind from the path
pub fn read_path(path: &Path) -> Result<Vec<Record>> {
    InputSource::path(path).read(&ReadOptions::default())
}
