//! Sink adapter

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use dsconv_core::Result;
use serde::Serialize;
use tracing::debug;

/// Layout of a written collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFormat {
    /// Pretty-printed JSON array, 4-space indent
    JsonArray,
    /// One compact JSON object per line
    Jsonl,
}

impl SinkFormat {
    /// `.jsonl` and `.ndjson` destinations get lines; everything else a JSON array.
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jsonl") | Some("ndjson") => SinkFormat::Jsonl,
            _ => SinkFormat::JsonArray,
        }
    }
}

/// Write a complete collection to `path`, replacing any existing file
pub fn write<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let format = SinkFormat::for_path(path);
    debug!(path = %path.display(), records = records.len(), ?format, "writing output");

    let mut writer = BufWriter::new(File::create(path)?);
    write_to(&mut writer, records, format)?;
    writer.flush()?;
    Ok(())
}

/// Write a collection to any writer
pub fn write_to<W: Write, T: Serialize>(
    writer: &mut W,
    records: &[T],
    format: SinkFormat,
) -> Result<()> {
    match format {
        SinkFormat::JsonArray => {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut *writer, formatter);
            records.serialize(&mut ser)?;
            writer.write_all(b"\n")?;
        }
        SinkFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut *writer, record)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
