//! Arrow dataset directories
//!
//! A dataset saved to disk is a directory holding one or more Arrow IPC files
//! plus a `state.json` that lists them in order. Pointing at any `.arrow` file
//! reads the whole directory it lives in.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use ::arrow::ipc::reader::{FileReader, StreamReader};
use ::arrow::json::writer::JsonArray;
use ::arrow::json::WriterBuilder;
use ::arrow::record_batch::RecordBatch;
use dsconv_core::{Record, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::decode_error;

const STATE_FILE: &str = "state.json";
const IPC_FILE_MAGIC: &[u8; 6] = b"ARROW1";

#[derive(Debug, Deserialize)]
struct DatasetState {
    #[serde(rename = "_data_files", default)]
    data_files: Vec<DataFile>,
}

#[derive(Debug, Deserialize)]
struct DataFile {
    filename: String,
}

/// Directory holding the dataset `path` points into
pub fn dataset_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Arrow files of a dataset directory, in dataset order
pub fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let state_path = dir.join(STATE_FILE);
    if state_path.is_file() {
        let state: DatasetState = serde_json::from_reader(BufReader::new(File::open(&state_path)?))
            .map_err(|e| decode_error(&state_path, e))?;
        if !state.data_files.is_empty() {
            return Ok(state
                .data_files
                .into_iter()
                .map(|file| dir.join(file.filename))
                .collect());
        }
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_arrow = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("arrow"));
        if is_arrow && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(decode_error(dir, "no .arrow files found in dataset directory"));
    }
    Ok(files)
}

/// Read every record of the dataset `path` belongs to
pub fn read_arrow_dataset(path: &Path) -> Result<Vec<Record>> {
    let dir = dataset_dir(path);
    let mut records = Vec::new();
    for file in data_files(&dir)? {
        debug!(file = %file.display(), "reading arrow file");
        for batch in read_batches(&file)? {
            for value in batch_to_values(&file, &batch)? {
                let index = records.len();
                records.push(Record::try_from_value(index, value)?);
            }
        }
    }
    Ok(records)
}

fn read_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 6];
    let is_file_format = file.read(&mut magic)? == magic.len() && &magic == IPC_FILE_MAGIC;
    file.seek(SeekFrom::Start(0))?;

    if is_file_format {
        FileReader::try_new(file, None)
            .map_err(|e| decode_error(path, e))?
            .map(|batch| batch.map_err(|e| decode_error(path, e)))
            .collect()
    } else {
        StreamReader::try_new(BufReader::new(file), None)
            .map_err(|e| decode_error(path, e))?
            .map(|batch| batch.map_err(|e| decode_error(path, e)))
            .collect()
    }
}

fn batch_to_values(path: &Path, batch: &RecordBatch) -> Result<Vec<Value>> {
    if batch.num_rows() == 0 {
        return Ok(Vec::new());
    }
    // null cells stay as explicit nulls so every row carries the full column set
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(Vec::new());
    writer.write(batch).map_err(|e| decode_error(path, e))?;
    writer.finish().map_err(|e| decode_error(path, e))?;
    let rows: Vec<Value> =
        serde_json::from_slice(&writer.into_inner()).map_err(|e| decode_error(path, e))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::arrow::array::{ArrayRef, StringArray};
    use ::arrow::ipc::writer::{FileWriter, StreamWriter};
    use serde_json::json;
    use std::sync::Arc;

    fn batch(texts: &[&str]) -> RecordBatch {
        RecordBatch::try_from_iter(vec![(
            "text",
            Arc::new(StringArray::from(texts.to_vec())) as ArrayRef,
        )])
        .unwrap()
    }

    fn write_stream(path: &Path, texts: &[&str]) {
        let batch = batch(texts);
        let mut writer = StreamWriter::try_new(File::create(path).unwrap(), &batch.schema()).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();
    }

    fn texts(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("text").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_state_file_orders_shards() {
        let dir = tempfile::tempdir().unwrap();
        write_stream(&dir.path().join("data-00000-of-00002.arrow"), &["a", "b"]);
        write_stream(&dir.path().join("data-00001-of-00002.arrow"), &["c"]);
        fs::write(
            dir.path().join(STATE_FILE),
            r#"{"_data_files": [{"filename": "data-00001-of-00002.arrow"},
                                {"filename": "data-00000-of-00002.arrow"}],
                "_split": "train"}"#,
        )
        .unwrap();

        let records = read_arrow_dataset(&dir.path().join("data-00000-of-00002.arrow")).unwrap();
        assert_eq!(texts(&records), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_directory_without_state_file() {
        let dir = tempfile::tempdir().unwrap();
        write_stream(&dir.path().join("b.arrow"), &["second"]);
        write_stream(&dir.path().join("a.arrow"), &["first"]);

        let records = read_arrow_dataset(dir.path()).unwrap();
        assert_eq!(texts(&records), vec!["first", "second"]);
    }

    #[test]
    fn test_ipc_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arrow");
        let batch = batch(&["x"]);
        let mut writer = FileWriter::try_new(File::create(&path).unwrap(), &batch.schema()).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();

        let records = read_arrow_dataset(&path).unwrap();
        assert_eq!(records[0].get("text"), Some(&json!("x")));
    }

    #[test]
    fn test_null_cells_keep_their_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arrow");
        let batch = RecordBatch::try_from_iter(vec![
            (
                "instruction",
                Arc::new(StringArray::from(vec![Some("q1"), Some("q2")])) as ArrayRef,
            ),
            (
                "input",
                Arc::new(StringArray::from(vec![None, Some("ctx")])) as ArrayRef,
            ),
            (
                "output",
                Arc::new(StringArray::from(vec![Some("a1"), None])) as ArrayRef,
            ),
        ])
        .unwrap();
        let mut writer = StreamWriter::try_new(File::create(&path).unwrap(), &batch.schema()).unwrap();
        writer.write(&batch).unwrap();
        writer.finish().unwrap();

        let records = read_arrow_dataset(&path).unwrap();
        for record in &records {
            assert_eq!(
                record.keys().collect::<Vec<_>>(),
                vec!["instruction", "input", "output"]
            );
        }
        assert_eq!(records[0].get("input"), Some(&Value::Null));
        assert_eq!(records[1].get("output"), Some(&Value::Null));

        let report = dsconv_core::inspect(&records);
        assert_eq!(report.schema, vec!["instruction", "input", "output"]);
        let top = dsconv_core::sample(records, 1, dsconv_core::SplitMode::SortByLen).unwrap();
        assert_eq!(top[0].get("input"), Some(&json!("ctx")));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_arrow_dataset(dir.path()).is_err());
    }
}
