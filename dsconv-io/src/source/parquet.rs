//! Parquet input

use std::fs::File;
use std::path::Path;

use ::parquet::file::reader::{FileReader, SerializedFileReader};
use dsconv_core::{Record, Result};

use super::decode_error;

/// Read every row group of a Parquet file, one record per row
pub fn read_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file).map_err(|e| decode_error(path, e))?;
    let rows = reader
        .get_row_iter(None)
        .map_err(|e| decode_error(path, e))?;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let row = row.map_err(|e| decode_error(path, format!("row {index}: {e}")))?;
        records.push(Record::try_from_value(index, row.to_json_value())?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::arrow::array::{ArrayRef, Int64Array, StringArray};
    use ::arrow::record_batch::RecordBatch;
    use ::parquet::arrow::ArrowWriter;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_parquet_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let batch = RecordBatch::try_from_iter(vec![
            (
                "text",
                Arc::new(StringArray::from(vec![Some("alpha"), None])) as ArrayRef,
            ),
            ("id", Arc::new(Int64Array::from(vec![7, 8])) as ArrayRef),
        ])
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = read_parquet(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("text"), Some(&json!("alpha")));
        assert_eq!(records[0].get("id"), Some(&json!(7)));
        assert_eq!(records[1].get("text"), Some(&serde_json::Value::Null));
        for record in &records {
            assert_eq!(record.keys().collect::<Vec<_>>(), vec!["text", "id"]);
        }
    }

    #[test]
    fn test_not_a_parquet_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        std::fs::write(&path, b"definitely not parquet").unwrap();
        assert!(matches!(
            read_parquet(&path),
            Err(dsconv_core::DsconvError::Decode { .. })
        ));
    }
}
