//! JSON array and JSON Lines inputs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use dsconv_core::{records_from_values, DsconvError, Record, Result};
use serde_json::Value;
use tracing::warn;

use super::decode_error;

/// Read a file holding one JSON array of objects
pub fn read_json_array(path: &Path) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let document: Value = serde_json::from_reader(reader).map_err(|e| decode_error(path, e))?;
    match document {
        Value::Array(items) => records_from_values(items),
        _ => Err(decode_error(path, "expected a top-level JSON array")),
    }
}

/// Read one JSON object per line. Blank lines are ignored. A line that is not
/// valid JSON is skipped with a warning unless `strict` is set.
pub fn read_json_lines(path: &Path, strict: bool) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => {
                let record = Record::try_from_value(records.len(), value).map_err(|err| match err {
                    DsconvError::MalformedRecord { index, reason } => DsconvError::MalformedRecord {
                        index,
                        reason: format!("line {}: {reason}", line_idx + 1),
                    },
                    other => other,
                })?;
                records.push(record);
            }
            Err(err) if strict => {
                return Err(decode_error(path, format!("line {}: {err}", line_idx + 1)));
            }
            Err(err) => {
                warn!(line = line_idx + 1, error = %err, "parse json failed, skipping line");
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"[{"a": 1}, {"a": "x", "b": [1]}]"#).unwrap();

        let records = read_json_array(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("b"), Some(&json!([1])));
    }

    #[test]
    fn test_json_array_rejects_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"a": 1}"#).unwrap();
        assert!(matches!(read_json_array(&path), Err(DsconvError::Decode { .. })));
    }

    #[test]
    fn test_json_array_non_object_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"[{"a": 1}, 2]"#).unwrap();
        assert!(matches!(
            read_json_array(&path),
            Err(DsconvError::MalformedRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_json_lines_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        fs::write(&path, "{\"a\": 1}\n\n{broken\n  {\"a\": 2}  \n").unwrap();

        let records = read_json_lines(&path, false).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_json_lines_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        fs::write(&path, "{\"a\": 1}\n{broken\n").unwrap();

        match read_json_lines(&path, true) {
            Err(DsconvError::Decode { reason, .. }) => assert!(reason.starts_with("line 2")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_json_lines_non_object_names_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        fs::write(&path, "{\"a\": 1}\n{broken\n\n[1, 2]\n").unwrap();

        match read_json_lines(&path, false) {
            Err(DsconvError::MalformedRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.starts_with("line 4: "), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
