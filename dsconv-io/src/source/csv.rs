//! CSV input

use std::path::Path;

use dsconv_core::{Record, Result};
use serde_json::{Map, Value};

use super::decode_error;

/// Read a CSV file with a header row. Cells are kept as text; empty cells
/// become null so they count as absent.
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| decode_error(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| decode_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| decode_error(path, e))?;
        let mut fields = Map::with_capacity(headers.len());
        for (name, cell) in headers.iter().zip(row.iter()) {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            fields.insert(name.clone(), value);
        }
        records.push(Record::from(fields));
    }

    Ok(records)
}
