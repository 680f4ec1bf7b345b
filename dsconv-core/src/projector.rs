//! Field projection onto a target schema

use crate::mapping::KeyMapping;
use crate::record::{OutputRecord, Record};
use crate::value::coerce_to_text;

/// Project a single record.
///
/// Returns the output record together with its validity count, the number of
/// targets that received non-empty text.
pub fn project_record(record: &Record, mapping: &KeyMapping) -> (OutputRecord, usize) {
    let mut out = OutputRecord::new();
    let mut valid = 0;

    for pair in mapping.pairs() {
        let text = record.get(&pair.source).map(coerce_to_text);
        match text {
            Some(text) if !text.is_empty() => {
                out.set(&pair.target, text);
                valid += 1;
            }
            _ => out.set(&pair.target, String::new()),
        }
    }

    (out, valid)
}

/// Project every record onto `mapping`'s targets.
///
/// Records whose validity count is zero are dropped. Surviving records keep
/// their input order.
pub fn project(records: &[Record], mapping: &KeyMapping) -> Vec<OutputRecord> {
    records
        .iter()
        .filter_map(|record| {
            let (out, valid) = project_record(record, mapping);
            (valid > 0).then_some(out)
        })
        .collect()
}
