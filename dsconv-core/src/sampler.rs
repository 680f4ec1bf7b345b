//! Truncation with optional length ranking

use std::cmp::Reverse;

use crate::config::SplitMode;
use crate::error::{DsconvError, Result};
use crate::record::Record;
use crate::value::value_len;

/// Fields summed to rank records in [`SplitMode::SortByLen`].
///
/// Ranking is limited to the `sft` schema; other schemas must be converted
/// first.
pub const RANK_FIELDS: [&str; 3] = ["instruction", "input", "output"];

struct RankedRecord {
    rank: usize,
    record: Record,
}

/// Rank key of `record`, the summed length of [`RANK_FIELDS`].
pub fn rank_key(index: usize, record: &Record) -> Result<usize> {
    RANK_FIELDS.iter().try_fold(0usize, |acc, field| {
        let value = record.get(field).ok_or_else(|| DsconvError::Schema {
            index,
            field: (*field).to_string(),
        })?;
        Ok(acc + value_len(value))
    })
}

/// Keep the first `n` records under `mode`'s ordering.
pub fn sample(records: Vec<Record>, n: i64, mode: SplitMode) -> Result<Vec<Record>> {
    let n = usize::try_from(n)
        .map_err(|_| DsconvError::config(format!("split count must not be negative: {n}")))?;

    match mode {
        SplitMode::None => {
            let mut records = records;
            records.truncate(n);
            Ok(records)
        }
        SplitMode::SortByLen => {
            let mut ranked = records
                .into_iter()
                .enumerate()
                .map(|(index, record)| {
                    rank_key(index, &record).map(|rank| RankedRecord { rank, record })
                })
                .collect::<Result<Vec<_>>>()?;
            // stable: equal ranks keep input order
            ranked.sort_by_key(|entry| Reverse(entry.rank));
            Ok(ranked
                .into_iter()
                .take(n)
                .map(|entry| entry.record)
                .collect())
        }
    }
}
