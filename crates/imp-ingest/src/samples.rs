//! Sample value extraction for the mapping step.

use imp_model::SpreadsheetTable;
use serde::Serialize;

/// Samples shown next to each column while mapping.
pub const DEFAULT_SAMPLE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSamples {
    pub column: String,
    pub samples: Vec<String>,
}

/// Builds samples for every column, in header order.
pub fn column_samples(table: &SpreadsheetTable, limit: usize) -> Vec<ColumnSamples> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, column)| ColumnSamples {
            column: column.clone(),
            samples: values_at(table, idx, limit),
        })
        .collect()
}

/// Gets the first `limit` non-empty values of a column.
///
/// Returns an empty list when the column does not exist.
pub fn sample_values(table: &SpreadsheetTable, column: &str, limit: usize) -> Vec<String> {
    match table.column_index(column) {
        Some(idx) => values_at(table, idx, limit),
        None => Vec::new(),
    }
}

fn values_at(table: &SpreadsheetTable, idx: usize, limit: usize) -> Vec<String> {
    table
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
