//! First-rows preview of a loaded table.

use imp_model::SpreadsheetTable;
use serde::Serialize;

/// Rows shown in the preview step unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Returns the headers, the first `row_count` rows and the total row count.
pub fn preview(table: &SpreadsheetTable, row_count: usize) -> TablePreview {
    TablePreview {
        headers: table.headers.clone(),
        rows: table.rows.iter().take(row_count).cloned().collect(),
        total_rows: table.row_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_limits_rows() {
        let rows = (0..8).map(|i| vec![i.to_string()]).collect();
        let table = SpreadsheetTable::new(vec!["N".into()], rows, "Sheet1");

        let head = preview(&table, DEFAULT_PREVIEW_ROWS);
        assert_eq!(head.rows.len(), 5);
        assert_eq!(head.total_rows, 8);
        assert_eq!(head.rows[4], vec!["4"]);

        let all = preview(&table, 100);
        assert_eq!(all.rows.len(), 8);
    }
}
