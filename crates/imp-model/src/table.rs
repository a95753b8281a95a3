use serde::{Deserialize, Serialize};

/// A spreadsheet loaded into memory: one header row plus string rows.
///
/// Every row has exactly `headers.len()` cells; construction pads short rows
/// with empty strings and truncates long ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub sheet_name: String,
}

impl SpreadsheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, sheet_name: impl Into<String>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            headers,
            rows,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Cell at `row`/`column`, empty when either is out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}
