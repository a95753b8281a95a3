//! Loading the first sheet of a spreadsheet file into a table.

use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use imp_model::SpreadsheetTable;

use crate::error::{IngestError, Result};

/// Maximum file size accepted for upload (50 MB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Sheet name reported for CSV sources.
const CSV_SHEET_NAME: &str = "Sheet1";

/// Spreadsheet container formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// xlsx, xlsm, xlsb, xls, ods (read through calamine).
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Loads the first sheet of `path`.
///
/// The first row becomes the headers; fully blank rows are dropped and every
/// remaining row is padded or truncated to the header width.
pub fn load_table(path: &Path) -> Result<SpreadsheetTable> {
    check_file_size(path)?;
    let format = SourceFormat::from_path(path)?;

    let table = match format {
        SourceFormat::Workbook => load_workbook(path)?,
        SourceFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            load_csv_from_reader(file, path)?
        }
    };

    tracing::info!(
        path = %path.display(),
        sheet = %table.sheet_name,
        columns = table.headers.len(),
        rows = table.row_count(),
        "Loaded spreadsheet"
    );
    Ok(table)
}

/// Parses CSV text from any reader. `path` is only used in error messages.
pub fn load_csv_from_reader<R: Read>(reader: R, path: &Path) -> Result<SpreadsheetTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut raw_rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    build_table(raw_rows, CSV_SHEET_NAME, path)
}

fn load_workbook(path: &Path) -> Result<SpreadsheetTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::NoSheets {
            path: path.to_path_buf(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let raw_rows: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    build_table(raw_rows, &sheet_name, path)
}

/// Renders a workbook cell the way it appears in the sheet.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.clone(),
        Data::DurationIso(v) => v.clone(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn build_table(raw_rows: Vec<Vec<String>>, sheet_name: &str, path: &Path) -> Result<SpreadsheetTable> {
    let mut rows = raw_rows.into_iter();
    let header_row = rows.next().ok_or_else(|| IngestError::EmptySheet {
        path: path.to_path_buf(),
    })?;

    let headers = normalize_headers(header_row);
    if headers.is_empty() {
        return Err(IngestError::EmptySheet {
            path: path.to_path_buf(),
        });
    }

    let body: Vec<Vec<String>> = rows
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    Ok(SpreadsheetTable::new(headers, body, sheet_name))
}

/// Trims header cells, drops trailing blanks and names interior blanks
/// `Column N` (1-based).
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = raw
        .into_iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    while headers.last().is_some_and(String::is_empty) {
        headers.pop();
    }

    for (idx, header) in headers.iter_mut().enumerate() {
        if header.is_empty() {
            *header = format!("Column {}", idx + 1);
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> SpreadsheetTable {
        load_csv_from_reader(text.as_bytes(), Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a.XLSX")).unwrap(),
            SourceFormat::Workbook
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("a.csv")).unwrap(),
            SourceFormat::Csv
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("a.txt")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_csv_rows_normalized() {
        let table = load("Name,Email,\nAda,ada@x.io\n,,\nBob,bob@x.io,extra,more\n");
        assert_eq!(table.headers, vec!["Name", "Email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Ada", "ada@x.io"]);
        assert_eq!(table.rows[1], vec!["Bob", "bob@x.io"]);
        assert_eq!(table.sheet_name, "Sheet1");
    }

    #[test]
    fn test_blank_interior_header_named() {
        let table = load("\u{feff}Name,,Phone\nAda,x,1\n");
        assert_eq!(table.headers, vec!["Name", "Column 2", "Phone"]);
    }

    #[test]
    fn test_empty_csv_rejected() {
        let err = load_csv_from_reader("".as_bytes(), Path::new("empty.csv")).unwrap_err();
        assert!(matches!(err, IngestError::EmptySheet { .. }));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
