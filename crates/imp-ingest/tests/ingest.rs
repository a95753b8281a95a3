//! File-based tests for imp-ingest.

use std::io::Write;

use imp_ingest::{IngestError, check_file_size_with_limit, column_samples, load_table, preview};

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn loads_csv_file_with_quoted_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "orgs.csv",
        "Name,Description\n\"Acme, Inc.\",\"says \"\"hi\"\"\"\nGlobex,\n",
    );

    let table = load_table(&path).unwrap();
    assert_eq!(table.headers, vec!["Name", "Description"]);
    assert_eq!(table.rows[0], vec!["Acme, Inc.", "says \"hi\""]);
    assert_eq!(table.rows[1], vec!["Globex", ""]);

    let head = preview(&table, 1);
    assert_eq!(head.total_rows, 2);
    assert_eq!(head.rows.len(), 1);

    let samples = column_samples(&table, 3);
    assert_eq!(samples[1].samples, vec!["says \"hi\""]);
}

#[test]
fn missing_file_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_table(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn unsupported_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "notes.txt", "a,b\n");
    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}

#[test]
fn size_limit_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "big.csv", "Name\nAda\nBob\n");
    let err = check_file_size_with_limit(&path, 4).unwrap_err();
    assert!(matches!(err, IngestError::FileTooLarge { max_size: 4, .. }));
}

#[test]
fn corrupt_workbook_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "broken.xlsx", "this is not a zip archive");
    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, IngestError::Workbook { .. }));
}
