//! Mapping engine scenarios and properties.

use chrono::{TimeZone, Utc};
use imp_map::{MappingError, MappingState, generate_mapped_csv};
use imp_model::{ColumnMapping, MappingTemplate, SpreadsheetTable};
use proptest::prelude::*;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn name_email_table() -> SpreadsheetTable {
    SpreadsheetTable::new(
        strings(&["Name", "Email"]),
        vec![strings(&["Ada", "a@x.com"])],
        "Sheet1",
    )
}

#[test]
fn initialize_creates_one_empty_entry_per_header() {
    let state = MappingState::from_headers(&strings(&["Name", "Email", "Phone"]));
    let entries: Vec<_> = state.entries().collect();
    assert_eq!(
        entries,
        vec![("Name", None), ("Email", None), ("Phone", None)]
    );
}

#[test]
fn name_email_export_and_csv() {
    let table = name_email_table();
    let mut state = MappingState::from_headers(&table.headers);
    state.set_mapping("Name", Some("firstName")).unwrap();
    state.set_mapping("Email", Some("emails")).unwrap();

    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let payload = state.to_export_payload("User", table.row_count(), ts).unwrap();
    assert_eq!(
        payload.mappings,
        vec![
            ColumnMapping::new("Name", "firstName"),
            ColumnMapping::new("Email", "emails"),
        ]
    );
    assert_eq!(payload.mapped_fields, 2);
    assert_eq!(payload.total_rows, 1);

    insta::assert_json_snapshot!(payload, @r#"
    {
      "importType": "User",
      "mappings": [
        {
          "sourceColumn": "Name",
          "targetFieldKey": "firstName"
        },
        {
          "sourceColumn": "Email",
          "targetFieldKey": "emails"
        }
      ],
      "totalRows": 1,
      "mappedFields": 2,
      "timestamp": "2024-01-01T00:00:00Z"
    }
    "#);

    let csv = generate_mapped_csv(&table, &payload.mappings).unwrap();
    assert_eq!(csv, "firstName,emails\nAda,a@x.com\n");
}

#[test]
fn nothing_mapped_rejects_export() {
    let state = MappingState::from_headers(&strings(&["Name"]));
    let err = state
        .to_export_payload("User", 0, Utc::now())
        .unwrap_err();
    assert!(matches!(err, MappingError::NoFieldsMapped));
}

#[test]
fn half_coverage_is_incomplete() {
    let mut state = MappingState::from_headers(&strings(&["Name", "Email"]));
    state.set_mapping("Name", Some("firstName")).unwrap();

    let coverage = state.required_field_coverage(&strings(&["firstName", "lastName"]));
    assert_eq!(coverage.ratio, 0.5);
    assert_eq!(coverage.missing, vec!["lastName"]);
    assert!(!coverage.is_complete());
}

#[test]
fn template_overlay_keeps_other_columns() {
    let mut state = MappingState::from_headers(&strings(&["Name", "Email"]));
    state.set_mapping("Email", Some("emails")).unwrap();

    let template: MappingTemplate = serde_json::from_str(
        r#"{
            "id": 3,
            "name": "People",
            "importType": "User",
            "mappings": [
                { "sourceColumn": "Name", "grispiField": "firstName" },
                { "sourceColumn": "Department", "grispiField": "groups" }
            ],
            "createdAt": "2024-01-01T00:00:00Z"
        }"#,
    )
    .unwrap();

    let report = state.load_template(&template);
    assert_eq!(report.applied, 1);
    assert_eq!(report.ignored, vec!["Department"]);
    assert_eq!(state.target_for("Name"), Some("firstName"));
    assert_eq!(state.target_for("Email"), Some("emails"));
    assert!(!state.has_column("Department"));
}

#[test]
fn mapped_csv_quotes_special_characters() {
    let table = SpreadsheetTable::new(
        strings(&["Company"]),
        vec![strings(&["Acme, Inc. \"big\""])],
        "Sheet1",
    );
    let csv = generate_mapped_csv(&table, &[ColumnMapping::new("Company", "name")]).unwrap();
    assert_eq!(csv, "name\n\"Acme, Inc. \"\"big\"\"\"\n");
}

const TARGETS: [&str; 5] = ["firstName", "lastName", "emails", "role", ""];

fn header_set() -> Vec<String> {
    (0..6).map(|i| format!("Col{i}")).collect()
}

proptest! {
    #[test]
    fn coverage_is_monotonic(choices in prop::collection::vec(0usize..TARGETS.len(), 6)) {
        let required = strings(&["firstName", "lastName", "role"]);
        let headers = header_set();
        let mut state = MappingState::from_headers(&headers);
        let mut previous = state.required_field_coverage(&required).covered.len();

        for (column, choice) in headers.iter().zip(&choices) {
            if TARGETS[*choice].is_empty() {
                continue;
            }
            state.set_mapping(column, Some(TARGETS[*choice])).unwrap();
            let coverage = state.required_field_coverage(&required);
            prop_assert!(coverage.covered.len() >= previous);
            previous = coverage.covered.len();

            let all_covered = required
                .iter()
                .all(|key| state.entries().any(|(_, t)| t == Some(key.as_str())));
            prop_assert_eq!(coverage.is_complete(), all_covered);
            prop_assert_eq!(coverage.ratio == 1.0, all_covered);
        }
    }

    #[test]
    fn export_excludes_empties_and_is_idempotent(
        choices in prop::collection::vec(0usize..TARGETS.len(), 6),
    ) {
        let headers = header_set();
        let mut state = MappingState::from_headers(&headers);
        for (column, choice) in headers.iter().zip(&choices) {
            state.set_mapping(column, Some(TARGETS[*choice])).unwrap();
        }

        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        match state.to_export_payload("User", 10, ts) {
            Ok(first) => {
                let second = state.to_export_payload("User", 10, ts).unwrap();
                prop_assert_eq!(&first, &second);
                prop_assert!(first.mappings.iter().all(|m| !m.target_field_key.is_empty()));
                prop_assert_eq!(first.mapped_fields, first.mappings.len());

                // Header order is preserved.
                let positions: Vec<usize> = first
                    .mappings
                    .iter()
                    .map(|m| headers.iter().position(|h| *h == m.source_column).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
            Err(MappingError::NoFieldsMapped) => {
                prop_assert!(choices.iter().all(|c| TARGETS[*c].is_empty()));
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn mapped_csv_round_trips(
        cells in prop::collection::vec(
            prop::collection::vec("[a-zA-Z0-9 ,\"\n]{0,8}", 3),
            1..6,
        ),
    ) {
        let table = SpreadsheetTable::new(strings(&["A", "B", "C"]), cells.clone(), "Sheet1");
        let mappings = vec![ColumnMapping::new("C", "c"), ColumnMapping::new("A", "a")];
        let csv = generate_mapped_csv(&table, &mappings).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        prop_assert_eq!(headers, strings(&["c", "a"]));

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = cells
            .iter()
            .map(|row| vec![row[2].clone(), row[0].clone()])
            .collect();
        prop_assert_eq!(parsed, expected);
    }
}
