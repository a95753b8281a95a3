//! End-to-end wizard runs over real CSV files.

use std::fs;

use chrono::{TimeZone, Utc};
use imp_cli::wizard::{EntitySelection, Outcome, Step, TransitionError, Wizard};
use imp_ingest::load_table;
use imp_map::{generate_mapped_csv, write_artifact};
use imp_model::EntityType;
use imp_plugins::default_catalog;
use insta::assert_snapshot;

const USERS_CSV: &str = "\
External ID,First,Last,Role,Email,Notes
EXT001,Ada,Lovelace,CUSTOMER,ada@example.com,\"Acme, Inc. \"\"big\"\"\"
EXT002,Alan,Turing,AGENT,alan@example.com,
";

fn user_selection() -> EntitySelection {
    let catalog = default_catalog(EntityType::User);
    EntitySelection {
        name: "User".to_string(),
        required_keys: catalog.required_keys(),
        catalog,
    }
}

fn uploaded_wizard(dir: &tempfile::TempDir) -> Wizard {
    let path = dir.path().join("users.csv");
    fs::write(&path, USERS_CSV).unwrap();
    let table = load_table(&path).unwrap();

    let mut wizard = Wizard::new();
    wizard.begin_upload().unwrap();
    wizard.complete_upload(path, table);
    wizard
}

#[test]
fn test_full_flow_exports_artifact_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut wizard = uploaded_wizard(&dir);
    assert_eq!(wizard.step(), Step::Preview);
    assert_eq!(wizard.mapping().columns().len(), 6);
    assert_eq!(wizard.mapping().mapped_count(), 0);

    assert_eq!(wizard.advance().unwrap(), Step::Mapping);
    wizard.select_entity(user_selection()).unwrap();

    let mapping = wizard.mapping_mut();
    mapping.set_mapping("External ID", Some("externalId")).unwrap();
    mapping.set_mapping("First", Some("firstName")).unwrap();
    mapping.set_mapping("Last", Some("lastName")).unwrap();
    mapping.set_mapping("Email", Some("emails")).unwrap();

    let err = wizard.advance().unwrap_err();
    assert_eq!(
        err,
        TransitionError::RequiredFieldsMissing {
            missing: vec!["role".to_string()]
        }
    );
    assert_eq!(wizard.step(), Step::Mapping);

    wizard
        .mapping_mut()
        .set_mapping("Role", Some("role"))
        .unwrap();
    assert_eq!(wizard.advance().unwrap(), Step::Summary);

    let table = wizard.table().unwrap().clone();
    let timestamp = Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap();
    let payload = wizard
        .mapping()
        .to_export_payload("User", table.row_count(), timestamp)
        .unwrap();
    assert_eq!(payload.mapped_fields, 5);
    assert_eq!(payload.total_rows, 2);

    let artifact = write_artifact(&payload, dir.path()).unwrap();
    assert_eq!(
        artifact.file_name().unwrap().to_str().unwrap(),
        "mapping-User-1741080600000.json"
    );
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(written["importType"], "User");
    assert_eq!(written["totalRows"], 2);
    assert_eq!(written["mappedFields"], 5);
    assert_eq!(written["mappings"][0]["sourceColumn"], "External ID");
    assert_eq!(written["mappings"][0]["targetFieldKey"], "externalId");

    let csv = generate_mapped_csv(&table, &payload.mappings).unwrap();
    assert_snapshot!(csv, @r"
    externalId,firstName,lastName,role,emails
    EXT001,Ada,Lovelace,CUSTOMER,ada@example.com
    EXT002,Alan,Turing,AGENT,alan@example.com
    ");

    wizard.begin_submit().unwrap();
    wizard.complete_submission(Outcome::Exported {
        artifact,
        csv: None,
    });
    assert_eq!(wizard.step(), Step::Result);
    assert!(!wizard.outcome().unwrap().has_errors());
}

#[test]
fn test_quoted_cells_survive_projection() {
    let dir = tempfile::tempdir().unwrap();
    let mut wizard = uploaded_wizard(&dir);
    wizard.advance().unwrap();
    let mapping = wizard.mapping_mut();
    mapping.set_mapping("First", Some("firstName")).unwrap();
    mapping.set_mapping("Notes", Some("organization")).unwrap();

    let table = wizard.table().unwrap();
    let csv = generate_mapped_csv(table, &wizard.mapping().mappings()).unwrap();
    assert_snapshot!(csv, @r#"
    firstName,organization
    Ada,"Acme, Inc. ""big"""
    Alan,
    "#);
}

#[test]
fn test_going_back_keeps_mapping_and_reset_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut wizard = uploaded_wizard(&dir);
    wizard.advance().unwrap();
    wizard
        .mapping_mut()
        .set_mapping("First", Some("firstName"))
        .unwrap();

    wizard.go_to(Step::Preview).unwrap();
    assert_eq!(wizard.mapping().target_for("First"), Some("firstName"));
    wizard.advance().unwrap();
    assert_eq!(wizard.mapping().mapped_count(), 1);

    wizard.reset();
    assert_eq!(wizard.step(), Step::Upload);
    assert!(wizard.table().is_none());
    assert_eq!(wizard.mapping().mapped_count(), 0);
}
