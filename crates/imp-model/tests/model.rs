//! Tests for imp-model wire formats.

use imp_model::{ImportReport, MappingTemplate, TemplateRequest};

#[test]
fn import_report_parses_backend_response() {
    let json = r#"{
        "totalRecords": 3,
        "successCount": 2,
        "errorCount": 1,
        "errors": [
            {
                "rowNumber": 3,
                "originalData": { "Name": "Ada", "Email": "not-an-email" },
                "errors": ["Invalid email address"]
            }
        ]
    }"#;
    let report: ImportReport = serde_json::from_str(json).expect("parse report");
    assert_eq!(report.total_records, 3);
    assert!(report.has_errors());
    assert_eq!(report.errors[0].row_number, 3);
    assert_eq!(report.errors[0].errors, vec!["Invalid email address"]);
    assert_eq!(
        report.errors[0].original_data.get("Name"),
        Some(&serde_json::Value::String("Ada".into()))
    );
}

#[test]
fn template_parses_legacy_mapping_names() {
    let json = r#"{
        "id": 7,
        "name": "Default users",
        "importType": "User",
        "mappings": [{ "excelColumn": "Name", "grispiField": "firstName" }],
        "isDefault": true,
        "createdAt": "2024-05-01T10:00:00Z"
    }"#;
    let template: MappingTemplate = serde_json::from_str(json).expect("parse template");
    assert_eq!(template.entity_type, "User");
    assert_eq!(template.description, "");
    assert_eq!(template.mappings[0].source_column, "Name");
    assert!(template.summary().is_default);
    assert_eq!(template.summary().mapping_count, 1);
}

#[test]
fn template_request_uses_import_type_key() {
    let request = TemplateRequest {
        name: "Users".into(),
        description: String::new(),
        entity_type: "User".into(),
        mappings: vec![],
        created_by: "user".into(),
    };
    let value = serde_json::to_value(&request).expect("serialize");
    assert_eq!(value["importType"], "User");
    assert_eq!(value["createdBy"], "user");
}

#[test]
fn template_accepts_offsetless_created_at() {
    let json = r#"{
        "id": 1,
        "name": "Orgs",
        "importType": "Organization",
        "createdAt": "2024-05-01T10:00:00"
    }"#;
    let template: MappingTemplate = serde_json::from_str(json).expect("parse template");
    assert_eq!(template.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    assert!(template.mappings.is_empty());
}
