//! Template CRUD against the backend's `/mapping-templates` endpoints.
//!
//! Responses are wrapped in an envelope (`success`, `error`, `template`,
//! `templates`). Stored templates keep their mappings as a JSON string under
//! `mappingsJson`; the single-template endpoint also returns them decoded
//! under a sibling `mappings` key.

use async_trait::async_trait;
use imp_map::TemplateStore;
use imp_model::{ColumnMapping, LegacyColumnMapping, MappingTemplate, TemplateRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::BackendClient;
use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    template: Option<Value>,
    #[serde(default)]
    templates: Option<Vec<Value>>,
    #[serde(default)]
    mappings: Option<Value>,
}

fn default_success() -> bool {
    true
}

impl Envelope {
    fn into_checked(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Rejected(
                self.error
                    .unwrap_or_else(|| "Template request failed".to_string()),
            ))
        }
    }
}

/// Body sent on create and update; the backend reads the legacy mapping keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateBody<'a> {
    name: &'a str,
    description: &'a str,
    import_type: &'a str,
    mappings: Vec<LegacyColumnMapping<'a>>,
    created_by: &'a str,
}

impl<'a> From<&'a TemplateRequest> for TemplateBody<'a> {
    fn from(request: &'a TemplateRequest) -> Self {
        Self {
            name: &request.name,
            description: &request.description,
            import_type: &request.entity_type,
            mappings: request.mappings.iter().map(LegacyColumnMapping::from).collect(),
            created_by: &request.created_by,
        }
    }
}

/// Decodes one template object from the backend.
///
/// Null members are dropped so that serde defaults apply, and mappings are
/// taken from `mappings` (or the envelope's sibling list) before falling
/// back to the `mappingsJson` string.
pub fn decode_template(value: Value, sibling_mappings: Option<&Value>) -> Result<MappingTemplate> {
    let Value::Object(object) = value else {
        return Err(ClientError::JsonParse(
            "template is not a JSON object".to_string(),
        ));
    };
    let mut object: Map<String, Value> = object
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .collect();

    if !object.contains_key("mappings") {
        let mappings = match sibling_mappings {
            Some(list) => Some(list.clone()),
            None => match object.get("mappingsJson") {
                Some(Value::String(raw)) => Some(serde_json::from_str::<Value>(raw)?),
                _ => None,
            },
        };
        if let Some(mappings) = mappings {
            object.insert("mappings".to_string(), mappings);
        }
    }

    let template: MappingTemplate = serde_json::from_value(Value::Object(object))?;
    Ok(template)
}

fn require_template(envelope: Envelope, what: &str) -> Result<MappingTemplate> {
    let sibling = envelope.mappings;
    match envelope.template {
        Some(value) => decode_template(value, sibling.as_ref()),
        None => Err(ClientError::NotFound(what.to_string())),
    }
}

#[async_trait]
impl TemplateStore for BackendClient {
    type Error = ClientError;

    async fn list(&self, entity_type: &str) -> Result<Vec<MappingTemplate>> {
        let url = self.endpoint(&format!("mapping-templates/{entity_type}"));
        let response = self.client.get(&url).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        let envelope = envelope.into_checked()?;

        let mut templates = Vec::new();
        for value in envelope.templates.unwrap_or_default() {
            match decode_template(value, None) {
                Ok(template) => templates.push(template),
                Err(e) => tracing::warn!(entity_type, error = %e, "Skipping unreadable template"),
            }
        }
        tracing::debug!(entity_type, count = templates.len(), "Listed remote templates");
        Ok(templates)
    }

    async fn get(&self, id: i64) -> Result<MappingTemplate> {
        let url = self.endpoint(&format!("mapping-templates/template/{id}"));
        let response = self.client.get(&url).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        require_template(envelope.into_checked()?, &format!("template {id}"))
    }

    async fn default_for(&self, entity_type: &str) -> Result<Option<MappingTemplate>> {
        let url = self.endpoint(&format!("mapping-templates/{entity_type}/default"));
        let response = self.client.get(&url).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        let envelope = envelope.into_checked()?;
        match envelope.template {
            Some(value) => Ok(Some(decode_template(value, None)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, request: &TemplateRequest) -> Result<MappingTemplate> {
        let url = self.endpoint("mapping-templates");
        tracing::info!(name = %request.name, entity_type = %request.entity_type, "Saving template");

        let response = self
            .client
            .post(&url)
            .json(&TemplateBody::from(request))
            .send()
            .await?;
        let envelope: Envelope = self.handle_response(response).await?;
        let mut template = require_template(envelope.into_checked()?, "created template")?;
        fill_missing_mappings(&mut template, &request.mappings);
        Ok(template)
    }

    async fn update(&self, id: i64, request: &TemplateRequest) -> Result<MappingTemplate> {
        tracing::info!(id, name = %request.name, "Updating template");
        let response = self.update_request(id, request).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        let mut template = require_template(envelope.into_checked()?, &format!("template {id}"))?;
        fill_missing_mappings(&mut template, &request.mappings);
        Ok(template)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("mapping-templates/{id}"));
        tracing::info!(id, "Deleting template");

        let response = self.client.delete(&url).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        envelope.into_checked()?;
        Ok(())
    }

    async fn set_default(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("mapping-templates/{id}/set-default"));
        tracing::info!(id, "Setting default template");

        let response = self.client.put(&url).send().await?;
        let envelope: Envelope = self.handle_response(response).await?;
        envelope.into_checked()?;
        Ok(())
    }
}

impl BackendClient {
    fn update_request(&self, id: i64, request: &TemplateRequest) -> reqwest::RequestBuilder {
        let url = self.endpoint(&format!("mapping-templates/{id}"));
        self.client.put(&url).json(&TemplateBody::from(request))
    }
}

fn fill_missing_mappings(template: &mut MappingTemplate, sent: &[ColumnMapping]) {
    if template.mappings.is_empty() && !sent.is_empty() {
        template.mappings = sent.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_template_from_mappings_json() {
        let value = json!({
            "id": 3,
            "name": "Contacts",
            "importType": "User",
            "description": null,
            "mappingsJson": "[{\"excelColumn\":\"Email\",\"grispiField\":\"emails\"}]",
            "createdAt": "2025-01-02T10:00:00",
            "isDefault": true,
            "createdBy": "user"
        });
        let template = decode_template(value, None).unwrap();
        assert_eq!(template.id, 3);
        assert_eq!(template.entity_type, "User");
        assert_eq!(template.description, "");
        assert!(template.is_default);
        assert_eq!(template.mappings, vec![ColumnMapping::new("Email", "emails")]);
    }

    #[test]
    fn test_decode_template_prefers_sibling_mappings() {
        let value = json!({
            "id": 4,
            "name": "T",
            "importType": "Ticket",
            "mappingsJson": "[]",
            "createdAt": "2025-01-02T10:00:00Z"
        });
        let sibling = json!([{"excelColumn": "Subject", "grispiField": "subject"}]);
        let template = decode_template(value, Some(&sibling)).unwrap();
        assert_eq!(template.mappings.len(), 1);
        assert_eq!(template.mappings[0].target_field_key, "subject");
    }

    #[test]
    fn test_decode_template_rejects_non_object() {
        assert!(matches!(
            decode_template(json!([1, 2]), None),
            Err(ClientError::JsonParse(_))
        ));
    }

    #[test]
    fn test_envelope_failure_is_rejected() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"success":false,"error":"Template name exists"}"#).unwrap();
        match envelope.into_checked() {
            Err(ClientError::Rejected(message)) => assert_eq!(message, "Template name exists"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_template_body_uses_legacy_keys() {
        let request = TemplateRequest {
            name: "Contacts".to_string(),
            description: String::new(),
            entity_type: "User".to_string(),
            mappings: vec![ColumnMapping::new("Name", "firstName")],
            created_by: "user".to_string(),
        };
        let body = serde_json::to_value(TemplateBody::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Contacts",
                "description": "",
                "importType": "User",
                "mappings": [{"excelColumn": "Name", "grispiField": "firstName"}],
                "createdBy": "user"
            })
        );
    }

    #[test]
    fn test_update_puts_legacy_body_to_template_path() {
        let client =
            BackendClient::new("http://localhost:8080/api", std::time::Duration::from_secs(5))
                .unwrap();
        let request = TemplateRequest {
            name: "Staff".to_string(),
            description: "renamed".to_string(),
            entity_type: "User".to_string(),
            mappings: vec![ColumnMapping::new("Mail", "emails")],
            created_by: "user".to_string(),
        };

        let built = client.update_request(12, &request).build().unwrap();
        assert_eq!(built.method(), reqwest::Method::PUT);
        assert_eq!(built.url().path(), "/api/mapping-templates/12");
        assert_eq!(
            built.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        let body: Value =
            serde_json::from_slice(built.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Staff",
                "description": "renamed",
                "importType": "User",
                "mappings": [{"excelColumn": "Mail", "grispiField": "emails"}],
                "createdBy": "user"
            })
        );
    }
}
