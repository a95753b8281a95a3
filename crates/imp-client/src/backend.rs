//! Client for the import backend.
//!
//! All calls are single awaited requests with no retry. Non-success
//! statuses become [`ClientError::Status`] carrying the server's `error`
//! text when the body has one.

use std::path::Path;
use std::time::Duration;

use imp_model::{
    ColumnMapping, ExportPayload, ImportAck, ImportReport, RequiredFields, legacy_mappings,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Backend base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_VALUE: &str = concat!("import-wizard/", env!("CARGO_PKG_VERSION"));

/// An entity type advertised by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntityType {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequiredFieldsResponse {
    #[serde(default)]
    required_fields: RequiredFields,
}

/// HTTP client for the import and template endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = build_http_client(timeout)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("backend base URL is empty".to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Asks the backend to parse a spreadsheet and returns its preview as-is.
    pub async fn preview_spreadsheet(&self, path: &Path) -> Result<Value> {
        let url = self.endpoint("import/excel/preview");
        tracing::debug!(url = %url, file = %path.display(), "Requesting remote preview");

        let form = Form::new().part("file", file_part(path)?);
        let response = self.client.post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Submits an exported mapping for import.
    ///
    /// A 2xx answer with `success: false` is returned as
    /// [`ClientError::Rejected`].
    pub async fn import_mapping(&self, payload: &ExportPayload) -> Result<ImportAck> {
        let url = self.endpoint(&format!("import/{}/import-mapping", payload.import_type));
        tracing::info!(
            url = %url,
            entity_type = %payload.import_type,
            mapped_fields = payload.mapped_fields,
            total_rows = payload.total_rows,
            "Submitting mapping"
        );

        let response = self.client.post(&url).json(payload).send().await?;
        let ack: ImportAck = self.handle_response(response).await?;
        if !ack.success {
            return Err(ClientError::Rejected(
                ack.error.unwrap_or_else(|| "Import failed".to_string()),
            ));
        }
        Ok(ack)
    }

    /// Uploads the spreadsheet together with its mappings and returns the
    /// per-row import report.
    pub async fn import_spreadsheet(
        &self,
        entity_type: &str,
        path: &Path,
        mappings: &[ColumnMapping],
    ) -> Result<ImportReport> {
        let url = self.endpoint(&format!("import/{entity_type}/import-excel"));
        tracing::info!(
            url = %url,
            entity_type,
            file = %path.display(),
            mappings = mappings.len(),
            "Uploading spreadsheet for import"
        );

        let mappings_json = serde_json::to_string(&legacy_mappings(mappings))?;
        let form = Form::new()
            .part("file", file_part(path)?)
            .text("mappings", mappings_json);
        let response = self.client.post(&url).multipart(form).send().await?;
        let report: ImportReport = self.handle_response(response).await?;

        tracing::info!(
            total = report.total_records,
            succeeded = report.success_count,
            failed = report.error_count,
            "Import finished"
        );
        Ok(report)
    }

    /// Entity types the backend accepts.
    pub async fn entity_types(&self) -> Result<Vec<RemoteEntityType>> {
        let url = self.endpoint("import/types");
        let response = self.client.get(&url).send().await?;
        let value: Value = self.handle_response(response).await?;
        Ok(decode_entity_types(value))
    }

    /// Field keys the backend accepts for one entity type.
    pub async fn entity_fields(&self, entity_type: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&format!("import/{entity_type}/fields"));
        let response = self.client.get(&url).send().await?;
        let value: Value = self.handle_response(response).await?;
        Ok(decode_field_keys(value))
    }

    pub async fn required_fields(&self, entity_type: &str) -> Result<RequiredFields> {
        let url = self.endpoint(&format!("import/required-fields/{entity_type}"));
        let response = self.client.get(&url).send().await?;
        let body: RequiredFieldsResponse = self.handle_response(response).await?;
        Ok(body.required_fields)
    }

    /// Checks the status, then parses the body as JSON.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = check_status(response).await?;
        let parsed: T = response.json().await?;
        Ok(parsed)
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))
}

/// Turns a non-success response into an error.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(url = %url, status = status.as_u16(), "Request failed");

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(url));
    }
    Err(ClientError::Status {
        status: status.as_u16(),
        message: error_text(status.as_u16(), &body),
    })
}

/// Extracts the error text from a failed response body.
///
/// JSON bodies carry it under `error` (or `message`); plain-text bodies are
/// used as they are.
pub fn error_text(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(Value::String(text)) = map.get(key)
                && !text.trim().is_empty()
            {
                return text.trim().to_string();
            }
        }
        return format!("HTTP error, status {status}");
    }
    if trimmed.is_empty() {
        format!("HTTP error, status {status}")
    } else {
        trimmed.to_string()
    }
}

fn file_part(path: &Path) -> Result<Part> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))?;
    Ok(part)
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        "xls" => "application/vnd.ms-excel",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Accepts `{"Name": "Label", ...}` or a list of names.
fn decode_entity_types(value: Value) -> Vec<RemoteEntityType> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, label)| RemoteEntityType {
                label: label.as_str().unwrap_or(&name).to_string(),
                name,
            })
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(RemoteEntityType {
                    label: name.clone(),
                    name,
                }),
                Value::Object(map) => {
                    let name = map.get("name")?.as_str()?.to_string();
                    let label = map
                        .get("label")
                        .and_then(Value::as_str)
                        .unwrap_or(&name)
                        .to_string();
                    Some(RemoteEntityType { name, label })
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Accepts a list of keys or a list of field objects with a `key`.
fn decode_field_keys(value: Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(key) => Some(key),
            Value::Object(map) => map
                .get("key")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}
