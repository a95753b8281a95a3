//! Submits a finished import to the ticketing API as a support ticket with
//! the mapped CSV attached.

use std::time::Duration;

use chrono::{DateTime, Utc};
use imp_model::ExportPayload;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::backend::{build_http_client, check_status};
use crate::error::{ClientError, Result};

/// Where and as whom import tickets are filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    pub api_url: String,
    pub tenant_id: String,
    pub form_id: u32,
    pub user_email: String,
    pub user_name: String,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.grispi.com/user-forms/tickets".to_string(),
            tenant_id: "help".to_string(),
            form_id: 14,
            user_email: "team+import@grispi.com".to_string(),
            user_name: "Grispi Import User".to_string(),
        }
    }
}

/// `"{tenant} - {type} Import"`, or `"{type} Import"` without a tenant.
pub fn ticket_subject(entity_type: &str, tenant_id: &str) -> String {
    if tenant_id.is_empty() {
        format!("{entity_type} Import")
    } else {
        format!("{tenant_id} - {entity_type} Import")
    }
}

/// HTML body of the ticket's first comment.
pub fn comment_body(
    entity_type: &str,
    total_rows: usize,
    mapped_fields: usize,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        concat!(
            "<div style=\"font-family: Arial, sans-serif; padding: 20px;\">",
            "<h2>Import File</h2>",
            "<p><strong>Import type:</strong> {}</p>",
            "<p><strong>Total rows:</strong> {}</p>",
            "<p><strong>Mapped fields:</strong> {}</p>",
            "<p><strong>Date:</strong> {}</p>",
            "<p style=\"color: #6b7280; font-size: 12px;\">",
            "This file was generated automatically by the import wizard.</p>",
            "</div>"
        ),
        escape_html(entity_type),
        total_rows,
        mapped_fields,
        timestamp.format("%d.%m.%Y %H:%M:%S"),
    )
}

/// Builds the `ticket` part for an import.
pub fn ticket_descriptor(config: &TicketConfig, payload: &ExportPayload) -> Value {
    json!({
        "fields": [
            { "key": "ts.subject", "value": ticket_subject(&payload.import_type, &config.tenant_id) },
            { "key": "ts.form", "value": config.form_id },
            { "key": "ts.untrusted_end_user", "value": format!(":{}:", config.user_email) },
        ],
        "comment": {
            "body": comment_body(
                &payload.import_type,
                payload.total_rows,
                payload.mapped_fields,
                payload.timestamp,
            ),
            "channel": "USER_FORM",
            "creator": [
                { "key": "us.email", "value": config.user_email },
                { "key": "us.full_name", "value": config.user_name },
            ],
            "publicVisible": false,
        },
        "currentAttachments": {
            "inlineImages": [],
            "attachments": [],
        },
    })
}

/// Name of the attached CSV file.
pub fn attachment_file_name(payload: &ExportPayload) -> String {
    format!(
        "{}-import-{}.csv",
        payload.import_type.to_lowercase(),
        payload.timestamp.timestamp_millis()
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Client for the ticket form endpoint.
#[derive(Debug, Clone)]
pub struct TicketClient {
    client: reqwest::Client,
    config: TicketConfig,
}

impl TicketClient {
    pub fn new(config: TicketConfig, timeout: Duration) -> Result<Self> {
        if config.api_url.trim().is_empty() {
            return Err(ClientError::Config("ticket API URL is empty".to_string()));
        }
        let client = build_http_client(timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TicketConfig {
        &self.config
    }

    /// Files a ticket for `payload` with `csv` attached and returns the
    /// ticket identifier from the response body.
    pub async fn submit(&self, payload: &ExportPayload, csv: String) -> Result<String> {
        let descriptor = serde_json::to_string(&ticket_descriptor(&self.config, payload))?;
        let file_name = attachment_file_name(payload);
        tracing::info!(
            url = %self.config.api_url,
            tenant = %self.config.tenant_id,
            entity_type = %payload.import_type,
            attachment = %file_name,
            bytes = csv.len(),
            "Submitting import ticket"
        );

        let ticket = Part::text(descriptor).mime_str("application/json")?;
        let attachment = Part::text(csv)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new()
            .part("ticket", ticket)
            .part("attachments", attachment);

        let response = self
            .client
            .post(&self.config.api_url)
            .header("tenantId", &self.config.tenant_id)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        let ticket_id = response.text().await?.trim().to_string();

        tracing::info!(ticket_id = %ticket_id, "Ticket created");
        Ok(ticket_id)
    }
}
