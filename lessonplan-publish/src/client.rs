//! Google Drive / Docs API client using reqwest

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::auth::TokenProvider;
use crate::{Error, Result};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DOCS_DOCUMENTS_URL: &str = "https://docs.googleapis.com/v1/documents";

/// MIME type Drive uses for native Google Docs
pub const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";

#[derive(Debug, Serialize)]
struct CreateFileRequest<'a> {
    name: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    parents: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

/// Google Docs API client for creating and filling documents
pub struct DocsClient {
    http: reqwest::Client,
    tokens: Box<dyn TokenProvider>,
    drive_files_url: String,
    docs_documents_url: String,
}

impl DocsClient {
    /// Create a client that authenticates with `tokens`
    pub fn new(http: reqwest::Client, tokens: Box<dyn TokenProvider>) -> Self {
        Self {
            http,
            tokens,
            drive_files_url: DRIVE_FILES_URL.to_string(),
            docs_documents_url: DOCS_DOCUMENTS_URL.to_string(),
        }
    }

    /// Point the client at different API endpoints (e.g. a proxy)
    pub fn with_endpoints(
        mut self,
        drive_files_url: impl Into<String>,
        docs_documents_url: impl Into<String>,
    ) -> Self {
        self.drive_files_url = drive_files_url.into();
        self.docs_documents_url = docs_documents_url.into();
        self
    }

    /// Credential variant in use
    pub fn credential_kind(&self) -> &'static str {
        self.tokens.kind()
    }

    /// Create an empty Google Doc in `folder_id` and return its id
    ///
    /// Shared drives are supported.
    pub async fn create_document(&self, title: &str, folder_id: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;
        let body = CreateFileRequest {
            name: title,
            mime_type: GOOGLE_DOC_MIME,
            parents: [folder_id],
        };

        debug!(title = %title, folder_id = %folder_id, "Creating Google Doc");
        let resp = self
            .http
            .post(&self.drive_files_url)
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let created: CreatedFile = check_status(resp).await?.json().await?;
        info!(document_id = %created.id, "Created Google Doc");
        Ok(created.id)
    }

    /// Insert `text` at the start of the document body
    pub async fn insert_text(&self, document_id: &str, text: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{}:batchUpdate", self.docs_documents_url, document_id);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&insert_text_request(text))
            .send()
            .await?;

        check_status(resp).await?;
        debug!(document_id = %document_id, chars = text.chars().count(), "Inserted document text");
        Ok(())
    }
}

impl std::fmt::Debug for DocsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsClient")
            .field("credentials", &self.tokens.kind())
            .field("drive_files_url", &self.drive_files_url)
            .finish_non_exhaustive()
    }
}

/// batchUpdate body inserting `text` at index 1 (start of the body)
fn insert_text_request(text: &str) -> serde_json::Value {
    json!({
        "requests": [
            {"insertText": {"location": {"index": 1}, "text": text}}
        ]
    })
}

/// Turn a non-success response into [`Error::Api`]
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Extract `error.message` from a Google API error body, falling back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
