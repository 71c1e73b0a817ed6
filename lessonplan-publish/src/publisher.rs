//! Document publishing

use async_trait::async_trait;
use lessonplan_core::PublishConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CredentialSource;
use crate::client::DocsClient;
use crate::Result;

/// A document created by a publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedDocument {
    /// Remote document id
    pub id: String,
    /// Link for opening the document in a browser
    pub url: String,
}

/// Edit link for a Google Doc
pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", document_id)
}

/// Trait for publishing rendered text as a remote document
#[async_trait]
pub trait DocumentPublisher: Send + Sync {
    /// Get the name of this publisher
    fn name(&self) -> &'static str;

    /// Create a document titled `title` containing `text`
    async fn publish(&self, title: &str, text: &str) -> Result<PublishedDocument>;
}

/// Publishes into a Google Drive folder as a native Google Doc
#[derive(Debug)]
pub struct GoogleDocsPublisher {
    client: DocsClient,
    folder_id: String,
}

impl GoogleDocsPublisher {
    /// Create a publisher targeting `folder_id`
    pub fn new(client: DocsClient, folder_id: impl Into<String>) -> Self {
        Self {
            client,
            folder_id: folder_id.into(),
        }
    }

    /// Build a publisher from configuration, choosing the credential variant
    pub fn from_config(config: &PublishConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let tokens = CredentialSource::from_config(config)?.into_provider(http.clone())?;

        info!(
            credentials = tokens.kind(),
            folder_id = %config.folder_id,
            "Configured Google Docs publisher"
        );
        Ok(Self::new(DocsClient::new(http, tokens), config.folder_id.clone()))
    }

    /// Target Drive folder
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }
}

#[async_trait]
impl DocumentPublisher for GoogleDocsPublisher {
    fn name(&self) -> &'static str {
        "google-docs"
    }

    async fn publish(&self, title: &str, text: &str) -> Result<PublishedDocument> {
        let id = self.client.create_document(title, &self.folder_id).await?;
        self.client.insert_text(&id, text).await?;

        let url = document_url(&id);
        info!(document_id = %id, url = %url, "Published document");
        Ok(PublishedDocument { id, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_document_url() {
        assert_eq!(
            document_url("1AbC"),
            "https://docs.google.com/document/d/1AbC/edit"
        );
    }

    #[test]
    fn test_from_config_without_credentials() {
        let config = PublishConfig {
            credentials_path: PathBuf::from("/nonexistent/credentials.json"),
            ..Default::default()
        };
        assert!(matches!(
            GoogleDocsPublisher::from_config(&config),
            Err(Error::CredentialsNotFound(_))
        ));
    }

    #[test]
    fn test_from_config_interactive() {
        let dir = TempDir::new().unwrap();
        let credentials_path = dir.path().join("credentials.json");
        std::fs::write(&credentials_path, r#"{"installed": {"client_id": "c"}}"#).unwrap();

        let config = PublishConfig {
            credentials_path,
            token_path: dir.path().join("token.json"),
            folder_id: "shared-folder".to_string(),
            ..Default::default()
        };
        let publisher = GoogleDocsPublisher::from_config(&config).unwrap();
        assert_eq!(publisher.name(), "google-docs");
        assert_eq!(publisher.folder_id(), "shared-folder");
        assert_eq!(publisher.client.credential_kind(), "interactive");
    }
}
