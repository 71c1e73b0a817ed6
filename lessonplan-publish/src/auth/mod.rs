//! Google access tokens
//!
//! Two credential variants produce access tokens behind the
//! [`TokenProvider`] trait:
//! - [`InstalledAppFlow`]: interactive browser consent with a cached token
//! - [`ServiceAccount`]: non-interactive JWT bearer grant

mod installed;
mod service_account;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use lessonplan_core::PublishConfig;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{Error, Result};

pub use installed::InstalledAppFlow;
pub use service_account::ServiceAccount;

/// OAuth scopes needed to create and write Google Docs
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/documents",
    "https://www.googleapis.com/auth/drive.file",
];

/// Source of Google API access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Short name of this credential variant
    fn kind(&self) -> &'static str;

    /// A currently valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Which credential variant to publish with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// OAuth Desktop App client with a cached user token
    Interactive {
        credentials_path: PathBuf,
        token_path: PathBuf,
    },
    /// Service account key file
    ServiceAccount { key_path: PathBuf },
}

impl CredentialSource {
    /// Choose a credential variant from configuration.
    ///
    /// A configured service account wins; otherwise the OAuth client
    /// credentials file must exist.
    pub fn from_config(config: &PublishConfig) -> Result<Self> {
        if let Some(key_path) = &config.service_account_path {
            if !key_path.exists() {
                return Err(Error::CredentialsNotFound(key_path.clone()));
            }
            return Ok(CredentialSource::ServiceAccount {
                key_path: key_path.clone(),
            });
        }

        if !config.credentials_path.exists() {
            return Err(Error::CredentialsNotFound(config.credentials_path.clone()));
        }

        Ok(CredentialSource::Interactive {
            credentials_path: config.credentials_path.clone(),
            token_path: config.token_path.clone(),
        })
    }

    /// Build the token provider for this source
    pub fn into_provider(self, http: reqwest::Client) -> Result<Box<dyn TokenProvider>> {
        match self {
            CredentialSource::Interactive {
                credentials_path,
                token_path,
            } => Ok(Box::new(InstalledAppFlow::new(
                http,
                credentials_path,
                token_path,
            ))),
            CredentialSource::ServiceAccount { key_path } => {
                Ok(Box::new(ServiceAccount::from_file(http, &key_path)?))
            }
        }
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600))
    }
}

/// POST a form to a token endpoint
async fn exchange_token(
    http: &reqwest::Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let resp = http.post(token_uri).form(form).send().await?;
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Auth(format!(
            "token endpoint returned {}: {}",
            status,
            body.trim()
        )));
    }

    let token: TokenResponse = resp.json().await?;
    debug!(expires_in = ?token.expires_in, "Exchanged token");
    Ok(token)
}

/// In-memory access token reused until shortly before it expires
#[derive(Debug, Default)]
struct TokenCache {
    inner: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl TokenCache {
    async fn get(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        guard
            .as_ref()
            .filter(|(_, expiry)| *expiry > Utc::now() + Duration::seconds(60))
            .map(|(token, _)| token.clone())
    }

    async fn put(&self, token: String, expiry: DateTime<Utc>) {
        *self.inner.lock().await = Some((token, expiry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_service_account_wins() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("sa.json");
        std::fs::write(&key_path, "{}").unwrap();

        let config = PublishConfig {
            service_account_path: Some(key_path.clone()),
            credentials_path: dir.path().join("missing.json"),
            ..Default::default()
        };

        assert_eq!(
            CredentialSource::from_config(&config).unwrap(),
            CredentialSource::ServiceAccount { key_path }
        );
    }

    #[test]
    fn test_missing_service_account_key() {
        let config = PublishConfig {
            service_account_path: Some(PathBuf::from("/nonexistent/sa.json")),
            ..Default::default()
        };
        assert!(matches!(
            CredentialSource::from_config(&config),
            Err(Error::CredentialsNotFound(_))
        ));
    }

    #[test]
    fn test_interactive_requires_client_credentials() {
        let dir = TempDir::new().unwrap();
        let config = PublishConfig {
            credentials_path: dir.path().join("credentials.json"),
            ..Default::default()
        };
        assert!(matches!(
            CredentialSource::from_config(&config),
            Err(Error::CredentialsNotFound(_))
        ));

        std::fs::write(&config.credentials_path, "{}").unwrap();
        assert!(matches!(
            CredentialSource::from_config(&config).unwrap(),
            CredentialSource::Interactive { .. }
        ));
    }

    #[test]
    fn test_interactive_provider_kind() {
        let source = CredentialSource::Interactive {
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
        };
        let provider = source.into_provider(reqwest::Client::new()).unwrap();
        assert_eq!(provider.kind(), "interactive");
    }

    #[test]
    fn test_token_response_defaults() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token": "ya29.x"}"#).unwrap();
        assert_eq!(resp.access_token, "ya29.x");
        assert!(resp.refresh_token.is_none());
        assert!(resp.expiry() > Utc::now() + Duration::seconds(3500));
    }

    #[tokio::test]
    async fn test_token_cache() {
        let cache = TokenCache::default();
        assert!(cache.get().await.is_none());

        cache
            .put("fresh".to_string(), Utc::now() + Duration::seconds(600))
            .await;
        assert_eq!(cache.get().await.as_deref(), Some("fresh"));

        cache
            .put("stale".to_string(), Utc::now() + Duration::seconds(30))
            .await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint() {
        let http = reqwest::Client::new();
        let err = exchange_token(&http, "http://127.0.0.1:1/token", &[("grant_type", "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
