//! Google credential and token file formats
//!
//! File layouts match what Google Cloud Console downloads and what the
//! google-auth client libraries write, so existing `credentials.json` and
//! `token.json` files keep working.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth client registration from a downloaded `credentials.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    /// Desktop App clients
    pub installed: Option<OAuthClient>,
    /// Web clients
    pub web: Option<OAuthClient>,
}

/// OAuth client id/secret and endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ClientCredentials {
    /// Load client credentials from `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CredentialsNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::InvalidCredentials(format!("{}: {}", path.display(), e)))
    }

    /// The registered client, preferring the Desktop App entry
    pub fn client(&self) -> Result<&OAuthClient> {
        self.installed.as_ref().or(self.web.as_ref()).ok_or_else(|| {
            Error::InvalidCredentials(
                "expected an \"installed\" or \"web\" OAuth client entry".to_string(),
            )
        })
    }
}

/// Service account key file
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Should be "service_account"
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub client_email: String,
    /// PEM-encoded PKCS#8 private key
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Load a service account key from `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CredentialsNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let key: ServiceAccountKey = serde_json::from_str(&contents)
            .map_err(|e| Error::InvalidCredentials(format!("{}: {}", path.display(), e)))?;

        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(Error::InvalidCredentials(format!(
                "{}: expected a service_account key, found \"{}\"",
                path.display(),
                other
            ))),
        }
    }
}

/// Cached OAuth user token (`token.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    /// Access token (google-auth writes this as "token")
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Expiry time (RFC 3339)
    #[serde(default)]
    pub expiry: Option<String>,
}

impl StoredToken {
    /// Load a cached token, or `None` when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write the token with owner-only permissions
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, serde_json::to_string_pretty(self)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), "Saved OAuth token");
        Ok(())
    }

    /// Whether the token is expired (or expires within a minute) at `now`
    ///
    /// A missing or unparseable expiry counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry.as_deref().map(DateTime::parse_from_rfc3339) {
            Some(Ok(expiry)) => expiry <= now + Duration::seconds(60),
            _ => true,
        }
    }

    /// Whether the token is expired now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether every scope in `required` was granted
    pub fn covers(&self, required: &[&str]) -> bool {
        required
            .iter()
            .all(|scope| self.scopes.iter().any(|granted| granted == scope))
    }
}
