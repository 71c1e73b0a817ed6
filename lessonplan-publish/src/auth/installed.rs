//! Interactive OAuth consent flow for Desktop App clients
//!
//! Opens the user's browser for consent, captures the redirect on a
//! loopback listener, exchanges the authorization code for tokens, and
//! caches the result in `token.json`.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use url::Url;

use super::{exchange_token, TokenCache, TokenProvider, SCOPES};
use crate::credentials::{ClientCredentials, OAuthClient, StoredToken};
use crate::{Error, Result};

/// How long to wait for the user to finish consenting in the browser
const CONSENT_TIMEOUT: StdDuration = StdDuration::from_secs(300);

/// Interactive credential variant
pub struct InstalledAppFlow {
    http: reqwest::Client,
    credentials_path: PathBuf,
    token_path: PathBuf,
    cache: TokenCache,
}

impl InstalledAppFlow {
    /// Create a flow using the client credentials and token cache at the given paths
    pub fn new(
        http: reqwest::Client,
        credentials_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
            cache: TokenCache::default(),
        }
    }

    /// Load a usable token from disk, refreshing it when possible
    async fn cached_token(&self) -> Result<Option<StoredToken>> {
        let Some(token) = StoredToken::load(&self.token_path)? else {
            return Ok(None);
        };

        if !token.covers(SCOPES) {
            debug!(path = %self.token_path.display(), "Cached token lacks required scopes");
            return Ok(None);
        }

        if !token.is_expired() {
            debug!(path = %self.token_path.display(), "Using cached OAuth token");
            return Ok(Some(token));
        }

        if token.refresh_token.is_none() {
            return Ok(None);
        }

        match self.refresh(&token).await {
            Ok(refreshed) => {
                refreshed.save(&self.token_path)?;
                Ok(Some(refreshed))
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, falling back to consent flow");
                Ok(None)
            }
        }
    }

    async fn refresh(&self, token: &StoredToken) -> Result<StoredToken> {
        let refresh_token = token.refresh_token.as_deref().ok_or_else(|| {
            Error::Auth("cached token has no refresh token".to_string())
        })?;

        let mut form = vec![
            ("client_id", token.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = token.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let resp = exchange_token(&self.http, &token.token_uri, &form).await?;
        info!("Refreshed OAuth access token");

        let mut refreshed = token.clone();
        refreshed.expiry = Some(resp.expiry().to_rfc3339());
        refreshed.token = resp.access_token;
        if resp.refresh_token.is_some() {
            refreshed.refresh_token = resp.refresh_token;
        }
        Ok(refreshed)
    }

    /// Run the browser consent flow and return a fresh token
    async fn run_consent_flow(&self) -> Result<StoredToken> {
        let creds = ClientCredentials::load(&self.credentials_path)?;
        let client = creds.client()?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://localhost:{}", port);

        let auth_url = authorization_url(client, &redirect_uri)?;
        info!(port, "Opening browser for Google OAuth consent");
        if let Err(e) = open::that(auth_url.as_str()) {
            warn!(error = %e, url = %auth_url, "Failed to open browser; open the URL manually");
        }

        let code = tokio::time::timeout(CONSENT_TIMEOUT, wait_for_auth_code(&listener))
            .await
            .map_err(|_| Error::FlowCancelled)??;

        let mut form = vec![
            ("code", code.as_str()),
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        if let Some(secret) = client.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let resp = exchange_token(&self.http, &client.token_uri, &form).await?;
        info!("OAuth consent completed");

        Ok(StoredToken {
            expiry: Some(resp.expiry().to_rfc3339()),
            token: resp.access_token,
            refresh_token: resp.refresh_token,
            token_uri: client.token_uri.clone(),
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }
}

#[async_trait]
impl TokenProvider for InstalledAppFlow {
    fn kind(&self) -> &'static str {
        "interactive"
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get().await {
            return Ok(token);
        }

        let token = match self.cached_token().await? {
            Some(token) => token,
            None => {
                let token = self.run_consent_flow().await?;
                token.save(&self.token_path)?;
                token
            }
        };

        let expiry = token
            .expiry
            .as_deref()
            .and_then(|e| chrono::DateTime::parse_from_rfc3339(e).ok())
            .map(|e| e.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        self.cache.put(token.token.clone(), expiry).await;

        Ok(token.token)
    }
}

/// Build the consent URL for an installed-app client
fn authorization_url(client: &OAuthClient, redirect_uri: &str) -> Result<Url> {
    let scope = SCOPES.join(" ");
    Url::parse_with_params(
        &client.auth_uri,
        &[
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| Error::InvalidCredentials(format!("invalid auth_uri: {}", e)))
}

/// Outcome of one request to the loopback redirect listener
#[derive(Debug, PartialEq, Eq)]
enum Redirect {
    /// Authorization code granted
    Code(String),
    /// User denied access or the provider reported an error
    Denied(String),
    /// Unrelated request, e.g. a favicon fetch
    Ignored,
}

/// Parse the request line of a redirect, e.g. `GET /?code=...&scope=... HTTP/1.1`
fn parse_redirect(request: &str) -> Redirect {
    let Some(target) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    else {
        return Redirect::Ignored;
    };

    let Ok(url) = Url::parse(&format!("http://localhost{}", target)) else {
        return Redirect::Ignored;
    };

    let mut code = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (_, Some(error)) => Redirect::Denied(error),
        (Some(code), None) => Redirect::Code(code),
        (None, None) => Redirect::Ignored,
    }
}

/// Accept redirect requests until one carries a code or an error
async fn wait_for_auth_code(listener: &TcpListener) -> Result<String> {
    loop {
        let (mut stream, _) = listener.accept().await?;

        let mut buffer = vec![0u8; 8192];
        let n = stream.read(&mut buffer).await?;
        let request = String::from_utf8_lossy(&buffer[..n]);

        match parse_redirect(&request) {
            Redirect::Code(code) => {
                send_response(
                    &mut stream,
                    "200 OK",
                    "Authorization successful! You can close this tab.",
                )
                .await;
                return Ok(code);
            }
            Redirect::Denied(reason) => {
                send_response(
                    &mut stream,
                    "200 OK",
                    "Authorization denied. You can close this tab.",
                )
                .await;
                warn!(reason = %reason, "OAuth consent denied");
                return Err(Error::FlowCancelled);
            }
            Redirect::Ignored => {
                send_response(&mut stream, "404 Not Found", "Not found").await;
            }
        }
    }
}

/// Send a small HTML page back to the browser; failures are ignored
async fn send_response(stream: &mut TcpStream, status: &str, message: &str) {
    let body = format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding: 40px;\">\
         <h2>{}</h2></body></html>",
        message
    );
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}
