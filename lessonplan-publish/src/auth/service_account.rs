//! Service account credential variant (JWT bearer grant)

use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::Serialize;
use tracing::info;

use super::{exchange_token, TokenCache, TokenProvider, SCOPES};
use crate::credentials::ServiceAccountKey;
use crate::{Error, Result};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion (Google's maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct JwtHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Non-interactive credential variant
pub struct ServiceAccount {
    http: reqwest::Client,
    key: ServiceAccountKey,
    signer: RsaKeyPair,
    rng: SystemRandom,
    cache: TokenCache,
}

impl ServiceAccount {
    /// Create a provider from a parsed key
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self> {
        let der = decode_pem(&key.private_key)?;
        let signer = RsaKeyPair::from_pkcs8(&der).map_err(|e| {
            Error::InvalidCredentials(format!("service account private key rejected: {}", e))
        })?;

        Ok(Self {
            http,
            key,
            signer,
            rng: SystemRandom::new(),
            cache: TokenCache::default(),
        })
    }

    /// Create a provider from a key file
    pub fn from_file(http: reqwest::Client, path: &Path) -> Result<Self> {
        Self::new(http, ServiceAccountKey::load(path)?)
    }

    /// Signed JWT assertion issued at `now` (unix seconds)
    fn assertion(&self, now: i64) -> Result<String> {
        let unsigned = unsigned_jwt(&self.key, now)?;

        let mut signature = vec![0u8; self.signer.public().modulus_len()];
        self.signer
            .sign(&RSA_PKCS1_SHA256, &self.rng, unsigned.as_bytes(), &mut signature)
            .map_err(|_| Error::Auth("failed to sign service account assertion".to_string()))?;

        Ok(format!("{}.{}", unsigned, URL_SAFE_NO_PAD.encode(signature)))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccount {
    fn kind(&self) -> &'static str {
        "service-account"
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get().await {
            return Ok(token);
        }

        let assertion = self.assertion(Utc::now().timestamp())?;
        let resp = exchange_token(
            &self.http,
            &self.key.token_uri,
            &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
        )
        .await?;

        info!(account = %self.key.client_email, "Obtained service account access token");
        self.cache.put(resp.access_token.clone(), resp.expiry()).await;
        Ok(resp.access_token)
    }
}

/// Header and claims segments of the JWT, base64url-encoded and dot-joined
fn unsigned_jwt(key: &ServiceAccountKey, now: i64) -> Result<String> {
    let header = JwtHeader {
        alg: "RS256",
        typ: "JWT",
        kid: key.private_key_id.as_deref(),
    };
    let claims = JwtClaims {
        iss: &key.client_email,
        scope: SCOPES.join(" "),
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    ))
}

/// DER bytes of a PEM block (armor lines dropped)
fn decode_pem(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    if body.is_empty() {
        return Err(Error::InvalidCredentials(
            "service account private key is empty".to_string(),
        ));
    }

    STANDARD
        .decode(body)
        .map_err(|e| Error::InvalidCredentials(format!("private key is not valid PEM: {}", e)))
}
