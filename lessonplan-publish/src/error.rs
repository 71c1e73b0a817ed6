//! Error types for document publishing

use std::path::PathBuf;

use thiserror::Error;

/// Result type for publishing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while publishing a document
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication error
    #[error("Google authentication error: {0}")]
    Auth(String),

    /// Credentials file missing
    #[error("Google credentials file not found: {0}")]
    CredentialsNotFound(PathBuf),

    /// Credentials file present but unusable
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// User denied or abandoned the consent flow
    #[error("OAuth consent flow cancelled")]
    FlowCancelled,

    /// Google API returned an error response
    #[error("Google API error {status}: {message}")]
    Api { status: u16, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

