//! Lessonplan Publish - Google Docs publishing for generated lesson plans
//!
//! This crate provides a [`DocumentPublisher`] that creates a Google Docs
//! document from rendered lesson-plan text. Access tokens come from one of
//! two credential variants: an interactive OAuth consent flow or a
//! non-interactive service account.

pub mod auth;
mod client;
mod credentials;
mod error;
mod publisher;

pub use auth::{CredentialSource, InstalledAppFlow, ServiceAccount, TokenProvider, SCOPES};
pub use client::{DocsClient, GOOGLE_DOC_MIME};
pub use credentials::{ClientCredentials, OAuthClient, ServiceAccountKey, StoredToken};
pub use error::{Error, Result};
pub use publisher::{document_url, DocumentPublisher, GoogleDocsPublisher, PublishedDocument};
