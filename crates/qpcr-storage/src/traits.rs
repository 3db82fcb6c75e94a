//! Storage abstraction trait
//!
//! This module defines the Storage trait that upload authorization backends implement.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What a presigned POST form must allow, and nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPostRequest {
    /// Exact object key the form may write to
    pub key: String,
    /// Exact `Content-Type` the upload must declare
    pub content_type: String,
    /// Upper bound of the `content-length-range` condition (lower bound is 1)
    pub max_content_length: u64,
    /// Exact-match `x-amz-meta-*` fields, keyed by full form field name
    pub metadata: BTreeMap<String, String>,
    pub expires_in: Duration,
}

/// A signed upload form: POST `fields` plus the file to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    pub url: String,
    pub fields: BTreeMap<String, String>,
    pub expires_at: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// Backends issue time-limited upload authorizations scoped to a single key. The API
/// layer only talks to this trait, so tests substitute an in-memory fake.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Issue a presigned POST form for `request.key`
    async fn presigned_post(&self, request: &PresignedPostRequest) -> StorageResult<PresignedPost>;

    /// Bucket receiving uploads
    fn bucket(&self) -> &str;

    /// Fully-qualified URI of an object in this bucket, `s3://{bucket}/{key}`
    fn object_uri(&self, key: &str) -> String {
        crate::keys::object_uri(self.bucket(), key)
    }
}
