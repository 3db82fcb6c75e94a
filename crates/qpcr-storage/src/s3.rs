use std::time::Instant;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use chrono::Utc;

use crate::post_policy::{sign_post_policy, SigningCredentials};
use crate::traits::{PresignedPost, PresignedPostRequest, Storage, StorageError, StorageResult};

/// S3 storage implementation
///
/// Upload forms are signed locally; the only remote call is credential resolution
/// through the provider chain of the shared AWS config.
#[derive(Clone)]
pub struct S3Storage {
    credentials: Option<SharedCredentialsProvider>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `sdk_config` - Shared AWS config; only its credentials provider is used
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region the signature is scoped to
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(
        sdk_config: &SdkConfig,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError(
                "bucket name cannot be empty".to_string(),
            ));
        }
        if region.is_empty() {
            return Err(StorageError::ConfigError(
                "region cannot be empty".to_string(),
            ));
        }

        Ok(S3Storage {
            credentials: sdk_config.credentials_provider(),
            bucket,
            region,
            endpoint_url,
        })
    }

    /// URL the upload form is posted to
    ///
    /// For AWS S3, uses the virtual-hosted format: https://{bucket}.s3.{region}.amazonaws.com/
    /// For S3-compatible providers, uses path style: {endpoint}/{bucket}
    fn upload_url(&self) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
        } else {
            format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region)
        }
    }

    async fn resolve_credentials(&self) -> StorageResult<SigningCredentials> {
        let provider = self.credentials.as_ref().ok_or_else(|| {
            StorageError::CredentialsUnavailable("no credentials provider configured".to_string())
        })?;

        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| StorageError::CredentialsUnavailable(e.to_string()))?;

        Ok(SigningCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().map(str::to_string),
        })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn presigned_post(&self, request: &PresignedPostRequest) -> StorageResult<PresignedPost> {
        let start = Instant::now();

        let credentials = self.resolve_credentials().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %request.key,
                "Failed to resolve AWS credentials for upload authorization"
            );
            e
        })?;

        let post = sign_post_policy(
            self.upload_url(),
            &self.bucket,
            &self.region,
            &credentials,
            request,
            Utc::now(),
        )
        .map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %request.key,
                "Failed to sign upload policy"
            );
            e
        })?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %request.key,
            max_content_length = request.max_content_length,
            expires_at = %post.expires_at,
            duration_ms = start.elapsed().as_millis() as u64,
            "Issued presigned POST"
        );

        Ok(post)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
