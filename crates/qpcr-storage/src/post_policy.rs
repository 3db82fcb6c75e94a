//! Browser-based upload forms (presigned POST) signed with AWS Signature Version 4.
//!
//! The form is a base64 policy document listing every condition the upload must satisfy,
//! plus a signature over that base64 string derived from the date/region/service
//! scoped signing key.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Map, Value};
use sha2::Sha256;

use crate::traits::{PresignedPost, PresignedPostRequest, StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const META_PREFIX: &str = "x-amz-meta-";

/// Static credentials resolved for a single signing operation.
#[derive(Clone)]
pub struct SigningCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present for temporary (STS) credentials
    pub session_token: Option<String>,
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Build and sign a POST form for `request`, valid from `now` for `request.expires_in`.
pub fn sign_post_policy(
    url: String,
    bucket: &str,
    region: &str,
    credentials: &SigningCredentials,
    request: &PresignedPostRequest,
    now: DateTime<Utc>,
) -> StorageResult<PresignedPost> {
    validate_request(request)?;

    let expires_in = Duration::from_std(request.expires_in)
        .map_err(|e| StorageError::InvalidRequest(format!("expiry out of range: {}", e)))?;
    let expires_at = now + expires_in;

    let date = now.format("%Y%m%d").to_string();
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let credential = format!(
        "{}/{}/{}/{}/aws4_request",
        credentials.access_key_id, date, region, SERVICE
    );

    // Every field except `policy`/`x-amz-signature` is echoed back in the form and bound
    // by an exact-match condition.
    let mut fields = BTreeMap::new();
    fields.insert("key".to_string(), request.key.clone());
    fields.insert("Content-Type".to_string(), request.content_type.clone());
    for (name, value) in &request.metadata {
        fields.insert(name.clone(), value.clone());
    }
    fields.insert("x-amz-algorithm".to_string(), ALGORITHM.to_string());
    fields.insert("x-amz-credential".to_string(), credential);
    fields.insert("x-amz-date".to_string(), amz_date);
    if let Some(token) = &credentials.session_token {
        fields.insert("x-amz-security-token".to_string(), token.clone());
    }

    let mut conditions = vec![json!({ "bucket": bucket })];
    for (name, value) in &fields {
        let mut condition = Map::new();
        condition.insert(name.clone(), Value::String(value.clone()));
        conditions.push(Value::Object(condition));
    }
    conditions.push(json!([
        "content-length-range",
        1,
        request.max_content_length
    ]));

    let policy = json!({
        "expiration": expires_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "conditions": Value::Array(conditions),
    });
    let policy_b64 = STANDARD.encode(policy.to_string());

    let signature = sign_policy(&credentials.secret_access_key, &date, region, &policy_b64)?;

    fields.insert("policy".to_string(), policy_b64);
    fields.insert("x-amz-signature".to_string(), signature);

    Ok(PresignedPost {
        url,
        fields,
        expires_at,
    })
}

fn validate_request(request: &PresignedPostRequest) -> StorageResult<()> {
    if request.key.is_empty() || request.key.starts_with('/') || request.key.contains("..") {
        return Err(StorageError::InvalidKey(request.key.clone()));
    }
    if request.max_content_length == 0 {
        return Err(StorageError::InvalidRequest(
            "max content length must be positive".to_string(),
        ));
    }
    if let Some(name) = request
        .metadata
        .keys()
        .find(|name| !name.starts_with(META_PREFIX) || name.len() == META_PREFIX.len())
    {
        return Err(StorageError::InvalidRequest(format!(
            "metadata field '{}' must be named {}<name>",
            name, META_PREFIX
        )));
    }
    Ok(())
}

/// Hex signature of a base64 policy for S3 in `region` on `date` (`YYYYMMDD`).
fn sign_policy(
    secret_key: &str,
    date: &str,
    region: &str,
    policy_b64: &str,
) -> StorageResult<String> {
    let signing_key = calculate_signing_key(secret_key, date, region, SERVICE)?;
    Ok(hex::encode(hmac_sha256(&signing_key, policy_b64.as_bytes())?))
}

/// Derive the SigV4 signing key: `AWS4{secret}` → date → region → service → `aws4_request`.
fn calculate_signing_key(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> StorageResult<Vec<u8>> {
    let k_secret = format!("AWS4{}", secret_key);
    let k_date = hmac_sha256(k_secret.as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> StorageResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
