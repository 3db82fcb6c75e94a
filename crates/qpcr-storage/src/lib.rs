//! qPCR Storage Library
//!
//! This crate provides the object-store side of an upload: the [`Storage`] trait that
//! issues delegated upload authorizations (presigned POST forms) and the S3 implementation.
//!
//! # Storage key format
//!
//! Uploaded workbooks live under `experiments/{experiment_id}/{file_name}`. Key generation
//! is centralized in the `keys` module so the record and the authorization always agree.

pub mod keys;
pub mod post_policy;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use keys::{experiment_key, object_uri};
pub use post_policy::SigningCredentials;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{PresignedPost, PresignedPostRequest, Storage, StorageError, StorageResult};
