//! Shared key generation for uploaded experiment files.
//!
//! Key format: `experiments/{experiment_id}/{file_name}`.

use qpcr_core::constants::EXPERIMENTS_KEY_PREFIX;
use uuid::Uuid;

/// Generate the storage key for an experiment's input workbook.
///
/// `file_name` must already be validated; it never contains `/` or `..`.
pub fn experiment_key(experiment_id: Uuid, file_name: &str) -> String {
    format!("{}/{}/{}", EXPERIMENTS_KEY_PREFIX, experiment_id, file_name)
}

pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}
