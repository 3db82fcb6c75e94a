use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::RECORD_TTL_DAYS;
use crate::models::upload::ValidatedUpload;

/// Type of qPCR analysis to perform on the uploaded plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    DeltaDeltaCt,
    Absolute,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::DeltaDeltaCt => "delta_delta_ct",
            AnalysisType::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "delta_delta_ct" => Some(AnalysisType::DeltaDeltaCt),
            "absolute" => Some(AnalysisType::Absolute),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an experiment. This service only ever creates `Uploaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    Uploaded,
}

impl ExperimentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentStatus::Uploaded => "uploaded",
        }
    }
}

/// Persisted experiment metadata. Attribute names follow the table's camelCase schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentRecord {
    pub experiment_id: Uuid,
    /// The submitter's email address
    pub user_id: String,
    pub experiment_name: String,
    pub upload_timestamp: DateTime<Utc>,
    /// Fully-qualified object URI, `s3://{bucket}/{key}`
    pub input_file_key: String,
    pub analysis_type: AnalysisType,
    pub housekeeping_gene: String,
    pub control_sample: String,
    pub status: ExperimentStatus,
    pub file_name: String,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expiry as epoch seconds
    pub ttl: i64,
}

impl ExperimentRecord {
    /// Build the initial record for an accepted upload. `ttl` is derived from the same
    /// instant as `upload_timestamp`.
    pub fn new(
        experiment_id: Uuid,
        upload: &ValidatedUpload,
        input_file_key: String,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            experiment_id,
            user_id: upload.user_email.clone(),
            experiment_name: upload.experiment_name.clone(),
            upload_timestamp: uploaded_at,
            input_file_key,
            analysis_type: upload.analysis_type,
            housekeeping_gene: upload.housekeeping_gene.clone(),
            control_sample: upload.control_sample.clone(),
            status: ExperimentStatus::Uploaded,
            file_name: upload.file_name.clone(),
            file_size: upload.file_size,
            description: upload.description.clone(),
            ttl: expiry_epoch_seconds(uploaded_at),
        }
    }

    /// ISO-8601 rendering of `upload_timestamp` as stored in the table.
    pub fn upload_timestamp_iso(&self) -> String {
        self.upload_timestamp
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Epoch seconds at which a record created at `created_at` expires.
pub fn expiry_epoch_seconds(created_at: DateTime<Utc>) -> i64 {
    (created_at + Duration::days(RECORD_TTL_DAYS)).timestamp()
}
