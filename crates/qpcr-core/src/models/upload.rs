use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::experiment::AnalysisType;
use crate::validation::{
    validate_analysis_type, validate_email_domain, validate_file_type, FieldViolation,
    EXPERIMENT_NAME_RE, FILE_NAME_RE, HOUSEKEEPING_GENE_RE,
};

/// Experiment metadata submitted with an upload
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ExperimentUpload {
    /// Name of the qPCR experiment (surrounding whitespace is trimmed)
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(
        length(
            min = 3,
            max = 100,
            message = "Experiment name must be between 3 and 100 characters"
        ),
        regex(
            path = *EXPERIMENT_NAME_RE,
            message = "Experiment name can only contain letters, numbers, spaces, hyphens, and underscores"
        )
    )]
    pub experiment_name: String,
    /// Type of qPCR analysis to perform: `delta_delta_ct` or `absolute`
    #[schema(example = "delta_delta_ct")]
    #[validate(custom(function = "validate_analysis_type"))]
    pub analysis_type: String,
    /// Reference gene for normalization
    #[validate(
        length(max = 50, message = "Housekeeping gene must be at most 50 characters"),
        regex(
            path = *HOUSEKEEPING_GENE_RE,
            message = "Housekeeping gene can only contain letters, numbers, hyphens, and underscores"
        )
    )]
    pub housekeeping_gene: String,
    /// Control sample name for delta-delta CT
    #[validate(length(max = 50, message = "Control sample must be at most 50 characters"))]
    pub control_sample: String,
    /// Email for notifications
    #[validate(
        email(message = "User email must be a valid email address"),
        custom(function = "validate_email_domain")
    )]
    pub user_email: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Declared properties of the file the client is about to upload
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct FileUploadMetadata {
    /// File size in bytes
    #[validate(range(
        exclusive_min = 0,
        exclusive_max = 20_000_000,
        message = "File size must be greater than 0 and less than 20000000 bytes"
    ))]
    pub file_size: i64,
    /// Must be the Excel (.xlsx) MIME type
    #[schema(example = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")]
    #[validate(custom(function = "validate_file_type"))]
    pub file_type: String,
    /// Excel file name, e.g. `plate_1.xlsx`
    #[validate(regex(
        path = *FILE_NAME_RE,
        message = "File name must match name.xlsx using letters, numbers, spaces, hyphens, and underscores"
    ))]
    pub file_name: String,
}

/// Body of `POST /upload`
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UploadRequest {
    #[validate(nested)]
    pub experiment: ExperimentUpload,
    #[validate(nested)]
    pub file_metadata: FileUploadMetadata,
}

/// An upload request that passed every rule, with strongly-typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub experiment_name: String,
    pub analysis_type: AnalysisType,
    pub housekeeping_gene: String,
    pub control_sample: String,
    pub user_email: String,
    pub description: Option<String>,
    pub file_size: u64,
    pub file_type: String,
    pub file_name: String,
}

impl UploadRequest {
    /// Check every rule and return either the typed request or all violations at once.
    pub fn into_validated(self) -> Result<ValidatedUpload, AppError> {
        self.validate()?;

        let UploadRequest {
            experiment,
            file_metadata,
        } = self;

        let analysis_type = AnalysisType::parse(&experiment.analysis_type).ok_or_else(|| {
            AppError::Validation(vec![FieldViolation::new(
                "experiment.analysis_type",
                "analysis_type",
                "Analysis type must be one of: delta_delta_ct, absolute",
            )])
        })?;
        let file_size = u64::try_from(file_metadata.file_size).map_err(|_| {
            AppError::Validation(vec![FieldViolation::new(
                "file_metadata.file_size",
                "range",
                "File size must be greater than 0",
            )])
        })?;

        Ok(ValidatedUpload {
            experiment_name: experiment.experiment_name,
            analysis_type,
            housekeeping_gene: experiment.housekeeping_gene,
            control_sample: experiment.control_sample,
            user_email: experiment.user_email,
            description: experiment.description.filter(|d| !d.is_empty()),
            file_size,
            file_type: file_metadata.file_type,
            file_name: file_metadata.file_name,
        })
    }
}

/// Response for a successfully authorized upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub experiment_id: Uuid,
    /// URL the client POSTs the multipart form to
    pub upload_url: String,
    /// Form fields that must accompany the file, in any order before the file part
    pub upload_fields: BTreeMap<String, String>,
    pub message: String,
    /// Seconds until the upload authorization expires
    pub expires_in: u64,
}

fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EXCEL_MIME_TYPE;
    use serde_json::{json, Value};

    fn valid_body() -> Value {
        json!({
            "experiment": {
                "experiment_name": "Trial A",
                "analysis_type": "delta_delta_ct",
                "housekeeping_gene": "GAPDH",
                "control_sample": "ctrl1",
                "user_email": "a@b.com"
            },
            "file_metadata": {
                "file_size": 1000,
                "file_type": EXCEL_MIME_TYPE,
                "file_name": "data.xlsx"
            }
        })
    }

    fn validate(body: Value) -> Result<ValidatedUpload, AppError> {
        serde_json::from_value::<UploadRequest>(body)
            .expect("body deserializes")
            .into_validated()
    }

    fn violated_fields(body: Value) -> Vec<String> {
        match validate(body) {
            Err(AppError::Validation(violations)) => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request() {
        let upload = validate(valid_body()).expect("valid");
        assert_eq!(upload.experiment_name, "Trial A");
        assert_eq!(upload.analysis_type, AnalysisType::DeltaDeltaCt);
        assert_eq!(upload.file_size, 1000);
        assert_eq!(upload.description, None);
    }

    #[test]
    fn test_experiment_name_is_trimmed_before_validation() {
        let mut body = valid_body();
        body["experiment"]["experiment_name"] = json!("   Trial A  ");
        assert_eq!(validate(body).unwrap().experiment_name, "Trial A");

        let mut body = valid_body();
        body["experiment"]["experiment_name"] = json!("  ab  ");
        assert_eq!(violated_fields(body), vec!["experiment.experiment_name"]);
    }

    #[test]
    fn test_experiment_name_rules() {
        for bad in ["ab", "Trial/A", "Trial.A"] {
            let mut body = valid_body();
            body["experiment"]["experiment_name"] = json!(bad);
            assert_eq!(violated_fields(body), vec!["experiment.experiment_name"], "{bad}");
        }

        let mut body = valid_body();
        body["experiment"]["experiment_name"] = json!("a".repeat(101));
        assert_eq!(violated_fields(body), vec!["experiment.experiment_name"]);

        let mut body = valid_body();
        body["experiment"]["experiment_name"] = json!("a".repeat(100));
        assert!(validate(body).is_ok());
    }

    #[test]
    fn test_analysis_type_must_be_known() {
        let mut body = valid_body();
        body["experiment"]["analysis_type"] = json!("relative");
        assert_eq!(violated_fields(body), vec!["experiment.analysis_type"]);

        let mut body = valid_body();
        body["experiment"]["analysis_type"] = json!("absolute");
        assert_eq!(validate(body).unwrap().analysis_type, AnalysisType::Absolute);
    }

    #[test]
    fn test_housekeeping_gene_rules() {
        let mut body = valid_body();
        body["experiment"]["housekeeping_gene"] = json!("beta actin");
        assert_eq!(violated_fields(body), vec!["experiment.housekeeping_gene"]);

        let mut body = valid_body();
        body["experiment"]["housekeeping_gene"] = json!("G".repeat(51));
        assert_eq!(violated_fields(body), vec!["experiment.housekeeping_gene"]);
    }

    #[test]
    fn test_control_sample_and_description_limits() {
        let mut body = valid_body();
        body["experiment"]["control_sample"] = json!("c".repeat(51));
        assert_eq!(violated_fields(body), vec!["experiment.control_sample"]);

        let mut body = valid_body();
        body["experiment"]["description"] = json!("d".repeat(501));
        assert_eq!(violated_fields(body), vec!["experiment.description"]);

        let mut body = valid_body();
        body["experiment"]["description"] = json!("d".repeat(500));
        assert_eq!(validate(body).unwrap().description.map(|d| d.len()), Some(500));
    }

    #[test]
    fn test_empty_description_is_treated_as_absent() {
        let mut body = valid_body();
        body["experiment"]["description"] = json!("");
        assert_eq!(validate(body).unwrap().description, None);
    }

    #[test]
    fn test_user_email_must_be_valid() {
        for bad in ["not-an-email", "a@localhost", "user@b", "a@lab.test"] {
            let mut body = valid_body();
            body["experiment"]["user_email"] = json!(bad);
            assert_eq!(violated_fields(body), vec!["experiment.user_email"], "{bad}");
        }
    }

    #[test]
    fn test_file_size_bounds_are_exclusive() {
        for bad in [0, -5, 20_000_000, 25_000_000] {
            let mut body = valid_body();
            body["file_metadata"]["file_size"] = json!(bad);
            assert_eq!(violated_fields(body), vec!["file_metadata.file_size"], "{bad}");
        }

        for ok in [1, 19_999_999] {
            let mut body = valid_body();
            body["file_metadata"]["file_size"] = json!(ok);
            assert_eq!(validate(body).expect("in range").file_size, ok as u64);
        }
    }

    #[test]
    fn test_file_type_and_name() {
        let mut body = valid_body();
        body["file_metadata"]["file_type"] = json!("text/csv");
        assert_eq!(violated_fields(body), vec!["file_metadata.file_type"]);

        let mut body = valid_body();
        body["file_metadata"]["file_name"] = json!("data.csv");
        assert_eq!(violated_fields(body), vec!["file_metadata.file_name"]);
    }

    #[test]
    fn test_all_violations_reported_together() {
        let body = json!({
            "experiment": {
                "experiment_name": "x",
                "analysis_type": "other",
                "housekeeping_gene": "bad gene",
                "control_sample": "ctrl1",
                "user_email": "nope"
            },
            "file_metadata": {
                "file_size": 25_000_000,
                "file_type": "text/csv",
                "file_name": "data.csv"
            }
        });

        assert_eq!(
            violated_fields(body),
            vec![
                "experiment.analysis_type",
                "experiment.experiment_name",
                "experiment.housekeeping_gene",
                "experiment.user_email",
                "file_metadata.file_name",
                "file_metadata.file_size",
                "file_metadata.file_type",
            ]
        );
    }
}
