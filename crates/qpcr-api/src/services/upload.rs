//! Upload authorization and experiment recording.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use qpcr_core::constants::{
    EXPERIMENT_ID_META_FIELD, UPLOAD_SIZE_OVERHEAD_BYTES, UPLOAD_SUCCESS_MESSAGE,
    UPLOAD_URL_EXPIRY_SECS, USER_EMAIL_META_FIELD,
};
use qpcr_core::{AppError, ExperimentRecord, UploadResponse, ValidatedUpload};
use qpcr_db::ExperimentRepository;
use qpcr_storage::{experiment_key, PresignedPostRequest, Storage};
use uuid::Uuid;

use crate::error::{db_error, storage_error};

/// Issues the upload form for a validated request, then records the experiment.
///
/// The authorization is requested first; if it fails nothing is written. If the record
/// write fails the already-issued form is left to expire.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn Storage>,
    experiments: Arc<dyn ExperimentRepository>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn Storage>, experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self {
            storage,
            experiments,
        }
    }

    pub async fn create_upload(&self, upload: ValidatedUpload) -> Result<UploadResponse, AppError> {
        self.create_upload_at(upload, Utc::now()).await
    }

    /// Same as [`create_upload`](Self::create_upload) with an explicit creation instant.
    pub async fn create_upload_at(
        &self,
        upload: ValidatedUpload,
        now: DateTime<Utc>,
    ) -> Result<UploadResponse, AppError> {
        let experiment_id = Uuid::new_v4();
        let key = experiment_key(experiment_id, &upload.file_name);

        let request = upload_form_request(experiment_id, &key, &upload);
        let post = self
            .storage
            .presigned_post(&request)
            .await
            .map_err(storage_error)?;

        let record = ExperimentRecord::new(
            experiment_id,
            &upload,
            self.storage.object_uri(&key),
            now,
        );
        self.experiments
            .put_experiment(&record)
            .await
            .map_err(db_error)?;

        tracing::info!(
            experiment_id = %experiment_id,
            key = %key,
            file_size = upload.file_size,
            analysis_type = %upload.analysis_type,
            ttl = record.ttl,
            "Issued upload authorization and recorded experiment"
        );

        Ok(UploadResponse {
            experiment_id,
            upload_url: post.url,
            upload_fields: post.fields,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            expires_in: UPLOAD_URL_EXPIRY_SECS,
        })
    }
}

fn upload_form_request(
    experiment_id: Uuid,
    key: &str,
    upload: &ValidatedUpload,
) -> PresignedPostRequest {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        EXPERIMENT_ID_META_FIELD.to_string(),
        experiment_id.to_string(),
    );
    metadata.insert(USER_EMAIL_META_FIELD.to_string(), upload.user_email.clone());

    PresignedPostRequest {
        key: key.to_string(),
        content_type: upload.file_type.clone(),
        max_content_length: upload.file_size + UPLOAD_SIZE_OVERHEAD_BYTES,
        metadata,
        expires_in: Duration::from_secs(UPLOAD_URL_EXPIRY_SECS),
    }
}
