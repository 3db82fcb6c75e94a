//! Upload authorization handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use qpcr_core::{UploadRequest, UploadResponse};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Upload URL generated", body = UploadResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Request failed validation", body = ErrorResponse),
        (status = 500, description = "Upload authorization or record write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_upload"))]
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Nothing leaves the process until every rule has passed.
    let upload = request.into_validated()?;

    let response = state.upload.create_upload(upload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}
