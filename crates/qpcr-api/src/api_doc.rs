//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use qpcr_core::{models, validation};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "qPCR Upload API",
        version = "0.1.0",
        description = "Validates qPCR experiment uploads, issues presigned S3 POST forms for the Excel workbook, and records experiment metadata."
    ),
    paths(
        handlers::upload::create_upload,
        handlers::health::health_check,
    ),
    components(
        schemas(
            // Upload models
            models::UploadRequest,
            models::ExperimentUpload,
            models::FileUploadMetadata,
            models::UploadResponse,
            // Health
            handlers::health::HealthResponse,
            // Error
            validation::FieldViolation,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Experiment upload authorization"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
