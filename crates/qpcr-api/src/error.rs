//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<HttpAppError>`) for errors so they render
//! consistently (status, body, logging).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use qpcr_core::{AppError, ErrorMetadata, FieldViolation, LogLevel};
use qpcr_db::DbError;
use qpcr_storage::StorageError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Every violated constraint, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldViolation>>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from qpcr-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Syntax errors are 400; well-formed JSON of the wrong shape is a 422 on `body`.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        let body_text = rejection.body_text();
        let app = match rejection {
            JsonRejection::JsonDataError(_) => AppError::Validation(vec![FieldViolation::new(
                "body",
                "invalid_body",
                body_text,
            )]),
            JsonRejection::JsonSyntaxError(_) => {
                AppError::InvalidInput(format!("Invalid JSON body: {}", body_text))
            }
            JsonRejection::MissingJsonContentType(_) => AppError::InvalidInput(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            _ => AppError::InvalidInput(format!("Invalid request body: {}", body_text)),
        };
        HttpAppError(app)
    }
}

/// JSON body extractor that returns our ErrorResponse format on deserialization failure.
/// Use this instead of `Json<T>` when you want a consistent API error shape for invalid bodies.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

/// Upload authorization failures all surface as the same client-facing 500.
pub fn storage_error(err: StorageError) -> AppError {
    AppError::UploadAuthorization(Box::new(err))
}

/// Record write failures (including an id collision) surface as the same client-facing 500.
pub fn db_error(err: DbError) -> AppError {
    AppError::RecordWrite(Box::new(err))
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

impl From<DbError> for HttpAppError {
    fn from(err: DbError) -> Self {
        HttpAppError(db_error(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl HttpAppError {
    fn to_error_response(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.0;
        // Always hide details in production; elsewhere only for non-sensitive errors.
        let show_details = !is_production && !app_error.is_sensitive();

        ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            fields: app_error.violations().map(<[FieldViolation]>::to_vec),
        }
    }
}

/// Detailed rendering of an error, carried as a response extension until
/// [`render_error_details`] decides whether the client may see it.
#[derive(Debug, Clone)]
struct ErrorDetails(ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        // The body defaults to the production rendering.
        let mut response = (status, Json(self.to_error_response(true))).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails(self.to_error_response(false)));
        response
    }
}

/// Router middleware: outside production, replace error bodies with their detailed form.
pub async fn render_error_details(
    State(is_production): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorDetails>() {
        Some(ErrorDetails(details)) if !is_production => {
            (response.status(), Json(details)).into_response()
        }
        _ => response,
    }
}
