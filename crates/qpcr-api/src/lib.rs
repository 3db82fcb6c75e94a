//! qPCR Upload API Library
//!
//! This crate provides the HTTP handlers, upload orchestration, and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod telemetry;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::health::HealthResponse;
pub use services::upload::UploadService;
pub use state::AppState;
