//! qPCR Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! rules shared by the storage, database, and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, BoxError, ErrorMetadata, LogLevel};
pub use models::{
    AnalysisType, ExperimentRecord, ExperimentStatus, ExperimentUpload, FileUploadMetadata,
    UploadRequest, UploadResponse, ValidatedUpload,
};
pub use validation::FieldViolation;
