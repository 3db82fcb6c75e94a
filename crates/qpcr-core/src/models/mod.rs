//! Domain models

pub mod experiment;
pub mod upload;

pub use experiment::{AnalysisType, ExperimentRecord, ExperimentStatus};
pub use upload::{
    ExperimentUpload, FileUploadMetadata, UploadRequest, UploadResponse, ValidatedUpload,
};
