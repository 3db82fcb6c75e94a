//! Application state shared by every handler.
//!
//! Read-only after construction; collaborators are injected as trait objects so tests can
//! substitute in-memory fakes.

use std::sync::Arc;

use qpcr_core::Config;
use qpcr_db::ExperimentRepository;
use qpcr_storage::Storage;

use crate::services::upload::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upload: UploadService,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        experiments: Arc<dyn ExperimentRepository>,
    ) -> Self {
        Self {
            config,
            upload: UploadService::new(storage, experiments),
        }
    }
}
