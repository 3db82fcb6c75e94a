use std::time::Instant;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use qpcr_core::ExperimentRecord;
use thiserror::Error;
use uuid::Uuid;

use super::item::{record_to_item, PARTITION_KEY};

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Experiment {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Persistence of experiment records. Records are written once and never updated.
#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// Store a new record; fails if a record with the same id already exists
    async fn put_experiment(&self, record: &ExperimentRecord) -> DbResult<()>;
}

/// Repository for experiment records stored in DynamoDB
#[derive(Clone)]
pub struct DynamoExperimentRepository {
    client: Client,
    table: String,
}

impl DynamoExperimentRepository {
    pub fn new(client: Client, table: String) -> DbResult<Self> {
        if table.is_empty() {
            return Err(DbError::ConfigError(
                "table name cannot be empty".to_string(),
            ));
        }
        Ok(Self { client, table })
    }
}

#[async_trait]
impl ExperimentRepository for DynamoExperimentRepository {
    async fn put_experiment(&self, record: &ExperimentRecord) -> DbResult<()> {
        let start = Instant::now();

        let result = self
            .client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(record_to_item(record)))
            .condition_expression(format!("attribute_not_exists({})", PARTITION_KEY))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(
                    table = %self.table,
                    experiment_id = %record.experiment_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Experiment record written"
                );
                Ok(())
            }
            Err(e) => {
                let conflict = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    table = %self.table,
                    experiment_id = %record.experiment_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Failed to write experiment record"
                );
                if conflict {
                    Err(DbError::AlreadyExists(record.experiment_id))
                } else {
                    Err(DbError::WriteFailed(DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }
}
