//! Database repositories for data access layer
//
// Experiment records (DynamoDB)
pub mod experiment;
//
// Record <-> item attribute mapping
pub mod item;

pub use experiment::{DbError, DbResult, DynamoExperimentRepository, ExperimentRepository};
pub use item::record_to_item;
