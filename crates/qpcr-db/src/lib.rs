//! qPCR Database Library
//!
//! Persistence of experiment records. The [`ExperimentRepository`] trait is the seam the API
//! layer depends on; [`DynamoExperimentRepository`] is the DynamoDB implementation.

pub mod db;

pub use db::{
    record_to_item, DbError, DbResult, DynamoExperimentRepository, ExperimentRepository,
};
