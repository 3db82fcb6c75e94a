//! AWS client construction

use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use qpcr_core::Config;
use qpcr_db::{DynamoExperimentRepository, ExperimentRepository};
use qpcr_storage::{S3Storage, Storage};

/// Build the object-store and database collaborators from one shared AWS config.
pub async fn setup_clients(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Arc<dyn ExperimentRepository>)> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;

    let storage = S3Storage::new(
        &sdk_config,
        config.upload_bucket.clone(),
        config.aws_region.clone(),
        config.s3_endpoint.clone(),
    )
    .context("Failed to initialize S3 storage")?;

    // Configure DynamoDB client with custom endpoint if provided (DynamoDB Local, LocalStack)
    let dynamodb = if let Some(ref endpoint) = config.dynamodb_endpoint {
        let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
            .endpoint_url(endpoint)
            .build();
        aws_sdk_dynamodb::Client::from_conf(dynamo_config)
    } else {
        aws_sdk_dynamodb::Client::new(&sdk_config)
    };

    let experiments =
        DynamoExperimentRepository::new(dynamodb, config.experiments_table.clone())
            .context("Failed to initialize experiment repository")?;

    tracing::info!(
        bucket = %config.upload_bucket,
        table = %config.experiments_table,
        s3_endpoint = ?config.s3_endpoint,
        dynamodb_endpoint = ?config.dynamodb_endpoint,
        "AWS clients initialized"
    );

    Ok((Arc::new(storage), Arc::new(experiments)))
}
