//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod clients;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use qpcr_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        bucket = %config.upload_bucket,
        table = %config.experiments_table,
        region = %config.aws_region,
        "Configuration loaded and validated successfully"
    );

    // Setup AWS-backed collaborators
    let (storage, experiments) = clients::setup_clients(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage, experiments));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
