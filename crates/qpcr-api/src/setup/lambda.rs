//! AWS Lambda entrypoint

use anyhow::Result;
use axum::Router;

/// True when the process was started by the Lambda runtime.
pub fn is_lambda_runtime() -> bool {
    std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok()
}

/// Serve the router through the Lambda runtime until the execution environment shuts down.
pub async fn run(router: Router) -> Result<()> {
    tracing::info!("Starting Lambda runtime");
    lambda_http::run(router)
        .await
        .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))
}
