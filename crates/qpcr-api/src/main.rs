use qpcr_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (clients, services, routes)
    let (_state, router) = qpcr_api::setup::initialize_app(config.clone()).await?;

    #[cfg(feature = "lambda")]
    {
        if qpcr_api::setup::lambda::is_lambda_runtime() {
            return qpcr_api::setup::lambda::run(router).await;
        }
    }

    // Start the server
    qpcr_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
