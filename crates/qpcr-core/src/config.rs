//! Configuration module
//!
//! All settings are read once at startup into an explicit [`Config`] that is passed to
//! the service at construction time. Nothing reads the environment after that.

use std::env;

use anyhow::Context;

const DEFAULT_UPLOAD_BUCKET: &str = "qpcr-uploads-dev";
const DEFAULT_EXPERIMENTS_TABLE: &str = "qpcr-experiments";
const DEFAULT_ENVIRONMENT: &str = "dev";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bucket that receives the uploaded spreadsheets
    pub upload_bucket: String,
    /// DynamoDB table holding experiment records
    pub experiments_table: String,
    /// Deployment environment label (dev, staging, production, ...)
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub aws_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub s3_endpoint: Option<String>,
    /// Custom endpoint for DynamoDB Local / LocalStack
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    /// Build a configuration from the three recognized deployment options, using
    /// defaults for everything else.
    pub fn new(
        upload_bucket: impl Into<String>,
        experiments_table: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            upload_bucket: upload_bucket.into(),
            experiments_table: experiments_table.into(),
            environment: environment.into(),
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            aws_region: DEFAULT_AWS_REGION.to_string(),
            s3_endpoint: None,
            dynamodb_endpoint: None,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build and validate a configuration from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name);
        // Endpoint overrides are optional; an empty value means "use AWS".
        let endpoint = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT is not a valid port: {}", port))?,
            None => DEFAULT_SERVER_PORT,
        };

        let cors_origins =
            parse_cors_origins(&var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));

        let config = Self {
            upload_bucket: var("UPLOAD_BUCKET")
                .unwrap_or_else(|| DEFAULT_UPLOAD_BUCKET.to_string()),
            experiments_table: var("DYNAMODB_TABLE")
                .unwrap_or_else(|| DEFAULT_EXPERIMENTS_TABLE.to_string()),
            environment,
            server_port,
            cors_origins,
            aws_region: var("AWS_REGION")
                .or_else(|| var("AWS_DEFAULT_REGION"))
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            s3_endpoint: endpoint("S3_ENDPOINT"),
            dynamodb_endpoint: endpoint("DYNAMODB_ENDPOINT"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_bucket.trim().is_empty() {
            anyhow::bail!("UPLOAD_BUCKET must not be empty");
        }
        if self.experiments_table.trim().is_empty() {
            anyhow::bail!("DYNAMODB_TABLE must not be empty");
        }
        if self.server_port == 0 {
            anyhow::bail!("SERVER_PORT must be greater than 0");
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            anyhow::bail!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            );
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("bucket", "table", "dev");
        assert_eq!(config.upload_bucket, "bucket");
        assert_eq!(config.experiments_table, "table");
        assert_eq!(config.environment, "dev");
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.aws_region, DEFAULT_AWS_REGION);
        assert!(config.s3_endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        assert!(Config::new("", "table", "dev").validate().is_err());
        assert!(Config::new("bucket", "  ", "dev").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = Config::new("bucket", "table", "production");
        assert!(config.is_production());
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.upload_bucket, "qpcr-uploads-dev");
        assert_eq!(config.experiments_table, "qpcr-experiments");
        assert_eq!(config.environment, "dev");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.aws_region, "us-east-1");
        assert!(config.s3_endpoint.is_none());
        assert!(config.dynamodb_endpoint.is_none());
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("UPLOAD_BUCKET", "lab-uploads"),
            ("DYNAMODB_TABLE", "lab-experiments"),
            ("ENVIRONMENT", "staging"),
            ("SERVER_PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example.com,https://b.example.com"),
            ("AWS_REGION", "eu-west-1"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]))
        .unwrap();

        assert_eq!(config.upload_bucket, "lab-uploads");
        assert_eq!(config.experiments_table, "lab-experiments");
        assert_eq!(config.environment, "staging");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.s3_endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_from_lookup_environment_falls_back_to_app_env() {
        let config = Config::from_lookup(lookup(&[("APP_ENV", "qa")])).unwrap();
        assert_eq!(config.environment, "qa");

        let config = Config::from_lookup(lookup(&[("ENVIRONMENT", "dev"), ("APP_ENV", "qa")]))
            .unwrap();
        assert_eq!(config.environment, "dev");

        let config =
            Config::from_lookup(lookup(&[("AWS_DEFAULT_REGION", "ap-south-1")])).unwrap();
        assert_eq!(config.aws_region, "ap-south-1");
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));

        assert!(Config::from_lookup(lookup(&[("SERVER_PORT", "70000")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SERVER_PORT", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("ENVIRONMENT", "production")])).is_err());
    }

    #[test]
    fn test_from_lookup_empty_values() {
        let config = Config::from_lookup(lookup(&[("S3_ENDPOINT", ""), ("DYNAMODB_ENDPOINT", " ")]))
            .unwrap();
        assert!(config.s3_endpoint.is_none());
        assert!(config.dynamodb_endpoint.is_none());

        assert!(Config::from_lookup(lookup(&[("UPLOAD_BUCKET", "  ")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DYNAMODB_TABLE", "")])).is_err());
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(
            parse_cors_origins(" https://a.example.com , ,https://b.example.com"),
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert_eq!(parse_cors_origins("*"), vec!["*"]);
    }
}
