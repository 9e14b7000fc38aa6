//! Environment configuration for different deployment stages

use std::env;
use std::fmt;

use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use tracing::Level;

/// Name reported by the static credentials provider
const CREDENTIALS_PROVIDER_NAME: &str = "uploader-cli";

/// `LocalStack` edge endpoint used in development
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Talks to the real provider endpoints
    Production,
    /// Development environment (uses `LocalStack`)
    Development,
}

/// Account identity and API key handed to the storage provider
#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    /// Account identity (access key id)
    pub access_key_id: String,
    /// API key (secret access key)
    pub secret_access_key: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Explicit storage client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Credentials used for every provider call
    pub credentials: StorageCredentials,
    /// Region the container lives in
    pub region: String,
    /// Endpoint override, wins over the environment default
    pub endpoint_url: Option<String>,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the endpoint URL to use for the storage provider
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&'static str> {
        match self {
            Self::Production => None,
            Self::Development => Some(LOCALSTACK_ENDPOINT),
        }
    }

    /// Endpoint actually used for `storage`, if any
    #[must_use]
    pub fn endpoint_url<'a>(&self, storage: &'a StorageConfig) -> Option<&'a str> {
        storage
            .endpoint_url
            .as_deref()
            .or_else(|| self.override_aws_endpoint_url())
    }

    /// SDK configuration built from explicit credentials.
    ///
    /// Retries are disabled; every failed call is reported as-is.
    pub async fn aws_config(&self, storage: &StorageConfig) -> aws_config::SdkConfig {
        let credentials = Credentials::new(
            storage.credentials.access_key_id.clone(),
            storage.credentials.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(storage.region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = self.endpoint_url(storage) {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self, storage: &StorageConfig) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config(storage).await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Custom endpoints (LocalStack, MinIO, R2) don't resolve virtual-hosted buckets
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.endpoint_url(storage).is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Default log level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
