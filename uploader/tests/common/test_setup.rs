use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use uploader::{
    storage::{UploadStorage, DEFAULT_URL_EXPIRY_SECS},
    types::{Environment, StorageConfig, StorageCredentials},
};
use uuid::Uuid;

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Storage configuration pointing at `LocalStack`
pub fn localstack_storage_config() -> StorageConfig {
    StorageConfig {
        credentials: StorageCredentials {
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "test".into()),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or_else(|_| "test".into()),
        },
        region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into()),
        endpoint_url: None,
    }
}

/// Base test setup with a storage client and a container name unique to the test
pub struct TestSetup {
    pub environment: Environment,
    pub s3_client: Arc<S3Client>,
    pub storage: UploadStorage,
    pub container_name: String,
}

impl TestSetup {
    pub async fn new() -> Self {
        setup_test_env();

        let environment = Environment::Development;
        let storage_config = localstack_storage_config();

        let s3_config = environment.s3_client_config(&storage_config).await;
        let s3_client = Arc::new(S3Client::from_conf(s3_config));

        let storage = UploadStorage::new(
            s3_client.clone(),
            storage_config.region.clone(),
            DEFAULT_URL_EXPIRY_SECS,
        );

        Self {
            environment,
            s3_client,
            storage,
            container_name: format!("uploads-{}", Uuid::new_v4().simple()),
        }
    }
}
