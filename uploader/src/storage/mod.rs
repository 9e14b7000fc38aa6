//! S3-compatible container provisioning, CORS setup and URL minting
mod error;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use aws_sdk_s3::{
    error::SdkError,
    operation::create_bucket::CreateBucketError,
    presigning::PresigningConfig,
    types::{BucketLocationConstraint, CorsConfiguration, CorsRule, CreateBucketConfiguration},
    Client as S3Client,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

pub use error::{StorageError, StorageResult};

/// Validity of minted URLs unless configured otherwise
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 60 * 60;

/// Region used unless configured otherwise. Buckets here are created without
/// a location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// HTTP method a presigned URL is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedMethod {
    /// Upload the object
    Put,
    /// Download the object
    Get,
}

impl SignedMethod {
    /// HTTP method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Get => "GET",
        }
    }
}

impl fmt::Display for SignedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Random key the uploaded file will be stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectName(Uuid);

impl ObjectName {
    /// Generates a fresh v4 UUID name. No collision check is made.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Handle to a provisioned container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
}

impl Container {
    /// Wraps an existing container name without contacting the provider
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Container name on the provider
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Presigned URL with expiration information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// Method the signature is valid for
    pub method: SignedMethod,
    /// The presigned URL
    pub url: String,
    /// UTC instant when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Storage client for the upload container
pub struct UploadStorage {
    s3_client: Arc<S3Client>,
    region: String,
    presigned_url_expiry_secs: u64,
}

impl UploadStorage {
    /// Creates a new storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `region` - Region new containers are created in
    /// * `presigned_url_expiry_secs` - Validity of minted URLs in seconds
    #[must_use]
    pub fn new(
        s3_client: Arc<S3Client>,
        region: impl Into<String>,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            region: region.into(),
            presigned_url_expiry_secs,
        }
    }

    /// Creates the container, or returns it if this account already owns it
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ContainerTaken` if another account owns the name
    /// Returns `StorageError::S3Error` for any other service error
    /// Returns `StorageError::AwsError` if the request could not be dispatched
    pub async fn ensure_container(&self, name: &str) -> StorageResult<Container> {
        let mut request = self.s3_client.create_bucket().bucket(name);

        if let Some(configuration) = self.create_bucket_configuration() {
            request = request.create_bucket_configuration(configuration);
        }

        match request.send().await {
            Ok(output) => {
                info!(container = name, location = ?output.location(), "Container created");
                Ok(Container::new(name))
            }
            Err(e) => container_from_create_error(name, e),
        }
    }

    /// Location constraint sent with `CreateBucket`, none in the default region
    fn create_bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        (self.region != DEFAULT_REGION).then(|| {
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build()
        })
    }

    /// Replaces the container's CORS configuration so that `origin` may upload
    /// and download directly. Any previous rules are dropped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the rule cannot be built
    /// Returns `StorageError::S3Error` if the provider rejects the update
    pub async fn configure_cors(&self, container: &Container, origin: &str) -> StorageResult<()> {
        let rule = CorsRule::builder()
            .allowed_origins(origin)
            .allowed_methods(SignedMethod::Put.as_str())
            .allowed_methods(SignedMethod::Get.as_str())
            .allowed_headers("*")
            .expose_headers("ETag")
            .max_age_seconds(3600)
            .build()?;

        let configuration = CorsConfiguration::builder().cors_rules(rule).build()?;

        self.s3_client
            .put_bucket_cors()
            .bucket(container.name())
            .cors_configuration(configuration)
            .send()
            .await?;

        info!(container = container.name(), origin, "Configured CORS");
        Ok(())
    }

    /// Reads back every allowed origin in the container's CORS configuration
    ///
    /// # Errors
    ///
    /// Returns `StorageError::S3Error` if the container has no CORS configuration
    pub async fn read_allowed_origins(&self, container: &Container) -> StorageResult<Vec<String>> {
        let output = self
            .s3_client
            .get_bucket_cors()
            .bucket(container.name())
            .send()
            .await?;

        Ok(output
            .cors_rules()
            .iter()
            .flat_map(|rule| rule.allowed_origins().iter().cloned())
            .collect())
    }

    /// Generates a presigned URL scoped to `method` for `object`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the presigning config is invalid
    /// Returns `StorageError::AwsError` if signing fails
    pub async fn presign(
        &self,
        container: &Container,
        object: &ObjectName,
        method: SignedMethod,
    ) -> StorageResult<PresignedUrl> {
        let expires_in = Duration::from_secs(self.presigned_url_expiry_secs);
        let issued_at = SystemTime::now();

        let presigned_config = PresigningConfig::builder()
            .start_time(issued_at)
            .expires_in(expires_in)
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
            })?;

        let key = object.to_string();
        let presigned_request = match method {
            SignedMethod::Put => {
                self.s3_client
                    .put_object()
                    .bucket(container.name())
                    .key(key)
                    .presigned(presigned_config)
                    .await?
            }
            SignedMethod::Get => {
                self.s3_client
                    .get_object()
                    .bucket(container.name())
                    .key(key)
                    .presigned(presigned_config)
                    .await?
            }
        };

        let expires_at = DateTime::<Utc>::from(issued_at + expires_in);

        debug!(%method, %object, %expires_at, "Minted presigned URL");

        Ok(PresignedUrl {
            method,
            url: presigned_request.uri().to_string(),
            expires_at,
        })
    }
}

/// Maps a failed `CreateBucket` call: a bucket this account already owns is
/// reused, any other failure is an error.
fn container_from_create_error<R: fmt::Debug>(
    name: &str,
    error: SdkError<CreateBucketError, R>,
) -> StorageResult<Container> {
    match error {
        SdkError::ServiceError(service_err)
            if matches!(
                service_err.err(),
                CreateBucketError::BucketAlreadyOwnedByYou(_)
            ) =>
        {
            info!(container = name, "Container already exists");
            Ok(Container::new(name))
        }
        SdkError::ServiceError(service_err)
            if matches!(service_err.err(), CreateBucketError::BucketAlreadyExists(_)) =>
        {
            Err(StorageError::ContainerTaken(name.to_string()))
        }
        e => Err(StorageError::from(e)),
    }
}
