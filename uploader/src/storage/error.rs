//! Error types for storage operations

use aws_sdk_s3::error::{BuildError, DisplayErrorContext, SdkError};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, response parsing)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Container name is owned by another account
    #[error("Container already exists and is owned by someone else: {0}")]
    ContainerTaken(String),
}

impl<E, R> From<SdkError<E, R>> for StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        let message = DisplayErrorContext(&error).to_string();
        match error {
            SdkError::ServiceError(_) => Self::S3Error(message),
            _ => Self::AwsError(message),
        }
    }
}

impl From<BuildError> for StorageError {
    fn from(error: BuildError) -> Self {
        Self::ConfigError(error.to_string())
    }
}
