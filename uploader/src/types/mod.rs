mod environment;
mod error;

pub use environment::{Environment, StorageConfig, StorageCredentials};
pub use error::{ApiErrorResponse, PageError};
