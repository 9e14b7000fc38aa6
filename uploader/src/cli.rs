//! Command line options

use std::path::PathBuf;

use clap::Parser;

use crate::{
    page::DEFAULT_TEMPLATE,
    provision::{UploadSettings, DEFAULT_ALLOWED_ORIGIN, DEFAULT_CONTAINER},
    server::DEFAULT_PORT,
    storage::{DEFAULT_REGION, DEFAULT_URL_EXPIRY_SECS},
    types::{StorageConfig, StorageCredentials},
};

/// Provision an upload container, mint signed URLs and serve a browser upload page
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(version, about)]
pub struct Opts {
    /// Storage account identity (access key id)
    pub account: String,

    /// Storage API key (secret access key)
    pub api_key: String,

    /// Origin allowed to make cross-origin requests to the container
    #[arg(long, env = "UPLOADS_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// Also mint a GET URL for the same object
    #[arg(long, env = "UPLOADS_MINT_DOWNLOAD_URL")]
    pub mint_download_url: bool,

    /// Container to create or reuse
    #[arg(long, env = "UPLOADS_CONTAINER", default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// Region the container lives in
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Custom S3-compatible endpoint
    #[arg(long, env = "S3_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Port the upload page is served on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// HTML template, re-read on every request
    #[arg(long, env = "UPLOADS_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Validity of minted URLs in seconds
    #[arg(long, env = "PRESIGNED_URL_EXPIRY_SECS", default_value_t = DEFAULT_URL_EXPIRY_SECS)]
    pub url_expiry_secs: u64,
}

impl std::fmt::Debug for Opts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opts")
            .field("account", &self.account)
            .field("allowed_origin", &self.allowed_origin)
            .field("mint_download_url", &self.mint_download_url)
            .field("container", &self.container)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("port", &self.port)
            .field("template", &self.template)
            .field("url_expiry_secs", &self.url_expiry_secs)
            .finish_non_exhaustive()
    }
}

impl Opts {
    /// Client configuration for the storage provider
    #[must_use]
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            credentials: StorageCredentials {
                access_key_id: self.account.clone(),
                secret_access_key: self.api_key.clone(),
            },
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    /// What to provision and mint
    #[must_use]
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            container: self.container.clone(),
            allowed_origin: self.allowed_origin.clone(),
            mint_download_url: self.mint_download_url,
        }
    }
}
