//! Provisioning pipeline: container, CORS policy, then signed URLs

use tracing::{debug, info};

use crate::storage::{
    Container, ObjectName, PresignedUrl, SignedMethod, StorageResult, UploadStorage,
};

/// Container name used unless configured otherwise
pub const DEFAULT_CONTAINER: &str = "uploads";

/// Origin allowed to talk to the container unless configured otherwise
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8765";

/// What to provision and mint for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Container to create or reuse
    pub container: String,
    /// The only origin the CORS policy allows
    pub allowed_origin: String,
    /// Whether a GET URL is minted next to the PUT URL
    pub mint_download_url: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            mint_download_url: false,
        }
    }
}

/// URLs minted for a single object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedUrls {
    /// Key the browser uploads to
    pub object_name: ObjectName,
    /// PUT URL
    pub upload: PresignedUrl,
    /// GET URL, when requested
    pub download: Option<PresignedUrl>,
}

/// Ensures the container exists, overwrites its CORS policy and mints URLs
/// for a freshly named object. Steps run in order; the first failure aborts.
///
/// # Errors
///
/// Returns the first `StorageError` raised by any step
pub async fn run(storage: &UploadStorage, settings: &UploadSettings) -> StorageResult<MintedUrls> {
    let container = storage.ensure_container(&settings.container).await?;
    storage
        .configure_cors(&container, &settings.allowed_origin)
        .await?;

    mint(storage, &container, settings.mint_download_url).await
}

/// Mints a PUT URL, and optionally a GET URL, for a new object name
///
/// # Errors
///
/// Returns a `StorageError` if presigning fails
pub async fn mint(
    storage: &UploadStorage,
    container: &Container,
    with_download: bool,
) -> StorageResult<MintedUrls> {
    let object_name = ObjectName::generate();
    info!("File will be stored with name {object_name}");

    let upload = storage
        .presign(container, &object_name, SignedMethod::Put)
        .await?;
    debug!("upload_url: {}", upload.url);

    let download = if with_download {
        let download = storage
            .presign(container, &object_name, SignedMethod::Get)
            .await?;
        debug!("download_url: {}", download.url);
        Some(download)
    } else {
        None
    };

    Ok(MintedUrls {
        object_name,
        upload,
        download,
    })
}
