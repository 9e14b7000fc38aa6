//! Upload page rendering

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::provision::MintedUrls;
use crate::types::PageError;

/// Template the page is rendered from unless configured otherwise
pub const DEFAULT_TEMPLATE: &str = "upload-1.html";

/// Renders the upload page for one run's minted URLs.
///
/// The template is read from disk on every call so edits show up without a
/// restart. Supported placeholders are `{upload_url}`, `{download_url}`,
/// `{object_name}` and `{expires_at}`; any other braces are left alone.
#[derive(Debug, Clone)]
pub struct UploadPage {
    template_path: PathBuf,
    urls: MintedUrls,
}

impl UploadPage {
    /// Creates a page backed by the template at `template_path`
    #[must_use]
    pub fn new(template_path: impl Into<PathBuf>, urls: MintedUrls) -> Self {
        Self {
            template_path: template_path.into(),
            urls,
        }
    }

    /// Template location
    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// URLs substituted into the page
    #[must_use]
    pub const fn urls(&self) -> &MintedUrls {
        &self.urls
    }

    /// Reads the template and substitutes the minted URLs
    ///
    /// # Errors
    ///
    /// Returns `PageError::TemplateNotFound` if the template is missing
    /// Returns `PageError::TemplateUnreadable` for any other read failure
    pub async fn render(&self) -> Result<String, PageError> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|e| PageError::from_io(self.template_path.clone(), e))?;

        debug!(template = %self.template_path.display(), "Rendering upload page");

        Ok(self.fill(&template))
    }

    fn fill(&self, template: &str) -> String {
        let download_url = self
            .urls
            .download
            .as_ref()
            .map_or("", |download| download.url.as_str());

        template
            .replace("{upload_url}", &self.urls.upload.url)
            .replace("{download_url}", download_url)
            .replace("{object_name}", &self.urls.object_name.to_string())
            .replace("{expires_at}", &self.urls.upload.expires_at.to_rfc3339())
    }
}
