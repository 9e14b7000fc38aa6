//! Errors surfaced to browsers by the page server

use std::io;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error envelope returned instead of a page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request. Always true for
    /// template failures: the file is read again on the next request.
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Failures while rendering the upload page
#[derive(Error, Debug)]
pub enum PageError {
    /// The template file does not exist
    #[error("Template not found: {}", .path.display())]
    TemplateNotFound {
        /// Path that was read
        path: PathBuf,
    },

    /// The template exists but could not be read
    #[error("Failed to read template {}: {}", .path.display(), .source)]
    TemplateUnreadable {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl PageError {
    /// Classifies an I/O failure on `path`
    #[must_use]
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::TemplateNotFound { path }
        } else {
            Self::TemplateUnreadable { path, source }
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TemplateNotFound { .. } => "template_not_found",
            Self::TemplateUnreadable { .. } => "template_unreadable",
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Server error: {} - {}", self.code(), self);

        let body = ApiErrorResponse {
            allow_retry: true,
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_from_io_classifies_not_found() {
        let err = PageError::from_io(
            PathBuf::from("upload-1.html"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, PageError::TemplateNotFound { .. }));
        assert_eq!(err.code(), "template_not_found");

        let err = PageError::from_io(
            PathBuf::from("upload-1.html"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, PageError::TemplateUnreadable { .. }));
        assert_eq!(err.code(), "template_unreadable");
    }

    #[tokio::test]
    async fn test_into_response_envelope() {
        let response = PageError::TemplateNotFound {
            path: PathBuf::from("missing.html"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["allowRetry"], true);
        assert_eq!(json["error"]["code"], "template_not_found");
        assert_eq!(json["error"]["message"], "Template not found: missing.html");
    }
}
