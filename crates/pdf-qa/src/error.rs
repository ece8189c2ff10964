//! Error types for the upload and query pipelines

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// No file field in the upload
    #[error("No file uploaded")]
    MissingInput,

    /// Declared media type is not the accepted one
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Upload exceeds the configured byte ceiling
    #[error("Upload exceeds limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Text extraction failed (malformed, encrypted or image-only document)
    #[error("Failed to extract text from '{id}': {message}")]
    ExtractionFailed { id: String, message: String },

    /// Query request is missing a field
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No extracted text exists for the requested identifier
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Completion service call failed
    #[error("Completion failed: {0}")]
    CompletionFailed(String),

    /// Storage area inaccessible or a read/write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a completion error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::CompletionFailed(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and client-facing message for this error
    ///
    /// Server-side failures collapse to a generic message; the detail is
    /// logged instead of returned.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Error::MissingInput => (StatusCode::BAD_REQUEST, "No file uploaded!"),
            Error::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Only PDF files are allowed")
            }
            Error::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "File too large"),
            Error::ExtractionFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process PDF")
            }
            Error::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "Query and filename are required")
            }
            Error::DocumentNotFound(_) => (StatusCode::NOT_FOUND, "Parsed text file not found"),
            Error::CompletionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "OpenAI request failed")
            }
            Error::Storage(_) | Error::Config(_) | Error::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            Error::MissingInput.status_and_message(),
            (StatusCode::BAD_REQUEST, "No file uploaded!")
        );
        assert_eq!(
            Error::DocumentNotFound("42".into()).status_and_message().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::PayloadTooLarge { limit: 1 }.status_and_message().0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let (status, message) = Error::storage("/var/secret: permission denied").status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));

        let (_, message) = Error::completion("quota exceeded").status_and_message();
        assert_eq!(message, "OpenAI request failed");
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Storage(_)));
    }
}
