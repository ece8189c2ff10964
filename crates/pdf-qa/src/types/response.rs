//! HTTP response bodies

use serde::{Deserialize, Serialize};

use super::document::IngestOutcome;

/// Body returned by a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier to pass back in queries
    pub filename: String,
    /// Human-readable status
    pub message: String,
}

impl From<&IngestOutcome> for UploadResponse {
    fn from(outcome: &IngestOutcome) -> Self {
        Self {
            filename: outcome.id.to_string(),
            message: "PDF uploaded and processed successfully".to_string(),
        }
    }
}
