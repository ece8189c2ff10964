//! Query request and answer types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::DocumentId;

/// Question about a previously uploaded document
///
/// Missing JSON fields deserialize as empty strings so that the pipeline,
/// not the extractor, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub query: String,

    /// Identifier returned by the upload
    #[serde(default)]
    pub filename: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(query: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filename: filename.into(),
        }
    }

    /// Check both fields are present
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidRequest("query is empty".to_string()));
        }
        if self.filename.trim().is_empty() {
            return Err(Error::InvalidRequest("filename is empty".to_string()));
        }
        Ok(())
    }

    /// Target document identifier
    pub fn document_id(&self) -> DocumentId {
        DocumentId::from_client(self.filename.trim())
    }
}

/// Answer produced for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The original question, unmodified
    pub query: String,
    /// The completion service's answer, unmodified
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let request: QueryRequest = serde_json::from_str(r#"{"query": "Why?"}"#).unwrap();
        assert_eq!(request.filename, "");
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_blank_query_rejected() {
        let request = QueryRequest::new("   ", "1.pdf");
        assert!(request.validate().is_err());
        assert!(QueryRequest::new("Why?", "1.pdf").validate().is_ok());
    }
}
