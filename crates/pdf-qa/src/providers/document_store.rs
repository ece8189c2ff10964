//! Document store provider trait for raw documents and their extracted text

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocumentId;

/// What a purge removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearStats {
    /// Raw documents removed
    pub documents: usize,
    /// Extracted texts removed
    pub texts: usize,
}

/// Trait for the two keyed storage areas
///
/// Raw documents are keyed by full identifier, extracted text by identifier stem.
///
/// Implementations:
/// - `LocalDocumentStore`: Local filesystem (`uploads/`, `parsed/`)
/// - `InMemoryDocumentStore`: Process memory, for tests
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    /// Store raw document bytes
    ///
    /// Returns the storage URI
    async fn put_document(&self, id: &DocumentId, data: &[u8]) -> Result<String>;

    /// Store extracted text under a stem, replacing any previous text
    ///
    /// Returns the storage URI
    async fn put_text(&self, stem: &str, text: &str) -> Result<String>;

    /// Load extracted text; `Ok(None)` when nothing is stored under the stem
    async fn get_text(&self, stem: &str) -> Result<Option<String>>;

    /// Remove every raw document and every extracted text
    async fn clear_all(&self) -> Result<ClearStats>;

    /// Check if both storage areas are reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
