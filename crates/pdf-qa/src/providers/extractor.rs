//! Text extraction provider trait

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Trait for turning raw document bytes into plain text
///
/// Implementations:
/// - `PdfExtractor`: pdf-extract with a lopdf fallback
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from a document
    async fn extract(&self, data: Bytes) -> Result<String>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}
