//! In-memory document store

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::error::Result;
use crate::types::DocumentId;

use super::document_store::{ClearStats, DocumentStoreProvider};

/// Document store held in process memory
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<String, Bytes>,
    texts: DashMap<String, String>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored raw documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether a raw document is stored under `id`
    pub fn contains_document(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id.as_str())
    }

    /// Number of stored texts
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }
}

#[async_trait]
impl DocumentStoreProvider for InMemoryDocumentStore {
    async fn put_document(&self, id: &DocumentId, data: &[u8]) -> Result<String> {
        self.documents
            .insert(id.as_str().to_string(), Bytes::copy_from_slice(data));
        Ok(format!("memory://uploads/{}", id))
    }

    async fn put_text(&self, stem: &str, text: &str) -> Result<String> {
        self.texts.insert(stem.to_string(), text.to_string());
        Ok(format!("memory://parsed/{}.txt", stem))
    }

    async fn get_text(&self, stem: &str) -> Result<Option<String>> {
        Ok(self.texts.get(stem).map(|t| t.value().clone()))
    }

    async fn clear_all(&self) -> Result<ClearStats> {
        let stats = ClearStats {
            documents: self.documents.len(),
            texts: self.texts.len(),
        };
        self.documents.clear();
        self.texts.clear();
        Ok(stats)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_clear() {
        let store = InMemoryDocumentStore::new();
        let id = DocumentId::from_client("5.pdf");

        store.put_document(&id, b"%PDF").await.unwrap();
        store.put_text("5", "text").await.unwrap();
        assert!(store.contains_document(&id));
        assert_eq!(store.get_text("5").await.unwrap().as_deref(), Some("text"));

        let stats = store.clear_all().await.unwrap();
        assert_eq!(stats, ClearStats { documents: 1, texts: 1 });
        assert_eq!(store.document_count(), 0);
        assert_eq!(store.get_text("5").await.unwrap(), None);
    }
}
