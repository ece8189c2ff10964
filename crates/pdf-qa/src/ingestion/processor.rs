//! Ingestion pipeline: validate, purge, store, extract, persist text

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::providers::TextExtractor;
use crate::types::{DocumentId, IngestOutcome, UploadedFile};

use super::identifier::IdGenerator;
use super::slot::UploadSlot;

/// Document ingestion pipeline
pub struct IngestPipeline {
    slot: Arc<UploadSlot>,
    extractor: Arc<dyn TextExtractor>,
    ids: Arc<dyn IdGenerator>,
    accepted_media_type: String,
    max_upload_size: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        slot: Arc<UploadSlot>,
        extractor: Arc<dyn TextExtractor>,
        ids: Arc<dyn IdGenerator>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            slot,
            extractor,
            ids,
            accepted_media_type: config.accepted_media_type.clone(),
            max_upload_size: config.max_upload_size,
        }
    }

    /// Largest accepted upload in bytes
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Check the declared media type against the accepted one
    ///
    /// Parameters (`; charset=...`) are ignored and the comparison is case-insensitive.
    pub fn check_media_type(&self, declared: Option<&str>) -> Result<()> {
        let essence = declared
            .and_then(|m| m.split(';').next())
            .map(str::trim)
            .unwrap_or("");

        if essence.eq_ignore_ascii_case(&self.accepted_media_type) {
            Ok(())
        } else {
            Err(Error::UnsupportedMediaType(essence.to_string()))
        }
    }

    /// Check a byte count against the upload ceiling
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_upload_size {
            tracing::warn!("Rejected upload of {} bytes (limit {})", size, self.max_upload_size);
            return Err(Error::PayloadTooLarge {
                limit: self.max_upload_size,
            });
        }
        Ok(())
    }

    /// Ingest one uploaded file
    ///
    /// On success the raw document and its trimmed text are both stored under
    /// the returned identifier. If extraction fails the raw document is left
    /// in place but no text is written.
    pub async fn ingest(&self, upload: UploadedFile) -> Result<IngestOutcome> {
        if upload.filename.is_none() && upload.is_empty() {
            return Err(Error::MissingInput);
        }
        self.check_media_type(upload.media_type.as_deref())?;
        self.check_size(upload.len())?;

        let start = Instant::now();
        let guard = self.slot.begin_upload().await?;
        let store = self.slot.store();

        let id = DocumentId::generate(&self.ids.next_token(), upload.filename.as_deref());
        let stem = id
            .stem()
            .ok_or_else(|| Error::internal(format!("Generated identifier has no stem: {}", id)))?
            .to_string();

        store.put_document(&id, &upload.data).await?;

        let text = self
            .extractor
            .extract(upload.data.clone())
            .await
            .map_err(|e| {
                let message = match e {
                    Error::ExtractionFailed { message, .. } => message,
                    other => other.to_string(),
                };
                tracing::error!(
                    "Extraction of {} with {} failed: {}",
                    id,
                    self.extractor.name(),
                    message
                );
                Error::extraction(id.as_str(), message)
            })?;

        let text = text.trim();
        store.put_text(&stem, text).await?;

        let outcome = IngestOutcome {
            content_hash: hash_content(&upload.data),
            text_chars: text.chars().count(),
            size_bytes: upload.len(),
            id,
        };

        tracing::info!(
            "Ingested {} ({} bytes, {} chars, sha256 {}...) in {:.1}s, replacing {} documents",
            outcome.id,
            outcome.size_bytes,
            outcome.text_chars,
            &outcome.content_hash[..12],
            start.elapsed().as_secs_f64(),
            guard.cleared.documents
        );
        drop(guard);

        Ok(outcome)
    }
}

/// Hash raw document bytes
fn hash_content(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::identifier::SequentialIds;
    use crate::providers::{DocumentStoreProvider, InMemoryDocumentStore, LocalDocumentStore};
    use async_trait::async_trait;
    use bytes::Bytes;

    /// Treats the document bytes as UTF-8 text
    struct Utf8Extractor;

    #[async_trait]
    impl TextExtractor for Utf8Extractor {
        async fn extract(&self, data: Bytes) -> Result<String> {
            String::from_utf8(data.to_vec()).map_err(|e| Error::extraction("doc", e.to_string()))
        }

        fn name(&self) -> &str {
            "utf8"
        }
    }

    fn pipeline(store: Arc<InMemoryDocumentStore>, max_upload_size: usize) -> IngestPipeline {
        let config = StorageConfig {
            max_upload_size,
            ..StorageConfig::default()
        };
        IngestPipeline::new(
            Arc::new(UploadSlot::new(store)),
            Arc::new(Utf8Extractor),
            Arc::new(SequentialIds::starting_at(1000)),
            &config,
        )
    }

    fn pdf(name: &str, data: &'static [u8]) -> UploadedFile {
        UploadedFile::new(name, "application/pdf", Bytes::from_static(data))
    }

    #[tokio::test]
    async fn test_ingest_stores_document_and_trimmed_text() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 1024);

        let outcome = pipeline.ingest(pdf("report.pdf", b"  Hello world.\n\n")).await.unwrap();

        assert_eq!(outcome.id.as_str(), "1000.pdf");
        assert_eq!(outcome.text_chars, 12);
        assert_eq!(outcome.content_hash.len(), 64);
        assert!(store.contains_document(&outcome.id));
        assert_eq!(store.get_text("1000").await.unwrap().as_deref(), Some("Hello world."));
    }

    #[tokio::test]
    async fn test_second_ingest_replaces_first() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 1024);

        let first = pipeline.ingest(pdf("a.pdf", b"first")).await.unwrap();
        let second = pipeline.ingest(pdf("b.pdf", b"second")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(!store.contains_document(&first.id));
        assert_eq!(store.get_text("1000").await.unwrap(), None);
        assert_eq!(store.get_text("1001").await.unwrap().as_deref(), Some("second"));
        assert_eq!((store.document_count(), store.text_count()), (1, 1));
    }

    #[tokio::test]
    async fn test_wrong_media_type_rejected_before_write() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 1024);
        pipeline.ingest(pdf("keep.pdf", b"kept")).await.unwrap();

        let upload = UploadedFile::new("notes.txt", "text/plain", Bytes::from_static(b"hi"));
        let err = pipeline.ingest(upload).await.unwrap_err();

        assert!(matches!(err, Error::UnsupportedMediaType(ref m) if m == "text/plain"));
        // Nothing written, nothing purged
        assert_eq!((store.document_count(), store.text_count()), (1, 1));
    }

    #[tokio::test]
    async fn test_media_type_parameters_ignored() {
        let pipeline = pipeline(Arc::new(InMemoryDocumentStore::new()), 1024);
        assert!(pipeline.check_media_type(Some("Application/PDF; name=x")).is_ok());
        assert!(pipeline.check_media_type(None).is_err());
    }

    #[tokio::test]
    async fn test_size_boundary() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 8);

        assert!(pipeline.ingest(pdf("exact.pdf", b"12345678")).await.is_ok());

        let err = pipeline.ingest(pdf("over.pdf", b"123456789")).await.unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { limit: 8 }));
        assert_eq!(store.document_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let pipeline = pipeline(Arc::new(InMemoryDocumentStore::new()), 1024);
        let upload = UploadedFile {
            filename: None,
            media_type: Some("application/pdf".into()),
            data: Bytes::new(),
        };
        assert!(matches!(pipeline.ingest(upload).await, Err(Error::MissingInput)));
    }

    #[tokio::test]
    async fn test_extraction_failure_keeps_document_without_text() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 1024);

        let err = pipeline.ingest(pdf("bad.pdf", b"\xff\xfe\xfd")).await.unwrap_err();

        match err {
            Error::ExtractionFailed { id, .. } => assert_eq!(id, "1000.pdf"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.contains_document(&DocumentId::from_client("1000.pdf")));
        assert_eq!(store.text_count(), 0);
    }

    #[tokio::test]
    async fn test_purge_failure_stops_ingest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let uploads = tmp.path().join("uploads");
        let parsed = tmp.path().join("parsed");
        let store = LocalDocumentStore::new(&uploads, &parsed).unwrap();
        std::fs::remove_dir_all(&uploads).unwrap();

        let config = StorageConfig::default();
        let pipeline = IngestPipeline::new(
            Arc::new(UploadSlot::new(Arc::new(store))),
            Arc::new(Utf8Extractor),
            Arc::new(SequentialIds::starting_at(1000)),
            &config,
        );

        let err = pipeline.ingest(pdf("doc.pdf", b"text")).await.unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(!uploads.exists());
        assert_eq!(std::fs::read_dir(&parsed).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_stored() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = pipeline(store.clone(), 1024);

        let outcome = pipeline.ingest(pdf("blank.pdf", b"   \n ")).await.unwrap();
        assert_eq!(outcome.text_chars, 0);
        assert_eq!(store.get_text("1000").await.unwrap().as_deref(), Some(""));
    }
}
