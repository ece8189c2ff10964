//! Application state for the HTTP server

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::Result;
use crate::generation::{PromptBuilder, QueryPipeline};
use crate::ingestion::{generator_for, IdGenerator, IngestPipeline, PdfExtractor, UploadSlot};
use crate::providers::{
    CompletionProvider, DocumentStoreProvider, LocalDocumentStore, OpenAiClient, TextExtractor,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Document and text storage
    store: Arc<dyn DocumentStoreProvider>,
    /// Upload side
    ingest: IngestPipeline,
    /// Query side
    query: QueryPipeline,
}

impl AppState {
    /// Create state with the production providers: filesystem, pdf-extract, OpenAI
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(LocalDocumentStore::new(
            &config.storage.upload_dir,
            &config.storage.text_dir,
        )?);
        tracing::info!(
            "Document store initialized (uploads: {}, text: {})",
            store.upload_dir().display(),
            store.text_dir().display()
        );

        let extractor = Arc::new(PdfExtractor::new(Duration::from_secs(
            config.storage.extraction_timeout_secs,
        )));
        let completer = Arc::new(OpenAiClient::new(&config.llm)?);
        tracing::info!("Completion client initialized (model: {})", config.llm.model);

        let ids = generator_for(config.storage.id_strategy);

        Ok(Self::from_parts(config, store, extractor, completer, ids))
    }

    /// Assemble state from explicit providers
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn DocumentStoreProvider>,
        extractor: Arc<dyn TextExtractor>,
        completer: Arc<dyn CompletionProvider>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let slot = Arc::new(UploadSlot::new(Arc::clone(&store)));
        let ingest = IngestPipeline::new(Arc::clone(&slot), extractor, ids, &config.storage);
        let query = QueryPipeline::new(slot, completer, PromptBuilder::from_config(&config.query));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                ingest,
                query,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn ingest_pipeline(&self) -> &IngestPipeline {
        &self.inner.ingest
    }

    /// Get the query pipeline
    pub fn query_pipeline(&self) -> &QueryPipeline {
        &self.inner.query
    }

    /// Check if the storage areas are reachable
    pub async fn is_ready(&self) -> bool {
        match self.inner.store.health_check().await {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}
