//! Query pipeline: resolve stored text, compose prompt, call the completion service

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::UploadSlot;
use crate::providers::CompletionProvider;
use crate::types::{QueryAnswer, QueryRequest};

use super::prompt::PromptBuilder;

/// Answers questions about the document currently in the slot
pub struct QueryPipeline {
    slot: Arc<UploadSlot>,
    completer: Arc<dyn CompletionProvider>,
    prompt: PromptBuilder,
}

impl QueryPipeline {
    pub fn new(
        slot: Arc<UploadSlot>,
        completer: Arc<dyn CompletionProvider>,
        prompt: PromptBuilder,
    ) -> Self {
        Self {
            slot,
            completer,
            prompt,
        }
    }

    /// Load the extracted text for the request's identifier
    async fn load_text(&self, request: &QueryRequest) -> Result<String> {
        let id = request.document_id();
        let stem = id
            .stem()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;

        let _read = self.slot.read().await;
        self.slot
            .store()
            .get_text(stem)
            .await?
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    /// Answer a question about a stored document
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer> {
        request.validate()?;
        let start = Instant::now();

        let text = self.load_text(request).await?;
        let messages = self.prompt.build_messages(&text, &request.query);

        tracing::info!(
            "Query on {}: {} of {} chars sent to {} ({})",
            request.filename,
            self.prompt.excerpt(&text).chars().count(),
            text.chars().count(),
            self.completer.name(),
            self.completer.model()
        );

        let response = self.completer.complete(&messages).await.map_err(|e| match e {
            Error::CompletionFailed(_) => e,
            other => Error::completion(other.to_string()),
        })?;

        tracing::info!("Query completed in {}ms", start.elapsed().as_millis());

        Ok(QueryAnswer {
            query: request.query.clone(),
            response,
        })
    }
}
