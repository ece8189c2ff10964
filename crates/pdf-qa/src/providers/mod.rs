//! Provider abstractions for storage, text extraction, and completion
//!
//! The pipelines only see these traits, so the filesystem, the PDF parser and
//! the language model can each be swapped for a test double.

pub mod document_store;
pub mod extractor;
pub mod llm;
pub mod local;
pub mod memory;
pub mod openai;

pub use document_store::{ClearStats, DocumentStoreProvider};
pub use extractor::TextExtractor;
pub use llm::{ChatMessage, ChatRole, CompletionProvider};
pub use local::LocalDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use openai::OpenAiClient;
