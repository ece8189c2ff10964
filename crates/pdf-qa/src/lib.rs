//! pdf-qa: single-document question answering over uploaded PDFs
//!
//! One PDF is held at a time. Uploading replaces whatever was stored before,
//! the text is extracted once and kept next to the document, and questions are
//! answered by a chat-completion model that sees only the first part of that text.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use generation::QueryPipeline;
pub use ingestion::IngestPipeline;
pub use server::{build_router, state::AppState, PdfQaServer};
pub use types::{DocumentId, IngestOutcome, QueryAnswer, QueryRequest, UploadResponse, UploadedFile};
