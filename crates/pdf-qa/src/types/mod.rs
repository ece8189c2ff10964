//! Core types for the upload and query pipelines

pub mod document;
pub mod query;
pub mod response;

pub use document::{DocumentId, IngestOutcome, UploadedFile};
pub use query::{QueryAnswer, QueryRequest};
pub use response::UploadResponse;
