//! Document ingestion: single-slot management, identifiers and PDF extraction

pub mod identifier;
mod parser;
mod processor;
pub mod slot;

pub use identifier::{generator_for, IdGenerator, SequentialIds, TimestampIds, UuidIds};
pub use parser::PdfExtractor;
pub use processor::IngestPipeline;
pub use slot::UploadSlot;
