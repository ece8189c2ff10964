//! Answer generation: prompt assembly and the query pipeline

pub mod answer;
pub mod prompt;

pub use answer::QueryPipeline;
pub use prompt::{truncate_excerpt, PromptBuilder};
