//! Prompt construction for grounded answers

use crate::config::QueryConfig;
use crate::providers::ChatMessage;

/// Label placed before the excerpt in the grounding message
pub const EXCERPT_HEADER: &str = "PDF content:\n\n";

/// Return the first `max_chars` characters of `text`, or all of it when shorter
///
/// Characters are Unicode scalar values; the cut never splits one.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Prompt builder for document queries
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
    max_context_chars: usize,
}

impl PromptBuilder {
    pub fn new(system_prompt: impl Into<String>, max_context_chars: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_context_chars,
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.system_prompt.clone(), config.max_context_chars)
    }

    /// The excerpt that will be sent for `text`
    pub fn excerpt<'a>(&self, text: &'a str) -> &'a str {
        truncate_excerpt(text, self.max_context_chars)
    }

    /// Build the message sequence: instruction, grounding excerpt, question
    pub fn build_messages(&self, text: &str, question: &str) -> Vec<ChatMessage> {
        let excerpt = self.excerpt(text);
        vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(format!("{}{}", EXCERPT_HEADER, excerpt)),
            ChatMessage::user(question),
        ]
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&QueryConfig::default())
    }
}
