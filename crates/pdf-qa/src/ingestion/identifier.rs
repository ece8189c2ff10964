//! Identifier token generation

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::IdStrategy;

/// Source of distinguishing tokens for document identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce the next token; tokens never repeat within a process
    fn next_token(&self) -> String;
}

/// Millisecond wall-clock tokens, bumped forward so they strictly increase
#[derive(Default)]
pub struct TimestampIds {
    last: Mutex<i64>,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_token(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last.lock();
        let token = if now > *last { now } else { *last + 1 };
        *last = token;
        token.to_string()
    }
}

/// Random v4 UUID tokens
#[derive(Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Counter tokens, deterministic for tests
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start counting from `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_token(&self) -> String {
        self.next.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

/// Build the generator selected in configuration
pub fn generator_for(strategy: IdStrategy) -> Arc<dyn IdGenerator> {
    match strategy {
        IdStrategy::Timestamp => Arc::new(TimestampIds::new()),
        IdStrategy::Uuid => Arc::new(UuidIds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_tokens_strictly_increase() {
        let ids = TimestampIds::new();
        let tokens: Vec<i64> = (0..100).map(|_| ids.next_token().parse().unwrap()).collect();
        assert!(tokens.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_sequential_tokens() {
        let ids = SequentialIds::starting_at(41);
        assert_eq!(ids.next_token(), "41");
        assert_eq!(ids.next_token(), "42");
    }

    #[test]
    fn test_uuid_tokens_have_no_dots() {
        let token = UuidIds.next_token();
        assert_eq!(token.len(), 32);
        assert!(!token.contains('.'));
    }
}
