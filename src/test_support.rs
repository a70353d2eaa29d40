//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{FeedClient, FeedError, Message, MessageId};
use crate::core::scroll::DEFAULT_JUMP_THRESHOLD;

/// A no-op client for tests that don't need real API calls.
pub struct NoopClient;

#[async_trait]
impl FeedClient for NoopClient {
    async fn fetch_all(&self) -> Result<Vec<Message>, FeedError> {
        Ok(Vec::new())
    }

    async fn create(&self, text: &str) -> Result<Message, FeedError> {
        Ok(message("noop", "me", text))
    }

    async fn edit_text(&self, id: &MessageId, text: &str) -> Result<Message, FeedError> {
        Ok(message(id.as_str(), "me", text))
    }
}

/// Builds a message with a fixed timestamp.
pub fn message(id: &str, author: &str, text: &str) -> Message {
    Message {
        id: MessageId::from(id),
        author_id: author.to_string(),
        username: None,
        text: text.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap(),
    }
}

/// Creates a test App with a NoopClient, logged in as `me`.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(NoopClient),
        Some("me".to_string()),
        DEFAULT_JUMP_THRESHOLD,
    )
}
