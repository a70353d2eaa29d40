//! Wire types shared by the REST client and the websocket listener.
//!
//! Field names follow the chat backend's JSON (`_id`, `user_id`, `createdAt`),
//! renamed into Rust-side names with serde attributes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned message identifier. Opaque to the client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId(s.to_string())
    }
}

/// A single chat message as returned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    #[serde(rename = "user_id")]
    pub author_id: String,
    /// Display name, when the backend includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Name to show in the feed: the username if present, otherwise the author id.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.author_id)
    }
}

/// Body of `POST /messages` and `PATCH /messages/{id}/text`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextBody<'a> {
    pub text: &'a str,
}

/// Event names pushed by the server over the duplex channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// "Please refetch everything." Carries no payload.
    ResendMessages,
    /// Any event this client does not act on.
    Other(String),
}

/// JSON envelope of a websocket text frame: `{"event": "<name>", ...}`.
#[derive(Deserialize, Debug)]
struct EventEnvelope {
    event: String,
}

impl ServerEvent {
    pub const RESEND_MESSAGES: &'static str = "resend_messages";

    /// Parse a websocket text frame.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        let envelope: EventEnvelope = serde_json::from_str(frame)?;
        Ok(match envelope.event.as_str() {
            Self::RESEND_MESSAGES => ServerEvent::ResendMessages,
            _ => ServerEvent::Other(envelope.event),
        })
    }
}
