//! REST client for the chat backend.
//!
//! Every request carries the session's bearer token. The three endpoints map
//! one-to-one onto [`FeedClient`] methods:
//!
//! ```text
//! GET   {base}/messages            → Vec<Message>
//! POST  {base}/messages            {"text"} → Message
//! PATCH {base}/messages/{id}/text  {"text"} → Message
//! ```

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{Message, MessageId, TextBody};

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Client misconfigured (missing token, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Config(msg) => write!(f, "config error: {msg}"),
            FeedError::Network(msg) => write!(f, "network error: {msg}"),
            FeedError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FeedError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the full message set, in server order.
    async fn fetch_all(&self) -> Result<Vec<Message>, FeedError>;

    /// Create a new message and return the stored record.
    async fn create(&self, text: &str) -> Result<Message, FeedError>;

    /// Replace the text of an existing message and return the updated record.
    async fn edit_text(&self, id: &MessageId, text: &str) -> Result<Message, FeedError>;
}

/// `FeedClient` backed by reqwest.
pub struct HttpFeedClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpFeedClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, FeedError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(FeedError::Config("bearer token is empty".to_string()));
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FeedError::Config(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    /// `{base}/messages/{id}/text`, with the id percent-encoded as one path segment.
    fn edit_url(&self, id: &MessageId) -> Result<reqwest::Url, FeedError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| FeedError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::Config(format!("base URL has no path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["messages", id.as_str(), "text"]);
        Ok(url)
    }

    /// Send a prepared request and decode the JSON body, mapping failures to `FeedError`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FeedError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Backend response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error: {} - {}", status.as_u16(), err_body);
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_all(&self) -> Result<Vec<Message>, FeedError> {
        info!("GET {}", self.messages_url());
        let messages: Vec<Message> = self.send_json(self.client.get(self.messages_url())).await?;
        debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }

    async fn create(&self, text: &str) -> Result<Message, FeedError> {
        info!("POST {} ({} bytes)", self.messages_url(), text.len());
        let request = self
            .client
            .post(self.messages_url())
            .json(&TextBody { text });
        self.send_json(request).await
    }

    async fn edit_text(&self, id: &MessageId, text: &str) -> Result<Message, FeedError> {
        let url = self.edit_url(id)?;
        info!("PATCH {} ({} bytes)", url, text.len());
        let request = self.client.patch(url).json(&TextBody { text });
        self.send_json(request).await
    }
}
