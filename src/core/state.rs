//! # Application State
//!
//! Core business state for roomchat. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── client: Arc<dyn FeedClient>   // REST backend
//! ├── feed: FeedState               // message store + loading + fetch tickets
//! ├── composer: Composer            // pending text + edit target
//! ├── scroll: ScrollMonitor         // jump-to-latest signal
//! ├── user_id: Option<String>       // who "own" messages belong to
//! ├── status_message: String        // status bar text
//! ├── submitting: bool              // create/edit request in flight
//! └── socket_connected: bool        // duplex channel alive
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::api::{FeedClient, Message, MessageId};
use crate::core::composer::Composer;
use crate::core::config::ResolvedConfig;
use crate::core::feed::FeedState;
use crate::core::scroll::ScrollMonitor;

pub struct App {
    pub client: Arc<dyn FeedClient>,
    pub feed: FeedState,
    pub composer: Composer,
    pub scroll: ScrollMonitor,
    pub user_id: Option<String>,
    pub status_message: String,
    /// True between `Submit` and `SubmitCompleted`.
    pub submitting: bool,
    pub socket_connected: bool,
}

impl App {
    pub fn new(client: Arc<dyn FeedClient>, user_id: Option<String>, jump_threshold: u32) -> Self {
        Self {
            client,
            feed: FeedState::new(),
            composer: Composer::new(),
            scroll: ScrollMonitor::new(jump_threshold),
            user_id,
            status_message: String::from("Welcome to roomchat!"),
            submitting: false,
            socket_connected: false,
        }
    }

    pub fn from_config(client: Arc<dyn FeedClient>, config: &ResolvedConfig) -> Self {
        Self::new(client, config.user_id.clone(), config.jump_threshold)
    }

    /// Whether `message` was written by the configured user.
    pub fn is_own(&self, message: &Message) -> bool {
        self.user_id.as_deref() == Some(message.author_id.as_str())
    }

    /// Whether the user may edit the message with this id.
    pub fn can_edit(&self, id: &MessageId) -> bool {
        self.feed
            .store()
            .get(id)
            .is_some_and(|message| self.is_own(message))
    }
}
