//! # Backend I/O
//!
//! Everything that touches the network: the REST client and the websocket
//! listener. Core state never calls into this module; the TUI event loop
//! spawns tasks that do and reports results back as actions.

pub mod client;
pub mod socket;
pub mod types;

pub use client::{FeedClient, FeedError, HttpFeedClient};
pub use socket::{SocketEnd, SocketError, SocketStream};
pub use types::{Message, MessageId, ServerEvent};
