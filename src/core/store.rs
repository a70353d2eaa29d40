//! # Message Store
//!
//! Ordered mapping from message id to message record. Order is whatever the
//! server returned; the store never sorts. Ids are unique within the store.

use std::collections::HashMap;

use log::warn;

use crate::api::{Message, MessageId};

/// Result of [`MessageStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// Unknown id, pushed to the end.
    Appended,
    /// Known id, replaced in place.
    Updated,
}

#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    index: HashMap<MessageId, usize>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full resync: drop everything and take the server's list as-is.
    ///
    /// A repeated id keeps its first occurrence.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages.clear();
        self.index.clear();
        self.messages.reserve(messages.len());

        for message in messages {
            if self.index.contains_key(&message.id) {
                warn!("Server returned duplicate message id {}, keeping first", message.id);
                continue;
            }
            self.index.insert(message.id.clone(), self.messages.len());
            self.messages.push(message);
        }
    }

    /// Append a new message or replace an existing one in place.
    pub fn upsert(&mut self, message: Message) -> Upserted {
        match self.index.get(&message.id) {
            Some(&pos) => {
                self.messages[pos] = message;
                Upserted::Updated
            }
            None => {
                self.index.insert(message.id.clone(), self.messages.len());
                self.messages.push(message);
                Upserted::Appended
            }
        }
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.index.get(id).map(|&pos| &self.messages[pos])
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.index.clear();
    }
}
