//! # Feed State
//!
//! The message store plus the bookkeeping for full resyncs.
//!
//! Fetches are never deduplicated: a resync that arrives while a fetch is in
//! flight issues a second fetch. Each fetch carries a [`FetchTicket`] and only
//! a response newer than the last applied one may replace the feed, so a slow
//! response can't overwrite a fresher one.
//!
//! ```text
//! begin_fetch() ──► ticket #n ──► (network) ──► finish_fetch(#n, result)
//!                                                 ├─ Ok, n > applied → Applied
//!                                                 ├─ n ≤ applied     → Stale
//!                                                 └─ Err             → Failed
//! ```

use log::{debug, error, info};

use crate::api::{FeedError, Message};
use crate::core::store::{MessageStore, Upserted};

/// Monotonic sequence number handed out per fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Feed replaced with this many messages.
    Applied(usize),
    /// A newer response already landed; this one (success or failure) was dropped.
    Stale,
    /// Request failed; feed left untouched.
    Failed,
}

#[derive(Debug, Default)]
pub struct FeedState {
    store: MessageStore,
    next_ticket: u64,
    last_applied: Option<FetchTicket>,
    in_flight: usize,
    /// Bumped whenever the visible message list changes.
    revision: u64,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn messages(&self) -> &[Message] {
        self.store.as_slice()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while at least one fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a fetch: returns its ticket and raises the loading flag.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        self.in_flight += 1;
        let ticket = FetchTicket(self.next_ticket);
        debug!("Fetch {:?} started ({} in flight)", ticket, self.in_flight);
        ticket
    }

    /// Settle a fetch started with [`begin_fetch`](Self::begin_fetch).
    ///
    /// The loading flag drops once no fetch is outstanding, whatever the outcome.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Message>, FeedError>,
    ) -> FetchOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.last_applied.is_some_and(|applied| ticket <= applied) {
            if let Err(e) = &result {
                error!("Stale fetch {:?} failed: {}", ticket, e);
            }
            info!(
                "Dropping stale fetch {:?} (already applied {:?})",
                ticket, self.last_applied
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(messages) => {
                let count = messages.len();
                self.store.replace_all(messages);
                self.last_applied = Some(ticket);
                self.revision += 1;
                info!("Fetch {:?} applied: {} messages", ticket, count);
                FetchOutcome::Applied(count)
            }
            Err(e) => {
                error!("Fetch {:?} failed: {}", ticket, e);
                FetchOutcome::Failed
            }
        }
    }

    /// Apply a server-confirmed create or edit.
    pub fn apply_mutation(&mut self, message: Message) -> Upserted {
        let id = message.id.clone();
        let outcome = self.store.upsert(message);
        self.revision += 1;
        debug!("Mutation applied to {}: {:?}", id, outcome);
        outcome
    }

    /// Logout / session end. Outstanding responses will be ignored as stale.
    pub fn discard(&mut self) {
        self.store.clear();
        self.revision += 1;
        self.last_applied = Some(FetchTicket(self.next_ticket));
        self.in_flight = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;

    fn api_error() -> FeedError {
        FeedError::Api {
            status: 500,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_new_feed_is_empty_and_idle() {
        let feed = FeedState::new();
        assert!(feed.messages().is_empty());
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_successful_fetch_replaces_exactly() {
        let mut feed = FeedState::new();
        let t1 = feed.begin_fetch();
        feed.finish_fetch(t1, Ok(vec![message("a", "u", "1"), message("b", "u", "2")]));

        let response = vec![message("c", "u", "3")];
        let t2 = feed.begin_fetch();
        assert!(feed.is_loading());
        let outcome = feed.finish_fetch(t2, Ok(response.clone()));

        assert_eq!(outcome, FetchOutcome::Applied(1));
        assert_eq!(feed.messages(), response.as_slice());
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_failed_fetch_leaves_feed_untouched() {
        let mut feed = FeedState::new();
        let t1 = feed.begin_fetch();
        feed.finish_fetch(t1, Ok(vec![message("a", "u", "1")]));
        let before = feed.messages().to_vec();

        let t2 = feed.begin_fetch();
        let outcome = feed.finish_fetch(t2, Err(api_error()));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(feed.messages(), before.as_slice());
        assert!(!feed.is_loading(), "loading must clear on failure");
    }

    #[test]
    fn test_older_response_resolving_last_is_dropped() {
        let mut feed = FeedState::new();
        let slow = feed.begin_fetch();
        let fast = feed.begin_fetch();

        feed.finish_fetch(fast, Ok(vec![message("new", "u", "fresh")]));
        assert!(feed.is_loading(), "slow fetch still outstanding");

        let outcome = feed.finish_fetch(slow, Ok(vec![message("old", "u", "stale")]));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(feed.messages()[0].id.as_str(), "new");
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_older_failure_after_newer_success_is_stale() {
        let mut feed = FeedState::new();
        let slow = feed.begin_fetch();
        let fast = feed.begin_fetch();

        feed.finish_fetch(fast, Ok(vec![message("new", "u", "fresh")]));
        let outcome = feed.finish_fetch(slow, Err(api_error()));

        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(feed.messages().len(), 1);
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_older_success_applies_when_newer_failed() {
        let mut feed = FeedState::new();
        let first = feed.begin_fetch();
        let second = feed.begin_fetch();

        feed.finish_fetch(second, Err(api_error()));
        let outcome = feed.finish_fetch(first, Ok(vec![message("a", "u", "1")]));

        assert_eq!(outcome, FetchOutcome::Applied(1));
        assert_eq!(feed.messages().len(), 1);
    }

    #[test]
    fn test_mutations_upsert() {
        let mut feed = FeedState::new();
        assert_eq!(feed.apply_mutation(message("a", "u", "hi")), Upserted::Appended);
        assert_eq!(feed.apply_mutation(message("a", "u", "hi!")), Upserted::Updated);
        assert_eq!(feed.messages().len(), 1);
        assert_eq!(feed.messages()[0].text, "hi!");
    }

    #[test]
    fn test_revision_moves_only_when_messages_change() {
        let mut feed = FeedState::new();
        let start = feed.revision();

        let t1 = feed.begin_fetch();
        feed.finish_fetch(t1, Err(api_error()));
        assert_eq!(feed.revision(), start);

        let t2 = feed.begin_fetch();
        feed.finish_fetch(t2, Ok(vec![message("a", "u", "1")]));
        let after_fetch = feed.revision();
        assert!(after_fetch > start);

        feed.apply_mutation(message("a", "u", "edited"));
        assert!(feed.revision() > after_fetch);
    }

    #[test]
    fn test_discard_ignores_outstanding_responses() {
        let mut feed = FeedState::new();
        let pending = feed.begin_fetch();
        feed.apply_mutation(message("a", "u", "1"));

        feed.discard();
        assert!(feed.messages().is_empty());
        assert!(!feed.is_loading());

        let outcome = feed.finish_fetch(pending, Ok(vec![message("b", "u", "2")]));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(feed.messages().is_empty());
    }
}
