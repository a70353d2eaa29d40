//! # Actions
//!
//! Everything that can happen in roomchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Server says "resend"? That's `Action::ServerResync`.
//! A fetch comes back? That's `Action::FetchCompleted { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the caller must start.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::api::{FeedError, Message, MessageId, SocketEnd};
use crate::core::composer::{ComposeError, Submission};
use crate::core::feed::{FetchOutcome, FetchTicket};
use crate::core::state::App;
use crate::core::store::Upserted;

#[derive(Debug)]
pub enum Action {
    /// Session start or manual refresh: fetch everything.
    FetchAll,
    /// `resend_messages` arrived on the duplex channel.
    ServerResync,
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<Message>, FeedError>,
    },
    /// Send the composer buffer (create or edit).
    Submit,
    SubmitCompleted(Result<Message, FeedError>),
    BeginEdit(MessageId),
    CancelEdit,
    /// The message list scrolled; offset measured from the newest message.
    Scrolled(i64),
    SocketConnected,
    SocketClosed(SocketEnd),
    Quit,
}

/// I/O the event loop must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SpawnFetch(FetchTicket),
    SpawnSubmit(Submission),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::FetchAll | Action::ServerResync => {
            let ticket = app.feed.begin_fetch();
            app.status_message = "Loading messages...".to_string();
            Effect::SpawnFetch(ticket)
        }
        Action::FetchCompleted { ticket, result } => {
            let failure = result.as_ref().err().map(|e| e.to_string());
            match app.feed.finish_fetch(ticket, result) {
                FetchOutcome::Applied(count) => {
                    app.status_message = format!("{count} messages");
                }
                FetchOutcome::Stale => {}
                FetchOutcome::Failed => {
                    app.status_message = format!(
                        "Sync failed: {}",
                        failure.unwrap_or_else(|| "unknown error".to_string())
                    );
                }
            }
            Effect::None
        }
        Action::Submit => {
            if app.submitting {
                debug!("Submit ignored: request already in flight");
                return Effect::None;
            }
            match app.composer.submission() {
                Ok(submission) => {
                    app.submitting = true;
                    app.status_message = "Sending...".to_string();
                    Effect::SpawnSubmit(submission)
                }
                Err(ComposeError::Blank) => {
                    debug!("Submit rejected: blank buffer");
                    Effect::None
                }
            }
        }
        Action::SubmitCompleted(result) => {
            app.submitting = false;
            match result {
                Ok(message) => {
                    app.status_message = match app.feed.apply_mutation(message) {
                        Upserted::Appended => "Sent".to_string(),
                        Upserted::Updated => "Edited".to_string(),
                    };
                    app.composer.submitted();
                }
                Err(e) => {
                    warn!("Submit failed: {}", e);
                    app.status_message = format!("Send failed: {e}");
                }
            }
            Effect::None
        }
        Action::BeginEdit(id) => {
            if app.submitting {
                return Effect::None;
            }
            let Some(text) = app.feed.store().get(&id).map(|m| m.text.clone()) else {
                return Effect::None;
            };
            if !app.can_edit(&id) {
                app.status_message = "You can only edit your own messages".to_string();
                return Effect::None;
            }
            app.composer.begin_edit(id, &text);
            app.status_message = "Editing message (Ctrl+X to cancel)".to_string();
            Effect::None
        }
        Action::CancelEdit => {
            if app.composer.is_editing() {
                app.composer.cancel_edit();
                app.status_message = "Edit cancelled".to_string();
            }
            Effect::None
        }
        Action::Scrolled(offset) => {
            app.scroll.on_scroll(offset);
            Effect::None
        }
        Action::SocketConnected => {
            app.socket_connected = true;
            Effect::None
        }
        Action::SocketClosed(end) => {
            app.socket_connected = false;
            app.status_message = match end {
                SocketEnd::Failed(reason) => format!("Live updates lost: {reason}"),
                _ => "Live updates disconnected".to_string(),
            };
            Effect::None
        }
        Action::Quit => {
            info!("Quitting: discarding feed");
            app.feed.discard();
            app.composer.cancel_edit();
            Effect::Quit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{message, test_app};

    fn fetch_ticket(app: &mut App, action: Action) -> FetchTicket {
        match update(app, action) {
            Effect::SpawnFetch(ticket) => ticket,
            other => panic!("expected SpawnFetch, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_all_spawns_fetch_and_sets_loading() {
        let mut app = test_app();
        fetch_ticket(&mut app, Action::FetchAll);
        assert!(app.feed.is_loading());
    }

    #[test]
    fn test_server_resync_refetches_everything() {
        let mut app = test_app();
        let first = fetch_ticket(&mut app, Action::FetchAll);
        update(
            &mut app,
            Action::FetchCompleted {
                ticket: first,
                result: Ok(vec![message("a", "me", "1")]),
            },
        );

        let second = fetch_ticket(&mut app, Action::ServerResync);
        assert!(second > first);
        update(
            &mut app,
            Action::FetchCompleted {
                ticket: second,
                result: Ok(vec![message("b", "bob", "2"), message("c", "bob", "3")]),
            },
        );
        let ids: Vec<&str> = app.feed.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(app.status_message, "2 messages");
        assert!(!app.feed.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_feed_and_reports() {
        let mut app = test_app();
        app.feed.apply_mutation(message("a", "me", "1"));
        let ticket = fetch_ticket(&mut app, Action::ServerResync);
        update(
            &mut app,
            Action::FetchCompleted {
                ticket,
                result: Err(FeedError::Network("refused".into())),
            },
        );
        assert_eq!(app.feed.messages().len(), 1);
        assert!(!app.feed.is_loading());
        assert!(app.status_message.starts_with("Sync failed"));
    }

    #[test]
    fn test_superseded_failure_keeps_status() {
        let mut app = test_app();
        let slow = fetch_ticket(&mut app, Action::FetchAll);
        let fast = fetch_ticket(&mut app, Action::ServerResync);
        update(
            &mut app,
            Action::FetchCompleted {
                ticket: fast,
                result: Ok(vec![message("a", "me", "1")]),
            },
        );
        update(
            &mut app,
            Action::FetchCompleted {
                ticket: slow,
                result: Err(FeedError::Network("x".into())),
            },
        );
        assert_eq!(app.status_message, "1 messages");
        assert!(!app.feed.is_loading());
    }

    #[test]
    fn test_blank_submit_issues_no_request() {
        let mut app = test_app();
        app.composer.set_text("  \t\n ");
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
        assert!(!app.submitting);
    }

    #[test]
    fn test_submit_without_edit_target_creates() {
        let mut app = test_app();
        app.composer.set_text("hello");
        assert_eq!(
            update(&mut app, Action::Submit),
            Effect::SpawnSubmit(Submission::Create {
                text: "hello".to_string()
            })
        );
        assert!(app.submitting);
    }

    #[test]
    fn test_submit_with_edit_target_edits_that_id() {
        let mut app = test_app();
        app.feed.apply_mutation(message("m-1", "me", "old"));
        update(&mut app, Action::BeginEdit("m-1".into()));
        app.composer.set_text("new");
        assert_eq!(
            update(&mut app, Action::Submit),
            Effect::SpawnSubmit(Submission::Edit {
                id: "m-1".into(),
                text: "new".to_string()
            })
        );
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let mut app = test_app();
        app.composer.set_text("hello");
        update(&mut app, Action::Submit);
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
    }

    #[test]
    fn test_submit_success_appends_and_clears_composer() {
        let mut app = test_app();
        app.composer.set_text("hello");
        update(&mut app, Action::Submit);
        update(
            &mut app,
            Action::SubmitCompleted(Ok(message("new", "me", "hello"))),
        );
        assert_eq!(app.feed.messages().len(), 1);
        assert!(app.composer.buffer().is_empty());
        assert!(!app.submitting);
        assert_eq!(app.status_message, "Sent");
    }

    #[test]
    fn test_edit_success_updates_in_place_and_clears_target() {
        let mut app = test_app();
        app.feed.apply_mutation(message("a", "me", "one"));
        app.feed.apply_mutation(message("b", "me", "two"));
        update(&mut app, Action::BeginEdit("a".into()));
        app.composer.set_text("uno");
        update(&mut app, Action::Submit);
        update(&mut app, Action::SubmitCompleted(Ok(message("a", "me", "uno"))));

        assert_eq!(app.feed.messages()[0].text, "uno");
        assert_eq!(app.feed.messages().len(), 2);
        assert!(!app.composer.is_editing());
        assert_eq!(app.status_message, "Edited");
    }

    #[test]
    fn test_submit_failure_keeps_buffer() {
        let mut app = test_app();
        app.composer.set_text("hello");
        update(&mut app, Action::Submit);
        update(
            &mut app,
            Action::SubmitCompleted(Err(FeedError::Api {
                status: 500,
                message: "oops".into(),
            })),
        );
        assert_eq!(app.composer.buffer(), "hello");
        assert!(app.feed.messages().is_empty());
        assert!(!app.submitting);
    }

    #[test]
    fn test_begin_edit_refuses_foreign_message() {
        let mut app = test_app();
        app.feed.apply_mutation(message("x", "bob", "not yours"));
        update(&mut app, Action::BeginEdit("x".into()));
        assert!(!app.composer.is_editing());
        assert!(app.composer.buffer().is_empty());
    }

    #[test]
    fn test_cancel_edit_clears_buffer() {
        let mut app = test_app();
        app.feed.apply_mutation(message("a", "me", "text"));
        update(&mut app, Action::BeginEdit("a".into()));
        update(&mut app, Action::CancelEdit);
        assert!(!app.composer.is_editing());
        assert!(app.composer.buffer().is_empty());
    }

    #[test]
    fn test_scrolled_updates_jump_signal() {
        let mut app = test_app();
        update(&mut app, Action::Scrolled(-2001));
        assert!(app.scroll.show_jump_to_latest());
        update(&mut app, Action::Scrolled(-2000));
        assert!(!app.scroll.show_jump_to_latest());
    }

    #[test]
    fn test_socket_lifecycle() {
        let mut app = test_app();
        update(&mut app, Action::SocketConnected);
        assert!(app.socket_connected);
        update(&mut app, Action::SocketClosed(SocketEnd::Closed));
        assert!(!app.socket_connected);
        assert_eq!(app.status_message, "Live updates disconnected");
    }

    #[test]
    fn test_quit_discards_feed() {
        let mut app = test_app();
        app.feed.apply_mutation(message("a", "me", "1"));
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
        assert!(app.feed.messages().is_empty());
    }
}
