//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background Tasks
//!
//! Network work never runs on the UI thread. Effects returned by `update()`
//! spawn tokio tasks that report back through an `mpsc` channel of `Action`s:
//!
//! ```text
//! Effect::SpawnFetch(ticket)  → spawn_fetch   → Action::FetchCompleted
//! Effect::SpawnSubmit(sub)    → spawn_submit  → Action::SubmitCompleted
//! (startup)                   → spawn_socket  → SocketConnected / ServerResync* / SocketClosed
//! ```
//!
//! ## Redraw Strategy
//!
//! The loop only redraws after an input event or a background action. While a
//! request is outstanding it polls more often so results show up promptly.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

pub mod component;
pub mod components;
pub mod event;
mod ui;

pub use ui::draw_ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{FeedClient, HttpFeedClient, ServerEvent, socket};
use crate::core::action::{Action, Effect, update};
use crate::core::composer::Submission;
use crate::core::config::ResolvedConfig;
use crate::core::feed::FetchTicket;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBoxState, InputEditor, InputEvent, ListEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const BUSY_POLL: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys, `e` edits the selection. Typing switches to Input.
    Browse,
    /// Text editing in the composer. Esc switches to Browse.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBoxState,
    pub input_mode: InputMode,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBoxState::new(),
            input_mode: InputMode::Input, // User expects to type immediately
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol makes Shift+Enter distinguishable from Enter.
        // Terminals that don't support it ignore the escape sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the REST client from a resolved config.
pub fn build_client(config: &ResolvedConfig) -> std::io::Result<Arc<dyn FeedClient>> {
    let token = config.token.as_deref().unwrap_or_default();
    let client = HttpFeedClient::new(config.base_url.clone(), token)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    Ok(Arc::new(client))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = build_client(&config)?;
    let mut app = App::from_config(client, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let socket_task = spawn_socket(
        config.socket_url.clone(),
        config.token.clone().unwrap_or_default(),
        tx.clone(),
    );

    let mut should_quit = dispatch(&mut app, Action::FetchAll, &tx);
    let mut needs_redraw = true;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.feed.is_loading() || app.submitting {
            BUSY_POLL
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &tx) {
                should_quit = true;
                break;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx) {
                should_quit = true;
            }
        }
    }

    socket_task.abort();
    ratatui::restore();
    Ok(())
}

/// Run one action through the reducer and start whatever I/O it asks for.
/// Returns `true` when the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnFetch(ticket) => {
            spawn_fetch(app.client.clone(), ticket, tx.clone());
            false
        }
        Effect::SpawnSubmit(submission) => {
            spawn_submit(app.client.clone(), submission, tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

/// Route one terminal event. Returns `true` when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, Action::Quit, tx),
        TuiEvent::Refresh => return dispatch(app, Action::FetchAll, tx),
        TuiEvent::CancelEdit => return dispatch(app, Action::CancelEdit, tx),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::JumpToLatest => {
            if let Some(ListEvent::Scrolled(offset)) = tui.message_list.handle_event(&event) {
                return dispatch(app, Action::Scrolled(offset), tx);
            }
            return false;
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Input => {
            let mut editor = InputEditor::new(&mut app.composer, &mut tui.input_box);
            match editor.handle_event(&event) {
                Some(InputEvent::Submit) => dispatch(app, Action::Submit, tx),
                Some(InputEvent::Blur) => {
                    tui.input_mode = InputMode::Browse;
                    tui.message_list.select_previous(app.feed.messages().len());
                    report_scroll(app, tui, tx)
                }
                Some(InputEvent::ContentChanged) | None => false,
            }
        }
        InputMode::Browse => match event {
            TuiEvent::CursorUp => {
                tui.message_list.select_previous(app.feed.messages().len());
                report_scroll(app, tui, tx)
            }
            TuiEvent::CursorDown => {
                tui.message_list.select_next(app.feed.messages().len());
                report_scroll(app, tui, tx)
            }
            TuiEvent::CursorEnd => {
                tui.message_list.jump_to_latest();
                report_scroll(app, tui, tx)
            }
            TuiEvent::InputChar('e') => begin_edit_selected(app, tui, tx),
            TuiEvent::Submit => {
                focus_input(tui);
                false
            }
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::NewLine | TuiEvent::Tab => {
                focus_input(tui);
                InputEditor::new(&mut app.composer, &mut tui.input_box).handle_event(&event);
                false
            }
            _ => false,
        },
    }
}

fn focus_input(tui: &mut TuiState) {
    tui.input_mode = InputMode::Input;
    tui.message_list.selected_index = None;
}

fn report_scroll(app: &mut App, tui: &TuiState, tx: &mpsc::Sender<Action>) -> bool {
    let offset = tui.message_list.offset_from_bottom();
    dispatch(app, Action::Scrolled(offset), tx)
}

/// Load the selected message into the composer, if it is ours to edit.
fn begin_edit_selected(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    let Some(id) = tui
        .message_list
        .selected_index
        .and_then(|idx| app.feed.messages().get(idx))
        .map(|message| message.id.clone())
    else {
        return false;
    };

    let quit = dispatch(app, Action::BeginEdit(id.clone()), tx);
    if app.composer.edit_target() == Some(&id) {
        focus_input(tui);
        tui.input_box.move_to_end(&app.composer);
    }
    quit
}

fn spawn_fetch(client: Arc<dyn FeedClient>, ticket: FetchTicket, tx: mpsc::Sender<Action>) {
    debug!("Spawning fetch {:?}", ticket);
    tokio::spawn(async move {
        let result = client.fetch_all().await;
        if tx.send(Action::FetchCompleted { ticket, result }).is_err() {
            warn!("Failed to deliver fetch {:?}: receiver dropped", ticket);
        }
    });
}

fn spawn_submit(client: Arc<dyn FeedClient>, submission: Submission, tx: mpsc::Sender<Action>) {
    info!("Spawning submit: {:?}", submission);
    tokio::spawn(async move {
        let result = match &submission {
            Submission::Create { text } => client.create(text).await,
            Submission::Edit { id, text } => client.edit_text(id, text).await,
        };
        if tx.send(Action::SubmitCompleted(result)).is_err() {
            warn!("Failed to deliver submit result: receiver dropped");
        }
    });
}

/// Listen on the duplex channel for the life of the session.
fn spawn_socket(
    url: String,
    token: String,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = match socket::connect(&url, &token).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Live updates unavailable: {}", e);
                let _ = tx.send(Action::SocketClosed(crate::api::SocketEnd::Failed(e.to_string())));
                return;
            }
        };
        if tx.send(Action::SocketConnected).is_err() {
            return;
        }

        let events_tx = tx.clone();
        let end = socket::pump(&mut stream, move |event| match event {
            ServerEvent::ResendMessages => events_tx.send(Action::ServerResync).is_ok(),
            ServerEvent::Other(_) => true,
        })
        .await;

        info!("Socket listener finished: {:?}", end);
        let _ = tx.send(Action::SocketClosed(end));
    })
}
