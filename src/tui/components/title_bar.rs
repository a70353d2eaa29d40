//! # TitleBar Component
//!
//! Top status bar showing connection state and notifications.
//!
//! ## Responsibilities
//!
//! - Display whether the live-update channel is up
//! - Display the latest status message ("Loading messages...", "Sent", errors)
//! - Show the "↓ Latest" control once the user has scrolled far from the newest message
//!
//! TitleBar is purely presentational: it receives all data as props and has no
//! internal state. Props come from different owners:
//! - `socket_connected`, `status_message`: core `App` state
//! - `show_jump`: the core `ScrollMonitor`, fed by the message list's scroll events
//!
//! ## Layout
//!
//! `"roomchat ● live | 42 messages | ↓ Latest (Ctrl+End)"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const JUMP_LABEL: &str = "↓ Latest (Ctrl+End)";

pub struct TitleBar {
    pub socket_connected: bool,
    pub status_message: String,
    /// Whether the jump-to-latest control is visible
    pub show_jump: bool,
}

impl TitleBar {
    pub fn new(socket_connected: bool, status_message: String, show_jump: bool) -> Self {
        Self {
            socket_connected,
            status_message,
            show_jump,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (dot, label, color) = if self.socket_connected {
            ("●", "live", Color::Green)
        } else {
            ("○", "offline", Color::DarkGray)
        };

        let mut spans = vec![
            Span::raw("roomchat "),
            Span::styled(format!("{dot} {label}"), Style::default().fg(color)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.show_jump {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(JUMP_LABEL, Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
