//! # InputBox Component
//!
//! The composer's on-screen form: draws the pending text and turns key events
//! into composer edits.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Shift+Enter line breaks, Tab)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter when the send affordance is enabled
//! - Show whether a new message or an edit is being composed
//!
//! ## State Management
//!
//! The text and edit target live in the core `Composer`. This module only owns
//! presentation state (`InputBoxState`: cursor position and internal scroll).
//! `InputBox` borrows the composer immutably for rendering; `InputEditor`
//! borrows it mutably to apply edits.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::composer::Composer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, display_text, inner_width, next_char_boundary,
    normalize_newlines, prev_char_boundary, wrap_line_count, wrap_options,
};

/// Line break inserted by Shift+Enter.
pub const LINE_BREAK: &str = "\r\n";

/// High-level events emitted by the input editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter pressed with a sendable buffer
    Submit,
    /// Escape: leave the input box for browse mode
    Blur,
    /// Text or cursor changed
    ContentChanged,
}

/// Persistent presentation state for the input box.
pub struct InputBoxState {
    cursor: CursorState,
}

impl Default for InputBoxState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBoxState {
    pub fn new() -> Self {
        Self {
            cursor: CursorState::new(),
        }
    }

    /// Put the cursor after the last character (used when an edit is loaded).
    pub fn move_to_end(&mut self, composer: &Composer) {
        self.cursor.pos = composer.buffer().len();
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor.pos
    }
}

/// Calculate required height for the buffer, clamped to viewport limits.
/// Returns value in range [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
pub fn calculate_height(buffer: &str, content_width: u16) -> u16 {
    let width = inner_width(content_width);
    let content_lines = wrap_line_count(&display_text(buffer), width);
    content_lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
}

/// Transient renderer for the composer.
pub struct InputBox<'a> {
    pub composer: &'a Composer,
    pub state: &'a mut InputBoxState,
    /// Dimmed while browsing messages
    pub dimmed: bool,
    /// A create/edit request is in flight
    pub submitting: bool,
}

impl<'a> InputBox<'a> {
    pub fn new(composer: &'a Composer, state: &'a mut InputBoxState) -> Self {
        Self {
            composer,
            state,
            dimmed: false,
            submitting: false,
        }
    }

    fn title(&self) -> &'static str {
        if self.composer.is_editing() {
            "Editing message (Ctrl+X to cancel)"
        } else {
            "New message"
        }
    }

    fn send_label(&self) -> Line<'static> {
        if self.submitting {
            Line::styled(" Sending... ", Style::default().fg(Color::Yellow))
        } else if self.composer.can_send() {
            Line::styled(
                " Send ⏎ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Line::styled(" Send ⏎ ", Style::default().fg(Color::DarkGray))
        }
    }

    /// Visible slice of the wrapped display text.
    fn visible_text(&self, content_width: u16) -> String {
        let shown = display_text(self.composer.buffer());
        if self.state.cursor.scroll_offset == 0 {
            return shown;
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&shown, wrap_options(width));
        let start = (self.state.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());

        lines[start..end].join("\n")
    }

    /// Render scrollbar when content exceeds visible area
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let width = inner_width(area.width);
        let total_lines = wrap_line_count(&display_text(self.composer.buffer()), width);

        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.state.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl<'a> Component for InputBox<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let buffer = self.composer.buffer();
        self.state.cursor.clamp(buffer);
        self.state.cursor.last_content_width = area.width;
        self.state.cursor.update_scroll_offset(buffer, area.width);

        let text_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(self.title())
            .title_top(self.send_label().right_aligned());

        let input = Paragraph::new(self.visible_text(area.width))
            .block(block)
            .style(text_style);

        frame.render_widget(input, area);
        self.render_scrollbar(frame, area);

        if !self.dimmed {
            let (cursor_x, cursor_y) = self.state.cursor.screen_pos(buffer, area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

/// Applies key events to the composer.
pub struct InputEditor<'a> {
    pub composer: &'a mut Composer,
    pub state: &'a mut InputBoxState,
}

impl<'a> InputEditor<'a> {
    pub fn new(composer: &'a mut Composer, state: &'a mut InputBoxState) -> Self {
        Self { composer, state }
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        let pos = self.state.cursor.pos;
        self.composer.insert(pos, text);
        self.state.cursor.pos = pos + text.len();
        Some(InputEvent::ContentChanged)
    }

    /// Shift+Enter and Tab always add to the end of the buffer, wherever the cursor is.
    fn append(&mut self, text: &str) -> Option<InputEvent> {
        let end = self.composer.buffer().len();
        self.composer.insert(end, text);
        self.state.cursor.pos = end + text.len();
        Some(InputEvent::ContentChanged)
    }
}

impl<'a> EventHandler for InputEditor<'a> {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        self.state.cursor.clamp(self.composer.buffer());
        let pos = self.state.cursor.pos;
        let buffer = self.composer.buffer();

        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded))
            }
            TuiEvent::Paste(text) => self.insert(&normalize_newlines(text)),
            TuiEvent::NewLine => self.append(LINE_BREAK),
            TuiEvent::Tab => self.append("\t"),
            TuiEvent::Backspace => {
                if pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(buffer, pos);
                self.composer.remove(prev..pos);
                self.state.cursor.pos = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if pos >= buffer.len() {
                    return None;
                }
                let next = next_char_boundary(buffer, pos);
                self.composer.remove(pos..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => (pos > 0).then(|| {
                self.state.cursor.pos = prev_char_boundary(buffer, pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (pos < buffer.len()).then(|| {
                self.state.cursor.pos = next_char_boundary(buffer, pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = buffer[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
                (pos != line_start).then(|| {
                    self.state.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = buffer[pos..]
                    .find(['\r', '\n'])
                    .map(|i| pos + i)
                    .unwrap_or(buffer.len());
                (pos != line_end).then(|| {
                    self.state.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => {
                let width = self.state.cursor.last_content_width;
                self.state
                    .cursor
                    .move_vertically(buffer, -1, width)
                    .then_some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorDown => {
                let width = self.state.cursor.last_content_width;
                self.state
                    .cursor
                    .move_vertically(buffer, 1, width)
                    .then_some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => self.composer.can_send().then_some(InputEvent::Submit),
            TuiEvent::Escape => Some(InputEvent::Blur),
            _ => None,
        }
    }
}
