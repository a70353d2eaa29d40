use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::api;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
const TAB_STOP: &str = "    ";

/// A stateless component that renders a single feed message.
///
/// `Message` is a **transient component**: it's created fresh each frame with the data
/// it needs to render. Selection and ownership are decided by the parent `MessageList`.
///
/// # Styling
///
/// - **Own** messages (green) were written by the configured user and can be edited.
/// - **Others** (blue) are read-only.
/// - The message currently loaded into the composer gets a yellow border.
/// - The selected message in browse mode gets a cyan border.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height with
/// `textwrap` options matching Ratatui's `Paragraph` wrapping, so the parent list can
/// lay out the scroll view without rendering every message.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a api::Message,
    pub is_own: bool,
    pub is_selected: bool,
    /// Whether this message is the composer's edit target
    pub is_editing: bool,
}

impl<'a> Message<'a> {
    pub fn new(
        message: &'a api::Message,
        is_own: bool,
        is_selected: bool,
        is_editing: bool,
    ) -> Self {
        Self {
            message,
            is_own,
            is_selected,
            is_editing,
        }
    }

    /// Calculate the height required for a message given a width.
    pub fn calculate_height(message: &api::Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }

        let content = display_text(&message.text);
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(&content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> String {
        format!(
            "{} · {}",
            self.message.display_name(),
            self.message.created_at.format("%H:%M")
        )
    }
}

/// Text as it is drawn: CRLF line breaks normalised, tabs expanded, outer whitespace trimmed.
pub fn display_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', TAB_STOP)
        .trim()
        .to_string()
}

fn base_style(is_own: bool) -> Style {
    if is_own {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Blue)
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = base_style(self.is_own);

        let border_style = if self.is_editing {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(self.title())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(display_text(&self.message.text))
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
