//! # MessageList Component
//!
//! Scrollable view of the message feed.
//!
//! ## Responsibilities
//!
//! - Display messages in server order, with a divider whenever the day changes
//! - Show skeleton rows while a fetch is outstanding
//! - Show the empty-state text when the feed is empty and idle
//! - Keep the newest rows when the history is taller than the scroll canvas
//! - Manage scrolling, selection and layout caching (row heights)
//! - Report the scroll offset, measured from the newest message, on every scroll
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) plus the feed as props.
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use chrono::NaiveDate;
use log::debug;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::api::{self, MessageId};
use crate::core::scroll::offset_from_bottom;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Number of placeholder rows drawn while loading.
pub const SKELETON_ROWS: usize = 10;
/// Tallest canvas the scroll view can address (`u16` coordinates).
const CANVAS_ROWS: u32 = u16::MAX as u32;
pub const EMPTY_FEED_TEXT: &str = "Actually there aren't any messages for now ¯\\_(ツ)_/¯";

/// Events emitted by the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// The viewport moved; offset from the newest message (0 or negative).
    Scrolled(i64),
}

/// One vertical slot in the scroll canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Stands in for this many oldest messages that don't fit on the canvas.
    OlderHidden(usize),
    Divider(NaiveDate),
    Message(usize),
    Skeleton(usize),
}

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Selected message (index into the feed) in browse mode
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Current offset relative to the newest message: 0 at the bottom, negative above it.
    pub fn offset_from_bottom(&self) -> i64 {
        let max_y = self.max_offset();
        let y = self.scroll_state.offset().y.min(max_y);
        offset_from_bottom(y, max_y)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll to the newest message and stay there.
    pub fn jump_to_latest(&mut self) {
        self.stick_to_bottom = true;
        self.selected_index = None;
        let max_y = self.max_offset();
        self.scroll_state.set_offset(Position { x: 0, y: max_y });
    }

    /// Move the selection one message up, starting from the newest.
    pub fn select_previous(&mut self, message_count: usize) {
        if message_count == 0 {
            return;
        }
        let oldest_shown = self.layout.first_message().unwrap_or(0);
        self.selected_index = Some(match self.selected_index {
            Some(idx) => idx.saturating_sub(1).max(oldest_shown),
            None => message_count - 1,
        });
        self.scroll_to_selected();
    }

    /// Move the selection one message down. Past the newest clears the selection.
    pub fn select_next(&mut self, message_count: usize) {
        match self.selected_index {
            Some(idx) if idx + 1 < message_count => {
                self.selected_index = Some(idx + 1);
                self.scroll_to_selected();
            }
            Some(_) => self.jump_to_latest(),
            None => {}
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(row) = self
            .selected_index
            .and_then(|idx| self.layout.row_of_message(idx))
        else {
            return;
        };

        let item_top = if row == 0 {
            0
        } else {
            self.layout.prefix_heights[row - 1]
        };
        let item_bottom = self.layout.prefix_heights[row];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }
}

/// Scrollable feed view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [api::Message],
    /// Feed revision, used to invalidate the layout cache
    pub revision: u64,
    pub is_loading: bool,
    pub user_id: Option<&'a str>,
    pub edit_target: Option<&'a MessageId>,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [api::Message],
        revision: u64,
        is_loading: bool,
    ) -> Self {
        Self {
            state,
            messages,
            revision,
            is_loading,
            user_id: None,
            edit_target: None,
        }
    }

    pub fn user_id(mut self, user_id: Option<&'a str>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn edit_target(mut self, edit_target: Option<&'a MessageId>) -> Self {
        self.edit_target = edit_target;
        self
    }

    fn render_empty(&mut self, frame: &mut Frame, area: Rect) {
        self.state.layout = LayoutCache::new();
        self.state.viewport_height = area.height;
        self.state.selected_index = None;

        let top_pad = area.height / 2;
        let text_area = Rect::new(
            area.x,
            area.y + top_pad.min(area.height),
            area.width,
            area.height.saturating_sub(top_pad),
        );
        let placeholder = Paragraph::new(EMPTY_FEED_TEXT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, text_area);
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.messages.is_empty() && !self.is_loading {
            self.render_empty(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Refresh the layout cache if the feed or width changed
        let key = LayoutKey {
            revision: self.revision,
            content_width,
            is_loading: self.is_loading,
        };
        if !self.state.layout.is_valid_for(&key) {
            self.state.layout.rebuild(self.messages, key);
        }

        if self
            .state
            .selected_index
            .is_some_and(|idx| idx >= self.messages.len())
        {
            self.state.selected_index = None;
        }

        let total_height = self.state.layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);

            match self.state.layout.rows[i] {
                Row::OlderHidden(count) => {
                    scroll_view.render_widget(older_hidden_note(count), rect);
                }
                Row::Divider(date) => {
                    scroll_view.render_widget(day_divider(date, content_width), rect);
                }
                Row::Message(idx) => {
                    let message = &self.messages[idx];
                    let is_own = self.user_id == Some(message.author_id.as_str());
                    let is_selected = self.state.selected_index == Some(idx);
                    let is_editing = self.edit_target == Some(&message.id);
                    scroll_view.render_widget(
                        Message::new(message, is_own, is_selected, is_editing),
                        rect,
                    );
                }
                Row::Skeleton(n) => {
                    scroll_view.render_widget(skeleton_line(n, content_width), rect);
                }
            }

            y_offset += height;
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

fn day_divider(date: NaiveDate, width: u16) -> Paragraph<'static> {
    let label = format!(" {} ", date.format("%A, %B %-d %Y"));
    let side = (width as usize).saturating_sub(label.width()) / 2;
    let rule = "─".repeat(side);
    Paragraph::new(Line::from(format!("{rule}{label}{rule}")))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
}

fn older_hidden_note(count: usize) -> Paragraph<'static> {
    Paragraph::new(format!("{count} older messages not shown"))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
}

/// A dim placeholder bar; widths vary so the block reads as text.
fn skeleton_line(n: usize, width: u16) -> Paragraph<'static> {
    const WIDTHS: [u16; 4] = [70, 45, 85, 55];
    let percent = WIDTHS[n % WIDTHS.len()];
    let len = (width as u32 * percent as u32 / 100) as usize;
    Paragraph::new("░".repeat(len)).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    )
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because `MessageList` is recreated each frame and can't hold scroll state.
impl EventHandler for MessageListState {
    type Event = ListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::JumpToLatest => self.jump_to_latest(),
            _ => return None,
        }
        Some(ListEvent::Scrolled(self.offset_from_bottom()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutKey {
    pub revision: u64,
    pub content_width: u16,
    pub is_loading: bool,
}

/// Cached row layout, rebuilt whenever its [`LayoutKey`] changes.
pub struct LayoutCache {
    pub rows: Vec<Row>,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    key: Option<LayoutKey>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            key: None,
        }
    }

    pub fn is_valid_for(&self, key: &LayoutKey) -> bool {
        self.key.as_ref() == Some(key)
    }

    pub fn rebuild(&mut self, messages: &[api::Message], key: LayoutKey) {
        let rows = build_rows(messages, key.is_loading);
        let heights = rows
            .iter()
            .map(|row| match *row {
                Row::Message(idx) => Message::calculate_height(&messages[idx], key.content_width),
                Row::OlderHidden(_) | Row::Divider(_) | Row::Skeleton(_) => 1,
            })
            .collect();
        (self.rows, self.heights) = fit_canvas(rows, heights, messages);
        self.rebuild_prefix_heights();
        self.key = Some(key);
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Feed index of the oldest message on the canvas.
    pub fn first_message(&self) -> Option<usize> {
        self.rows.iter().find_map(|row| match *row {
            Row::Message(idx) => Some(idx),
            _ => None,
        })
    }

    pub fn row_of_message(&self, message_index: usize) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| *row == Row::Message(message_index))
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

/// Keep the newest rows that fit on the canvas.
///
/// When the whole history is taller than [`CANVAS_ROWS`], the oldest rows are
/// replaced by a single [`Row::OlderHidden`] note, followed by the day divider
/// of the first kept message.
fn fit_canvas(
    mut rows: Vec<Row>,
    mut heights: Vec<u16>,
    messages: &[api::Message],
) -> (Vec<Row>, Vec<u16>) {
    let total: u32 = heights.iter().map(|&h| u32::from(h)).sum();
    if total <= CANVAS_ROWS {
        return (rows, heights);
    }

    // Two rows reserved for the note and a divider.
    let budget = CANVAS_ROWS - 2;
    let mut kept = 0u32;
    let mut cut = heights.len();
    while cut > 0 && kept + u32::from(heights[cut - 1]) <= budget {
        cut -= 1;
        kept += u32::from(heights[cut]);
    }

    let hidden = rows[..cut]
        .iter()
        .filter(|row| matches!(row, Row::Message(_)))
        .count();
    debug!(
        "Layout is {} rows tall; hiding {} oldest messages",
        total, hidden
    );

    let mut fitted_rows = vec![Row::OlderHidden(hidden)];
    let mut fitted_heights = vec![1];
    if let Some(&Row::Message(idx)) = rows.get(cut) {
        fitted_rows.push(Row::Divider(messages[idx].created_at.date_naive()));
        fitted_heights.push(1);
    }
    fitted_rows.extend(rows.drain(cut..));
    fitted_heights.extend(heights.drain(cut..));
    (fitted_rows, fitted_heights)
}

/// Messages in server order with a divider before each new day, then skeletons if loading.
pub fn build_rows(messages: &[api::Message], is_loading: bool) -> Vec<Row> {
    let mut rows = Vec::with_capacity(messages.len() + SKELETON_ROWS + 1);
    let mut current_day: Option<NaiveDate> = None;
    for (idx, message) in messages.iter().enumerate() {
        let day = message.created_at.date_naive();
        if current_day != Some(day) {
            rows.push(Row::Divider(day));
            current_day = Some(day);
        }
        rows.push(Row::Message(idx));
    }
    if is_loading {
        rows.extend((0..SKELETON_ROWS).map(Row::Skeleton));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;
    use chrono::{Duration, TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(
        state: &mut MessageListState,
        messages: &[api::Message],
        is_loading: bool,
        width: u16,
        height: u16,
    ) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut list = MessageList::new(state, messages, 1, is_loading).user_id(Some("me"));
                list.render(f, f.area());
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn many(count: usize) -> Vec<api::Message> {
        (0..count)
            .map(|i| message(&format!("m{i}"), "bob", &format!("message {i}")))
            .collect()
    }

    #[test]
    fn test_rows_insert_day_dividers() {
        let mut later = message("b", "me", "tomorrow");
        later.created_at = later.created_at + Duration::days(1);
        let messages = vec![message("a", "me", "today"), message("c", "me", "same day"), later];
        let rows = build_rows(&messages, false);
        assert_eq!(rows.len(), 5);
        assert!(matches!(rows[0], Row::Divider(_)));
        assert_eq!(rows[1], Row::Message(0));
        assert_eq!(rows[2], Row::Message(1));
        assert!(matches!(rows[3], Row::Divider(_)));
        assert_eq!(rows[4], Row::Message(2));
    }

    #[test]
    fn test_rows_keep_server_order() {
        let mut early = message("early", "me", "first by time");
        early.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let messages = vec![message("late", "me", "second"), early];
        let rows = build_rows(&messages, false);
        assert_eq!(rows[1], Row::Message(0));
        assert_eq!(rows[2], Row::Message(1));
    }

    #[test]
    fn test_loading_appends_skeleton_rows() {
        let rows = build_rows(&many(2), true);
        let skeletons = rows.iter().filter(|r| matches!(r, Row::Skeleton(_))).count();
        assert_eq!(skeletons, SKELETON_ROWS);
        assert!(matches!(rows.last(), Some(Row::Skeleton(_))));
    }

    #[test]
    fn test_empty_idle_feed_shows_placeholder() {
        let mut state = MessageListState::new();
        let rendered = render(&mut state, &[], false, 70, 10);
        assert!(rendered.contains("Actually there aren't any messages for now"));
    }

    #[test]
    fn test_empty_loading_feed_shows_skeleton_not_placeholder() {
        let mut state = MessageListState::new();
        let rendered = render(&mut state, &[], true, 70, 12);
        assert!(!rendered.contains("Actually there aren't any messages"));
        assert!(rendered.contains('░'));
    }

    #[test]
    fn test_layout_cache_follows_revision() {
        let messages = many(3);
        let mut cache = LayoutCache::new();
        let key = LayoutKey {
            revision: 1,
            content_width: 40,
            is_loading: false,
        };
        cache.rebuild(&messages, key);
        assert!(cache.is_valid_for(&key));
        assert!(!cache.is_valid_for(&LayoutKey { revision: 2, ..key }));
        assert!(!cache.is_valid_for(&LayoutKey {
            content_width: 39,
            ..key
        }));
        // divider + 3 messages of 3 rows each
        assert_eq!(cache.total_height(), 1 + 3 * 3);
    }

    #[test]
    fn test_scroll_up_reports_negative_offset() {
        let messages = many(20);
        let mut state = MessageListState::new();
        render(&mut state, &messages, false, 40, 10);
        assert_eq!(state.offset_from_bottom(), 0);

        let event = state.handle_event(&TuiEvent::ScrollPageUp);
        match event {
            Some(ListEvent::Scrolled(offset)) => assert!(offset < 0),
            other => panic!("expected Scrolled, got {other:?}"),
        }
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn test_jump_to_latest_repins() {
        let messages = many(20);
        let mut state = MessageListState::new();
        render(&mut state, &messages, false, 40, 10);
        state.handle_event(&TuiEvent::ScrollPageUp);

        assert_eq!(
            state.handle_event(&TuiEvent::JumpToLatest),
            Some(ListEvent::Scrolled(0))
        );
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_selection_walks_from_newest() {
        let messages = many(3);
        let mut state = MessageListState::new();
        render(&mut state, &messages, false, 40, 30);

        state.select_previous(messages.len());
        assert_eq!(state.selected_index, Some(2));
        state.select_previous(messages.len());
        assert_eq!(state.selected_index, Some(1));
        state.select_next(messages.len());
        state.select_next(messages.len());
        assert_eq!(state.selected_index, None);
    }

    #[test]
    fn test_huge_history_keeps_newest_messages_on_screen() {
        // 3 rows per message, well past what a u16 canvas can hold
        let messages = many(25_000);
        let mut state = MessageListState::new();
        let rendered = render(&mut state, &messages, false, 40, 20);

        assert!(rendered.contains("message 24999"));
        assert!(rendered.contains("message 24998"));
        assert_eq!(state.offset_from_bottom(), 0);

        let layout = &state.layout;
        assert!(u32::from(layout.total_height()) <= CANVAS_ROWS);
        let Row::OlderHidden(hidden) = layout.rows[0] else {
            panic!("expected a hidden-history note, got {:?}", layout.rows[0]);
        };
        let shown = layout
            .rows
            .iter()
            .filter(|row| matches!(row, Row::Message(_)))
            .count();
        assert!(hidden > 0);
        assert_eq!(hidden + shown, messages.len());
        assert!(matches!(layout.rows[1], Row::Divider(_)));
        assert_eq!(layout.rows.last(), Some(&Row::Message(24_999)));
    }

    #[test]
    fn test_selection_stops_at_oldest_shown_message() {
        let messages = many(25_000);
        let mut state = MessageListState::new();
        render(&mut state, &messages, false, 40, 20);
        let oldest = state.layout.first_message().unwrap();

        state.selected_index = Some(oldest);
        state.select_previous(messages.len());
        assert_eq!(state.selected_index, Some(oldest));
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let mut state = MessageListState::new();
        assert_eq!(state.handle_event(&TuiEvent::InputChar('a')), None);
    }
}
