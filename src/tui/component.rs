use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Implementors are built per frame from borrowed props (`&App` data) and,
/// for stateful views, a `&mut` handle to state that outlives the frame.
/// `render` takes `&mut self` because the feed view refreshes its layout
/// cache and clamps its scroll offset while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns raw terminal events into component-level events.
///
/// Returning `None` means the event was ignored or fully absorbed.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
