use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::input_box::calculate_height;
use crate::tui::components::{InputBox, MessageList, TitleBar};
use crate::tui::{InputMode, TuiState};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let input_height = calculate_height(app.composer.buffer(), frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.socket_connected,
        app.status_message.clone(),
        app.scroll.show_jump_to_latest(),
    );
    title_bar.render(frame, title_area);

    let mut message_list = MessageList::new(
        &mut tui.message_list,
        app.feed.messages(),
        app.feed.revision(),
        app.feed.is_loading(),
    )
    .user_id(app.user_id.as_deref())
    .edit_target(app.composer.edit_target());
    message_list.render(frame, main_area);

    let mut input_box = InputBox::new(&app.composer, &mut tui.input_box);
    input_box.dimmed = tui.input_mode == InputMode::Browse;
    input_box.submitting = app.submitting;
    input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::FetchTicket;
    use crate::test_support::{message, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn load(app: &mut App, messages: Vec<crate::api::Message>) {
        let ticket: FetchTicket = app.feed.begin_fetch();
        app.feed.finish_fetch(ticket, Ok(messages));
    }

    #[test]
    fn test_draw_ui_empty_feed() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("roomchat"));
        assert!(text.contains("Actually there aren't any messages for now"));
        assert!(text.contains("New message"));
    }

    #[test]
    fn test_draw_ui_with_messages() {
        let mut app = test_app();
        load(
            &mut app,
            vec![message("a", "me", "first"), message("b", "bob", "second")],
        );
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert!(!text.contains("Actually there aren't any messages"));
    }

    #[test]
    fn test_draw_ui_shows_jump_control() {
        let mut app = test_app();
        app.scroll.on_scroll(-5000);
        let mut tui = TuiState::new();
        assert!(draw(&app, &mut tui).contains("↓ Latest"));
    }
}
