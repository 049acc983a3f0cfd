use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

/// Where a click landed relative to the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputHit {
    /// Inside the text area
    Text,
    /// On the box's border or padding
    Wrapper,
    Outside,
}

/// Split the frame into title bar, transcript and input areas.
pub fn layout_areas(frame_area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame_area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, tick: usize) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, input_area] = layout_areas(frame.area(), input_height);

    MessageList::new(&mut tui.message_list, &app.transcript, &app.bot_name, tick)
        .render(frame, main_area);

    // After the list so the unseen flag reflects this frame's scroll position
    TitleBar::new(
        app.bot_name.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}

pub fn hit_test_input(column: u16, row: u16, input_area: Rect) -> InputHit {
    let position = Position::new(column, row);
    if !input_area.contains(position) {
        return InputHit::Outside;
    }
    let text_area = Rect {
        x: input_area.x + 2,
        y: input_area.y + 1,
        width: input_area.width.saturating_sub(4),
        height: input_area.height.saturating_sub(2),
    };
    if text_area.contains(position) {
        InputHit::Text
    } else {
        InputHit::Wrapper
    }
}

pub fn hit_test_transcript(column: u16, row: u16, main_area: Rect) -> bool {
    main_area.contains(Position::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_shows_all_regions() {
        let mut app = test_app();
        app.transcript.push(Message::bot("Welcome aboard"));
        let mut tui = TuiState::new();

        let text = draw(&app, &mut tui, 60, 16);
        assert!(text.contains("Parley · Test Bot"));
        assert!(text.contains("Welcome aboard"));
        assert!(text.contains("Type your message..."));
    }

    #[test]
    fn test_layout_gives_input_its_height() {
        let [title, main, input] = layout_areas(Rect::new(0, 0, 80, 24), 5);
        assert_eq!(title.height, 1);
        assert_eq!(input.height, 5);
        assert_eq!(main.height, 18);
        assert_eq!(input.y, 19);
    }

    #[test]
    fn test_hit_test_input_regions() {
        let area = Rect::new(0, 20, 40, 3);
        assert_eq!(hit_test_input(5, 21, area), InputHit::Text);
        assert_eq!(hit_test_input(0, 21, area), InputHit::Wrapper);
        assert_eq!(hit_test_input(1, 21, area), InputHit::Wrapper);
        assert_eq!(hit_test_input(5, 20, area), InputHit::Wrapper);
        assert_eq!(hit_test_input(5, 22, area), InputHit::Wrapper);
        assert_eq!(hit_test_input(5, 19, area), InputHit::Outside);
    }

    #[test]
    fn test_hit_test_transcript() {
        let main = Rect::new(0, 1, 80, 18);
        assert!(hit_test_transcript(10, 5, main));
        assert!(!hit_test_transcript(10, 0, main));
        assert!(!hit_test_transcript(10, 19, main));
    }
}
