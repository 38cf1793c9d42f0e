use herobar_core::scroll::LayoutClass;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;
use crate::widgets::{
    FeedListWidget, HeaderBarWidget, HeroWidget, PopoverWidget, SidePanelWidget, SpinnerWidget,
    StatusBarWidget,
};

/// Width of the wide-layout side panel in columns
const SIDE_PANEL_WIDTH: u16 = 34;

/// Draw one frame from the app's current snapshot
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let content = if app.snapshot.layout == LayoutClass::Wide {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
            .split(chunks[0]);
        SidePanelWidget::render(frame, columns[1], app);
        columns[0]
    } else {
        chunks[0]
    };

    FeedListWidget::render(frame, content, app);
    HeroWidget::render(frame, content, app);
    HeaderBarWidget::render(frame, content, app);
    SpinnerWidget::render(frame, content, app);
    if app.snapshot.layout == LayoutClass::Compact {
        PopoverWidget::render(frame, content, app);
    }
    StatusBarWidget::render(frame, chunks[1], app);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use herobar_core::style::HeaderStyle;
    use herobar_core::{DelayRefresh, HeaderConfig, HeaderRuntime, RefreshState};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use super::*;

    fn test_app() -> (App, HeaderRuntime) {
        let config = HeaderConfig::default();
        let (runtime, handle) =
            HeaderRuntime::new(&config, Arc::new(DelayRefresh::new(Duration::ZERO))).unwrap();
        (App::new(handle, &config), runtime)
    }

    fn render(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn screen_text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_expanded_screen_shows_hero_and_greeting() {
        let (app, _runtime) = test_app();
        let text = screen_text(&render(&app, 100, 30));

        assert!(text.contains("Dip IFR"));
        assert!(text.contains("Hey, Vemalla"));
        assert!(text.contains("EXPANDED"));
        assert!(text.contains("● ○ ○"));
    }

    #[tokio::test]
    async fn test_collapsed_bar_is_filled() {
        let (mut app, _runtime) = test_app();
        app.offset = -300.0;
        app.snapshot.collapsed = true;
        app.snapshot.fade_progress = 0.0;
        app.snapshot.style = HeaderStyle::collapsed_default();

        let buf = render(&app, 100, 30);
        let expected = crate::theme::blend_over(app.snapshot.style.background, app.theme.bg0);
        assert_eq!(buf[(0, 0)].bg, expected);
        assert!(screen_text(&buf).contains("COLLAPSED"));
        assert!(!screen_text(&buf).contains("Dip IFR"));
    }

    #[tokio::test]
    async fn test_open_popover_is_drawn_in_compact_layout() {
        let (mut app, _runtime) = test_app();
        app.snapshot.open_popover = Some(0);

        let text = screen_text(&render(&app, 100, 30));
        assert!(text.contains("Notifications"));
        assert!(text.contains("No new notifications"));
    }

    #[tokio::test]
    async fn test_wide_layout_shows_side_panel_instead_of_popover() {
        let (mut app, _runtime) = test_app();
        app.snapshot.layout = LayoutClass::Wide;
        app.snapshot.open_popover = Some(1);

        let text = screen_text(&render(&app, 160, 30));
        assert!(text.contains("No new notifications"));
        assert!(!text.contains("View profile"));
    }

    #[tokio::test]
    async fn test_spinner_drawn_while_refreshing() {
        let (mut app, _runtime) = test_app();
        app.snapshot.refresh_state = RefreshState::Running;
        app.snapshot.spinner_offset = Some(70.0);

        let buf = render(&app, 100, 30);
        let row = row_text(&buf, 4);
        assert!(row.contains('⠋'));
        assert_ne!(buf[(50, 4)].fg, Color::Reset);
    }

    #[tokio::test]
    async fn test_tiny_terminal_does_not_panic() {
        let (mut app, _runtime) = test_app();
        app.snapshot.open_popover = Some(1);
        app.snapshot.spinner_offset = Some(40.0);
        for (w, h) in [(1, 1), (3, 2), (10, 4)] {
            render(&app, w, h);
        }
    }
}
