use herobar_core::RefreshState;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let collapse_str = if app.snapshot.collapsed {
            "COLLAPSED"
        } else {
            "EXPANDED"
        };

        let refresh_str = match app.snapshot.refresh_state {
            RefreshState::Idle => "idle",
            RefreshState::Triggering => "triggering",
            RefreshState::Running => "running",
            RefreshState::Cooling => "cooling",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", collapse_str, msg)
        } else {
            format!(
                " {} | Page {}/{} | Refresh: {} | Offset: {:.0}",
                collapse_str,
                app.snapshot.carousel_page + 1,
                app.pages.len(),
                refresh_str,
                app.offset
            )
        };

        let help_hint = " q:quit j/k:scroll h/l:page a/n/p:icons r:refresh ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let style = Style::default().fg(app.theme.fg1).bg(app.theme.bg2);
        let line = Line::from(vec![
            Span::styled(status_text, style),
            Span::styled(" ".repeat(padding_len), style),
            Span::styled(help_hint, style.fg(app.theme.hero_subtitle)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
