use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{bar_rows, display_name, truncate_str};
use crate::app::App;

/// Floating panel anchored under the header icons (compact layout only)
pub struct PopoverWidget;

impl PopoverWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(id) = app
            .snapshot
            .open_popover
            .and_then(|i| app.header.popovers.get(i))
        else {
            return;
        };

        let top = bar_rows(app).min(area.height);
        let width = 36u16.min(area.width.saturating_sub(2));
        let height = 7u16.min(area.height.saturating_sub(top));
        if width < 4 || height < 3 {
            return;
        }
        let popover_area = Rect::new(
            area.right().saturating_sub(width + 1),
            area.y + top,
            width,
            height,
        );

        // Clear the background area
        frame.render_widget(Clear, popover_area);

        let block = Block::default()
            .title(format!(" {} ", display_name(id)))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent))
            .style(Style::default().bg(app.theme.bg1));

        let inner_width = width.saturating_sub(4) as usize;
        let mut lines: Vec<Line> = popover_lines(app, id)
            .into_iter()
            .map(|text| {
                Line::from(Span::styled(
                    truncate_str(&text, inner_width),
                    Style::default().fg(app.theme.fg0),
                ))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "[Esc]",
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Close", Style::default().fg(app.theme.grey1)),
        ]));

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, popover_area);
    }
}

/// Body text for a popover id
pub(crate) fn popover_lines(app: &App, id: &str) -> Vec<String> {
    match id {
        "notifications" => vec!["No new notifications".to_string()],
        "profile" => vec![
            app.header
                .greeting
                .trim_start_matches("Hey, ")
                .trim_end_matches('!')
                .to_string(),
            "View profile".to_string(),
        ],
        other => vec![display_name(other)],
    }
}
