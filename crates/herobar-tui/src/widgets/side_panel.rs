use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{display_name, popover::popover_lines, truncate_str};
use crate::app::App;

/// Always-visible panel that replaces popovers on wide layouts
pub struct SidePanelWidget;

impl SidePanelWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(id) = app.header.popovers.first() else {
            return;
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", display_name(id)),
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(app.theme.grey1))
            .style(Style::default().bg(app.theme.bg1));

        let inner_width = area.width.saturating_sub(3) as usize;
        let lines: Vec<Line> = popover_lines(app, id)
            .into_iter()
            .map(|text| {
                Line::from(Span::styled(
                    format!(" {}", truncate_str(&text, inner_width)),
                    Style::default().fg(app.theme.fg0),
                ))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
