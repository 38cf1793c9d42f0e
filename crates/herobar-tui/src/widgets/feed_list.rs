use ratatui::{
    layout::Rect,
    style::Style,
    Frame,
};

use super::hero_span;
use crate::app::{App, ITEM_ROWS};

/// Scrolling content below the hero
pub struct FeedListWidget;

impl FeedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let buf = frame.buffer_mut();
        buf.set_style(area, Style::default().bg(app.theme.bg0));

        let (hero_top, hero_height) = hero_span(app);
        let first_row = hero_top + hero_height + 1;
        let row_style = Style::default().fg(app.theme.fg0).bg(app.theme.bg1);
        let width = area.width.saturating_sub(4);

        for i in 0..app.rows {
            let row = first_row + (i as i32) * ITEM_ROWS as i32;
            if row < 0 {
                continue;
            }
            if row >= area.height as i32 {
                break;
            }
            let y = area.y + row as u16;
            let label = format!(" {:<w$}", i + 1, w = width.saturating_sub(1) as usize);
            buf.set_stringn(area.x + 2, y, label, width as usize, row_style);
        }
    }
}
