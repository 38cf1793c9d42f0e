use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use super::rows;
use crate::app::App;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Pull-to-refresh indicator
///
/// While pulling it shows an arrow that follows the finger; once a refresh
/// is active it spins at its rest offset.
pub struct SpinnerWidget;

impl SpinnerWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(offset) = app.snapshot.spinner_offset else {
            return;
        };
        if area.is_empty() {
            return;
        }
        let row = rows(offset).clamp(0, area.height.saturating_sub(1) as i32) as u16;
        let glyph = if app.snapshot.is_refreshing() {
            FRAMES[(app.frame as usize) % FRAMES.len()]
        } else {
            "↓"
        };
        let x = area.x + area.width / 2;
        frame.buffer_mut().set_string(
            x,
            area.y + row,
            glyph,
            Style::default()
                .fg(app.theme.spinner)
                .add_modifier(Modifier::BOLD),
        );
    }
}
