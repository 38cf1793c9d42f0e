mod feed_list;
mod header_bar;
mod hero;
mod popover;
mod side_panel;
mod spinner;
mod status_bar;

pub use feed_list::FeedListWidget;
pub use header_bar::HeaderBarWidget;
pub use hero::HeroWidget;
pub use popover::PopoverWidget;
pub use side_panel::SidePanelWidget;
pub use spinner::SpinnerWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::Rect;

use crate::app::{App, ROW_POINTS};

/// Convert a length in points to whole terminal rows
pub(crate) fn rows(points: f64) -> i32 {
    (points / ROW_POINTS).round() as i32
}

/// Hero span in rows relative to the content top: (top, height)
///
/// Scrolling moves the hero up; pulling stretches it while its top stays put.
pub(crate) fn hero_span(app: &App) -> (i32, i32) {
    let top = rows(app.offset.min(0.0));
    let height = rows(app.hero_height + app.snapshot.hero_stretch);
    (top, height)
}

/// Part of a row span that falls inside `area`
pub(crate) fn clip_rows(area: Rect, top: i32, height: i32) -> Option<Rect> {
    let start = top.max(0);
    let end = (top + height).min(area.height as i32);
    if end <= start {
        return None;
    }
    Some(Rect::new(
        area.x,
        area.y + start as u16,
        area.width,
        (end - start) as u16,
    ))
}

/// Rows covered by the pinned header bar
pub(crate) fn bar_rows(app: &App) -> u16 {
    rows(app.bar_height).max(1) as u16
}

/// Name shown for a popover or icon id
pub(crate) fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Truncate a string to max length with ellipsis
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
