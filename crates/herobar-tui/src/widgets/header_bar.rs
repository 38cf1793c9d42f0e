use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{bar_rows, truncate_str};
use crate::app::App;
use crate::theme::{blend_over, lerp_color};

/// Pinned top bar: greeting, welcome line, icon buttons and avatar
///
/// Drawn over the hero, so a transparent bar shows the hero through it.
pub struct HeaderBarWidget;

impl HeaderBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let height = bar_rows(app).min(area.height);
        if height == 0 {
            return;
        }
        let bar = Rect::new(area.x, area.y, area.width, height);
        let style = app.snapshot.style;
        let buf = frame.buffer_mut();

        if style.background.a > 0 {
            for y in bar.top()..bar.bottom() {
                for x in bar.left()..bar.right() {
                    let backdrop = backdrop_at(buf, x, y, app.theme.bg0);
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_bg(blend_over(style.background, backdrop)).set_symbol(" ");
                    }
                }
            }
        }

        // Icons right-aligned on the first text row, avatar last
        let mut buttons: Vec<(String, String)> = app
            .header
            .icons
            .iter()
            .map(|id| (id.clone(), format!(" {} ", icon_glyph(id))))
            .collect();
        let avatar_id = app
            .header
            .popovers
            .last()
            .cloned()
            .unwrap_or_else(|| "profile".to_string());
        buttons.push((avatar_id, " ◉ ".to_string()));

        let text_row = bar.y + (height / 2).saturating_sub(1);
        let buttons_width: u16 = buttons.iter().map(|(_, g)| g.width() as u16 + 1).sum();
        let mut x = bar.right().saturating_sub(buttons_width + 1).max(bar.x);
        let open_id = app
            .snapshot
            .open_popover
            .and_then(|i| app.header.popovers.get(i));

        for (i, (id, glyph)) in buttons.iter().enumerate() {
            let is_avatar = i == buttons.len() - 1;
            let backdrop = backdrop_at(buf, x, text_row, app.theme.bg0);
            let fg = if is_avatar {
                style.avatar_ring
            } else {
                style.icon_tint
            };
            let mut button_style = Style::default()
                .fg(blend_over(fg, backdrop))
                .bg(blend_over(style.icon_fill, backdrop));
            if open_id == Some(id) {
                button_style = button_style.add_modifier(Modifier::REVERSED);
            }
            buf.set_stringn(x, text_row, glyph, bar.right().saturating_sub(x) as usize, button_style);
            x = x.saturating_add(glyph.width() as u16 + 1);
        }

        // Greeting and welcome on the left, clear of the buttons
        let text_width = bar
            .width
            .saturating_sub(buttons_width + 4)
            .max(1) as usize;
        let backdrop = backdrop_at(buf, bar.x + 2, text_row, app.theme.bg0);
        let title = blend_over(style.title_tint, backdrop);
        buf.set_stringn(
            bar.x + 2,
            text_row,
            truncate_str(&app.header.greeting, text_width),
            text_width,
            Style::default().fg(title).add_modifier(Modifier::BOLD),
        );
        if text_row + 1 < bar.bottom() {
            buf.set_stringn(
                bar.x + 2,
                text_row + 1,
                truncate_str(&app.header.welcome, text_width),
                text_width,
                Style::default().fg(lerp_color(backdrop, title, 0.8)),
            );
        }
    }
}

/// Background currently under a cell
fn backdrop_at(buf: &Buffer, x: u16, y: u16, fallback: Color) -> Color {
    match buf.cell((x, y)).map(|cell| cell.bg) {
        Some(Color::Reset) | None => fallback,
        Some(color) => color,
    }
}

fn icon_glyph(id: &str) -> &str {
    match id {
        "announcements" => "📣",
        "notifications" => "🔔",
        "profile" => "◉",
        "settings" => "⚙",
        _ => "●",
    }
}
