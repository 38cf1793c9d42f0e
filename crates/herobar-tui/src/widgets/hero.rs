use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{clip_rows, hero_span, rows};
use crate::app::App;
use crate::theme::{gradient_color, lerp_color};

/// Title baseline, in points below the hero top
const TITLE_TOP: f64 = 108.0;

/// Carousel banner: page gradient, title, subtitle and page dots
pub struct HeroWidget;

impl HeroWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let (top, height) = hero_span(app);
        let Some(hero) = clip_rows(area, top, height) else {
            return;
        };
        let Some(page) = app.current_page() else {
            return;
        };

        let fade = app.snapshot.fade_progress;
        let backdrop = app.theme.bg0;
        let buf = frame.buffer_mut();

        let span = hero.width.saturating_sub(1).max(1) as f64;
        for x in hero.left()..hero.right() {
            let t = (x - hero.x) as f64 / span;
            let color = lerp_color(backdrop, gradient_color(&page.gradient.colors, t), fade);
            for y in hero.top()..hero.bottom() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(color).set_symbol(" ");
                }
            }
        }

        let title_row = top + rows(TITLE_TOP);
        // (row, text, style, centered)
        let mut lines: Vec<(i32, String, Style, bool)> = vec![(
            title_row,
            page.title.clone(),
            Style::default()
                .fg(lerp_color(backdrop, app.theme.hero_title, fade))
                .add_modifier(Modifier::BOLD),
            false,
        )];
        let subtitle_style =
            Style::default().fg(lerp_color(backdrop, app.theme.hero_subtitle, fade));
        for (i, line) in page.subtitle.iter().enumerate() {
            lines.push((title_row + 1 + i as i32, line.clone(), subtitle_style, false));
        }
        lines.push((
            top + height - 2,
            page_dots(app.pages.len(), app.snapshot.carousel_page),
            subtitle_style,
            true,
        ));

        for (row, text, style, centered) in lines {
            let y = area.y as i32 + row;
            if y < hero.top() as i32 || y >= hero.bottom() as i32 {
                continue;
            }
            let width = text.width() as u16;
            let x = if centered {
                hero.x + hero.width.saturating_sub(width) / 2
            } else {
                hero.x + 2
            };
            buf.set_stringn(x, y as u16, &text, hero.width.saturating_sub(4) as usize, style);
        }
    }
}

/// Page indicator like "○ ● ○"
fn page_dots(count: usize, current: usize) -> String {
    (0..count)
        .map(|i| if i == current { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}
