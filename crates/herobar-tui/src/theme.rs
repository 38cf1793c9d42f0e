use herobar_core::style::Rgba;
use ratatui::style::Color;

/// Terminal page colors around the header
#[derive(Debug, Clone)]
pub struct Theme {
    /// Screen background behind the list
    pub bg0: Color,
    /// List row background
    pub bg1: Color,
    /// Status bar background
    pub bg2: Color,
    pub fg0: Color,
    pub fg1: Color,
    pub grey1: Color,
    pub accent: Color,
    /// Hero title
    pub hero_title: Color,
    /// Hero subtitle lines
    pub hero_subtitle: Color,
    /// Spinner glyph
    pub spinner: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0xf2, 0xf4, 0xf7),
            bg1: Color::Rgb(0xff, 0xff, 0xff),
            bg2: Color::Rgb(0x20, 0x51, 0x88),
            fg0: Color::Rgb(0x1c, 0x1c, 0x1e),
            fg1: Color::Rgb(0xff, 0xff, 0xff),
            grey1: Color::Rgb(0x8e, 0x8e, 0x93),
            accent: Color::Rgb(0x64, 0xae, 0xde),
            hero_title: Color::Rgb(0xff, 0xff, 0xff),
            hero_subtitle: Color::Rgb(0xc4, 0xd8, 0xed),
            spinner: Color::Rgb(0xff, 0xff, 0xff),
        }
    }
}

/// Split a terminal color into RGB, when it has one
fn rgb_of(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::White => Some((0xff, 0xff, 0xff)),
        Color::Black => Some((0, 0, 0)),
        _ => None,
    }
}

fn mix(from: u8, to: u8, t: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * t).round() as u8
}

/// Composite `color` over `backdrop` using its alpha
///
/// Backdrops without a known RGB value are treated as black.
pub fn blend_over(color: Rgba, backdrop: Color) -> Color {
    let (r, g, b) = rgb_of(backdrop).unwrap_or((0, 0, 0));
    let alpha = color.opacity();
    Color::Rgb(mix(r, color.r, alpha), mix(g, color.g, alpha), mix(b, color.b, alpha))
}

/// Interpolate between two terminal colors
pub fn lerp_color(from: Color, to: Color, t: f64) -> Color {
    match (rgb_of(from), rgb_of(to)) {
        (Some((r0, g0, b0)), Some((r1, g1, b1))) => {
            let t = t.clamp(0.0, 1.0);
            Color::Rgb(mix(r0, r1, t), mix(g0, g1, t), mix(b0, b1, t))
        }
        _ if t >= 0.5 => to,
        _ => from,
    }
}

/// Opaque terminal color for a config color
pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Color at position `t` in [0, 1] along evenly spaced gradient stops
pub fn gradient_color(stops: &[Rgba], t: f64) -> Color {
    match stops {
        [] => Color::Reset,
        [only] => to_color(*only),
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            lerp_color(
                to_color(stops[index]),
                to_color(stops[index + 1]),
                scaled - index as f64,
            )
        }
    }
}
