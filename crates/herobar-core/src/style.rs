//! Color and header styling values handed to the rendering layer
//!
//! Colors are configured as hex strings (`#RGB`, `#RRGGBB` or `#AARRGGBB`)
//! and carried as plain RGBA bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a hex color, ignoring a leading `#` and surrounding whitespace
    ///
    /// 3 digits expand each nibble (`#abc` = `#aabbcc`), 6 digits are RGB,
    /// 8 digits are ARGB.
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(input.to_string()));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor(input.to_string()))?;

        match hex.len() {
            3 => {
                let nibble = |shift: u32| (((value >> shift) & 0xf) * 17) as u8;
                Ok(Self::rgb(nibble(8), nibble(4), nibble(0)))
            }
            6 => Ok(Self::rgb(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            8 => Ok(Self {
                a: (value >> 24) as u8,
                r: (value >> 16) as u8,
                g: (value >> 8) as u8,
                b: value as u8,
            }),
            _ => Err(Error::InvalidColor(input.to_string())),
        }
    }

    /// Same color with alpha replaced by `opacity` in [0, 1]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// Anchor point of a linear gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPoint {
    Top,
    Bottom,
    Leading,
    Trailing,
    TopLeading,
    TopTrailing,
    BottomLeading,
    BottomTrailing,
}

/// Linear gradient for a hero page background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub colors: Vec<Rgba>,
    #[serde(default = "default_gradient_start")]
    pub start: GradientPoint,
    #[serde(default = "default_gradient_end")]
    pub end: GradientPoint,
}

impl Gradient {
    /// Diagonal gradient, top-leading to bottom-trailing
    pub fn diagonal(colors: Vec<Rgba>) -> Self {
        Self {
            colors,
            start: default_gradient_start(),
            end: default_gradient_end(),
        }
    }

    /// First color stop, used where only a flat fill can be drawn
    pub fn primary(&self) -> Rgba {
        self.colors.first().copied().unwrap_or(Rgba::TRANSPARENT)
    }
}

fn default_gradient_start() -> GradientPoint {
    GradientPoint::TopLeading
}

fn default_gradient_end() -> GradientPoint {
    GradientPoint::BottomTrailing
}

/// Fill and tint values for the header bar in one presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStyle {
    /// Bar background fill
    pub background: Rgba,
    /// Greeting title and subtitle color
    pub title_tint: Rgba,
    /// Icon glyph color
    pub icon_tint: Rgba,
    /// Circle behind each icon button
    pub icon_fill: Rgba,
    /// Ring around the avatar
    pub avatar_ring: Rgba,
}

impl HeaderStyle {
    /// Transparent bar over the hero banner
    pub fn expanded_default() -> Self {
        let gray = Rgba::rgb(0xf2, 0xf2, 0xf2);
        Self {
            background: Rgba::TRANSPARENT,
            title_tint: Rgba::WHITE,
            icon_tint: Rgba::WHITE,
            icon_fill: gray.with_opacity(0.12),
            avatar_ring: Rgba::WHITE.with_opacity(0.18),
        }
    }

    /// Opaque white bar once the hero has scrolled away
    pub fn collapsed_default() -> Self {
        let gray = Rgba::rgb(0x8e, 0x8e, 0x93);
        Self {
            background: Rgba::WHITE,
            title_tint: Rgba::rgb(0x20, 0x51, 0x88),
            icon_tint: Rgba::rgb(0x27, 0x4b, 0x7e),
            icon_fill: gray.with_opacity(0.12),
            avatar_ring: gray.with_opacity(0.18),
        }
    }
}
