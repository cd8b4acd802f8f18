//! # Color Values
//!
//! The single color type accepted at every configuration boundary. Scene
//! props, lights, ground materials and the debug panel all speak [`Color`].
//!
//! ## Accepted inputs
//!
//! - `"#rgb"` and `"#rrggbb"`
//! - `"0xrrggbb"` and bare `"rrggbb"`
//! - a handful of CSS names (`"white"`, `"black"`, `"gray"`, ...)
//! - numeric `0xRRGGBB` through `From<u32>`
//!
//! ```
//! use scenebind::Color;
//!
//! let gray: Color = "#808080".parse().unwrap();
//! assert_eq!(gray, Color::from(0x808080));
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Packs the color back into `0xRRGGBB`
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    fn named(name: &str) -> Option<Self> {
        let hex = match name {
            "black" => 0x000000,
            "white" => 0xffffff,
            "red" => 0xff0000,
            "green" => 0x008000,
            "blue" => 0x0000ff,
            "gray" | "grey" => 0x808080,
            "yellow" => 0xffff00,
            "cyan" => 0x00ffff,
            "magenta" => 0xff00ff,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl From<[f32; 3]> for Color {
    fn from(value: [f32; 3]) -> Self {
        Self::rgb(value[0], value[1], value[2])
    }
}

impl From<Color> for [f32; 3] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }

        let lower = trimmed.to_ascii_lowercase();
        let digits = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
            .unwrap_or(&lower);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::named(&lower).ok_or_else(|| ColorParseError::UnknownName(s.to_string()));
        }

        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(ColorParseError::InvalidHex(s.to_string())),
        };

        u32::from_str_radix(&expanded, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}
