//! Colors and the drawing palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// A straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

/// The surface background: `rgba(17, 17, 17, 0.99)`.
pub const BACKGROUND: Rgba = Rgba::new(17, 17, 17, 252);

/// Named colors offered by the color picker, in display order.
pub const PALETTE: [(&str, Rgba); 9] = [
    ("red", Rgba::opaque(0xFF, 0x00, 0x00)),
    ("green", Rgba::opaque(0x00, 0x80, 0x00)),
    ("blue", Rgba::opaque(0x00, 0x00, 0xFF)),
    ("yellow", Rgba::opaque(0xFF, 0xFF, 0x00)),
    ("orange", Rgba::opaque(0xFF, 0xA5, 0x00)),
    ("purple", Rgba::opaque(0x80, 0x00, 0x80)),
    ("black", Rgba::opaque(0x00, 0x00, 0x00)),
    ("white", Rgba::opaque(0xFF, 0xFF, 0xFF)),
    ("brown", Rgba::opaque(0xA5, 0x2A, 0x2A)),
];

impl Rgba {
    /// Opaque white, the default stroke color.
    pub const WHITE: Self = Self::opaque(0xFF, 0xFF, 0xFF);

    /// Create a color from its four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Look up a palette color by name (case-insensitive).
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    /// Parse a palette name, `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the string is neither.
    pub fn parse(input: &str) -> CanvasResult<Self> {
        let input = input.trim();
        if let Some(color) = Self::named(input) {
            return Ok(color);
        }

        let hex = input
            .strip_prefix('#')
            .ok_or_else(|| CanvasError::InvalidColor(input.to_string()))?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(CanvasError::InvalidColor(input.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CanvasError::InvalidColor(input.to_string()))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Convert to a tiny-skia color.
    #[must_use]
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// The premultiplied pixel value this color produces when filled.
    #[must_use]
    pub fn premultiplied(self) -> tiny_skia::PremultipliedColorU8 {
        self.to_skia().premultiply().to_color_u8()
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgba {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<tiny_skia::ColorU8> for Rgba {
    fn from(c: tiny_skia::ColorU8) -> Self {
        Self::new(c.red(), c.green(), c.blue(), c.alpha())
    }
}
