//! Stroke styles.

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, BACKGROUND};

/// Thinnest selectable stroke, in pixels.
pub const MIN_STROKE_WIDTH: f32 = 1.0;
/// Thickest selectable stroke, in pixels.
pub const MAX_STROKE_WIDTH: f32 = 20.0;
/// Stroke width a fresh surface starts with.
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// Paint style applied to stroke segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Pen color (ignored while the eraser is on).
    pub color: Rgba,
    /// Line width in pixels.
    pub width: f32,
    /// Whether segments paint the background instead of `color`.
    pub eraser: bool,
}

impl StrokeStyle {
    /// Create a pen style with the given color and width.
    #[must_use]
    pub fn pen(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width: clamp_width(width),
            eraser: false,
        }
    }

    /// Create an eraser style with the given width.
    #[must_use]
    pub fn eraser(width: f32) -> Self {
        Self {
            eraser: true,
            ..Self::pen(Rgba::WHITE, width)
        }
    }

    /// The color actually painted by this style.
    #[must_use]
    pub fn paint_color(&self) -> Rgba {
        if self.eraser {
            BACKGROUND
        } else {
            self.color
        }
    }

    /// Return this style with its width forced into the selectable range.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            width: clamp_width(self.width),
            ..self
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::pen(Rgba::WHITE, DEFAULT_STROKE_WIDTH)
    }
}

/// Clamp a width into `[MIN_STROKE_WIDTH, MAX_STROKE_WIDTH]`; NaN maps to the default.
#[must_use]
pub fn clamp_width(width: f32) -> f32 {
    if width.is_nan() {
        DEFAULT_STROKE_WIDTH
    } else {
        width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
    }
}
