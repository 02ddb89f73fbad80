//! The pixel buffer behind a drawing surface.

use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8,
    Stroke, Transform,
};

use crate::color::Rgba;
use crate::error::{CanvasError, CanvasResult};
use crate::event::Point;
use crate::style::StrokeStyle;

/// Largest accepted raster edge, in pixels.
pub const MAX_RASTER_EDGE: u32 = 16_384;

/// An RGBA raster with a fixed background fill.
#[derive(Debug, Clone)]
pub struct Raster {
    pixmap: Pixmap,
    background: Rgba,
}

impl Raster {
    /// Allocate a raster filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDimensions`] for zero or oversized dimensions.
    pub fn new(width: u32, height: u32, background: Rgba) -> CanvasResult<Self> {
        if width > MAX_RASTER_EDGE || height > MAX_RASTER_EDGE {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        pixmap.fill(background.to_skia());
        Ok(Self { pixmap, background })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The background fill color.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Overwrite every pixel with the background.
    pub fn clear(&mut self) {
        self.pixmap.fill(self.background.to_skia());
    }

    /// Draw one segment with round caps and joins.
    ///
    /// A zero-length segment paints a round dot of the stroke width.
    pub fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let paint = segment_paint(style);

        if from == to {
            if let Some(dot) = PathBuilder::from_circle(to.x, to.y, style.width / 2.0) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width: style.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Read a pixel as a straight (demultiplied) color.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| Rgba::from(p.demultiply()))
    }

    /// Whether every pixel holds exactly the background fill.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        let expected: PremultipliedColorU8 = self.background.premultiplied();
        self.pixmap.pixels().iter().all(|p| *p == expected)
    }

    /// Encode the raster as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Encode`] if the PNG encoder fails.
    pub fn encode_png(&self) -> CanvasResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(format!("PNG encoding failed: {e}")))
    }
}

fn segment_paint(style: &StrokeStyle) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(style.paint_color().to_skia());
    paint.anti_alias = true;
    // The eraser replaces pixels with the background instead of compositing over them.
    if style.eraser {
        paint.blend_mode = BlendMode::Source;
    }
    paint
}
